use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Oscillator Block
================

A phase-accumulator oscillator. Phase runs 0..1 and wraps; each waveform is
a cheap function of phase. Frequency is passed per render call so pitch
ramps (the kick/tom "membrane drop") cost nothing extra: the caller just
hands a different frequency for each block or sample.

Waveform character, for drum work:

  Sine      pure fundamental - kick and tom bodies
  Triangle  soft odd harmonics - snare body
  Saw       all harmonics - hat metallic layers, buzz transients
  Square    hollow odd harmonics - alternative hat layer

Noise is deliberately NOT a waveform here. Percussion noise comes from the
shared one-second table in `dsp::noise`, which is what gives pre-rendered
and live hits the same raw material.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Saw,
    Square,
}

pub struct OscillatorBlock {
    waveform: Waveform,
    phase: f32, // 0..1, wraps
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine)
    }

    pub fn triangle() -> Self {
        Self::new(Waveform::Triangle)
    }

    pub fn saw() -> Self {
        Self::new(Waveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(Waveform::Square)
    }

    /// Advance one sample at `frequency` Hz and return the waveform value.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let value = match self.waveform {
            Waveform::Sine => (TAU * self.phase).sin(),
            Waveform::Triangle => {
                // 0..1 phase -> -1..1..-1 triangle
                4.0 * (self.phase - 0.5).abs() - 1.0
            }
            Waveform::Saw => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += frequency / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    /// Fill a buffer at a fixed frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn sine_matches_closed_form() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = OscillatorBlock::sine();

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer, frequency, sample_rate);

        // sample n should be sin(2pi f n / sr)
        let n = 12;
        let expected = (TAU * frequency * n as f32 / sample_rate).sin();
        assert!(
            (buffer[n] - expected).abs() < 1e-4,
            "expected {expected}, got {}",
            buffer[n]
        );
    }

    #[test]
    fn all_waveforms_stay_in_range() {
        for waveform in [
            Waveform::Sine,
            Waveform::Triangle,
            Waveform::Saw,
            Waveform::Square,
        ] {
            let mut osc = OscillatorBlock::new(waveform);
            let mut buffer = vec![0.0f32; 1024];
            osc.render(&mut buffer, 333.0, 48_000.0);

            assert!(
                buffer.iter().all(|s| (-1.0..=1.0).contains(s)),
                "{waveform:?} left [-1, 1]"
            );
        }
    }

    #[test]
    fn phase_wraps_without_discontinuity_blowup() {
        let mut osc = OscillatorBlock::saw();
        let mut buffer = vec![0.0f32; 4096];
        // High frequency forces many wraps
        osc.render(&mut buffer, 10_000.0, 48_000.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}

use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad EQ Stages
================

Shelf and peaking stages (RBJ cookbook coefficients) used two ways:

  - each voice descriptor carries a fixed EQ chain that shapes its timbre
    after layer summing (e.g. the snare's 200 Hz low shelf + 3 kHz peak)
  - the mix bus runs a shelf + peak coloration pass on everything

Coefficients depend on the sample rate, which is only known at render time,
so each stage caches the rate it last computed for and rebuilds lazily.

`soft_clip` lives here too: the bus saturator, a plain tanh drive, the
"warmth" stage between EQ and the master low-pass.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqShape {
    LowShelf,
    HighShelf,
    Peaking,
}

#[derive(Debug, Clone)]
pub struct BiquadEq {
    shape: EqShape,
    frequency: f32,
    gain_db: f32,
    q: f32,

    // Direct form 1 coefficients, normalized by a0
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    coeffs_for_rate: f32, // sample rate the coefficients were computed for

    // Filter memory
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadEq {
    pub fn new(shape: EqShape, frequency: f32, gain_db: f32, q: f32) -> Self {
        Self {
            shape,
            frequency,
            gain_db,
            q: q.max(0.1),
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            coeffs_for_rate: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn low_shelf(frequency: f32, gain_db: f32) -> Self {
        Self::new(EqShape::LowShelf, frequency, gain_db, 0.707)
    }

    pub fn high_shelf(frequency: f32, gain_db: f32) -> Self {
        Self::new(EqShape::HighShelf, frequency, gain_db, 0.707)
    }

    pub fn peaking(frequency: f32, gain_db: f32, q: f32) -> Self {
        Self::new(EqShape::Peaking, frequency, gain_db, q)
    }

    fn compute_coefficients(&mut self, sample_rate: f32) {
        let a = 10.0f32.powf(self.gain_db / 40.0);
        let w0 = TAU * (self.frequency / sample_rate).min(0.45);
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * self.q);

        let (b0, b1, b2, a0, a1, a2) = match self.shape {
            EqShape::Peaking => (
                1.0 + alpha * a,
                -2.0 * cos_w0,
                1.0 - alpha * a,
                1.0 + alpha / a,
                -2.0 * cos_w0,
                1.0 - alpha / a,
            ),
            EqShape::LowShelf => {
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
                    a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
                    (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
            EqShape::HighShelf => {
                let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;
                (
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
                    -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
                    a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
                    (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
                    2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
                    (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
                )
            }
        };

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
        self.coeffs_for_rate = sample_rate;
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        if self.coeffs_for_rate != sample_rate {
            self.compute_coefficients(sample_rate);
        }

        for sample in buffer.iter_mut() {
            let x = *sample;
            let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
                - self.a1 * self.y1
                - self.a2 * self.y2;

            self.x2 = self.x1;
            self.x1 = x;
            self.y2 = self.y1;
            self.y1 = y;

            *sample = y;
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Soft saturation: tanh drive with unity gain at small amplitudes.
///
/// `drive` of 1.0 is transparent-ish; 2-4 adds audible warmth. The output
/// never exceeds [-1, 1], which is why the bus runs it before the master
/// low-pass rather than after the gain stage.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh() / drive.tanh().max(1e-6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn peak(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(64);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn sine(frequency: f32, len: usize) -> Vec<f32> {
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; len];
        osc.render(&mut buffer, frequency, SAMPLE_RATE);
        buffer
    }

    #[test]
    fn peaking_boosts_center_frequency() {
        let mut eq = BiquadEq::peaking(1_000.0, 6.0, 1.0);
        let mut on = sine(1_000.0, 1024);
        eq.render(&mut on, SAMPLE_RATE);

        eq.reset();
        let mut off = sine(100.0, 1024);
        eq.render(&mut off, SAMPLE_RATE);

        assert!(
            peak(&on) > peak(&off) * 1.5,
            "peak boost should favor the center: on={}, off={}",
            peak(&on),
            peak(&off)
        );
    }

    #[test]
    fn low_shelf_cut_attenuates_lows_only() {
        let mut eq = BiquadEq::low_shelf(200.0, -12.0);

        let mut low = sine(60.0, 2048);
        eq.render(&mut low, SAMPLE_RATE);

        eq.reset();
        let mut high = sine(4_000.0, 2048);
        eq.render(&mut high, SAMPLE_RATE);

        assert!(peak(&low) < 0.5, "lows should be cut, got {}", peak(&low));
        assert!(peak(&high) > 0.8, "highs should pass, got {}", peak(&high));
    }

    #[test]
    fn soft_clip_is_bounded_and_monotonic() {
        let mut last = -10.0;
        for i in -100..=100 {
            let x = i as f32 / 10.0;
            let y = soft_clip(x, 3.0);
            assert!((-1.0..=1.0).contains(&y));
            assert!(y >= last, "soft clip must be monotonic");
            last = y;
        }
    }

    #[test]
    fn soft_clip_near_unity_for_small_signals() {
        let y = soft_clip(0.01, 1.0);
        assert!((y - 0.01).abs() < 0.005, "small signals should pass nearly unchanged");
    }
}

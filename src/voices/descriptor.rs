use crate::dsp::envelope::PercEnvelope;
use crate::dsp::eq::{BiquadEq, EqShape};
use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::Waveform;

/*
Voice Descriptors
=================

A drum is data: tone layers, noise layers, an EQ chain and optionally a
room bleed. The descriptor knows nothing about rendering - the generic
renderer in `voices::render` interprets it, which is what lets live
synthesis and the pre-render cache share one synthesis path and keeps the
per-drum files down to tables of numbers.

Layer parameters deliberately mirror the graph nodes they configure
(`OscNode`, `NoiseNode`, `EnvNode`...), so a recipe file reads like the
chain it builds.
*/

/// One detune LFO on a tone layer. See `graph::oscillator`.
#[derive(Debug, Clone, Copy)]
pub struct Wobble {
    pub rate_hz: f32,
    pub depth_cents: f32,
    /// 0..1 phase offset, staggered between layers.
    pub phase: f32,
}

/// Envelope contour, stored as plain numbers so descriptors stay data.
#[derive(Debug, Clone, Copy)]
pub struct EnvSpec {
    pub attack: f32,
    /// Two-stage attack: `(stage_level, attack2_time)`.
    pub attack2: Option<(f32, f32)>,
    pub decay: f32,
}

impl EnvSpec {
    pub const fn percussive(attack: f32, decay: f32) -> Self {
        Self {
            attack,
            attack2: None,
            decay,
        }
    }

    pub const fn two_stage(attack: f32, stage_level: f32, attack2: f32, decay: f32) -> Self {
        Self {
            attack,
            attack2: Some((stage_level, attack2)),
            decay,
        }
    }

    pub fn build(&self) -> PercEnvelope {
        self.build_scaled(1.0)
    }

    /// Build with the decay stretched, used for heat tails.
    pub fn build_scaled(&self, decay_scale: f32) -> PercEnvelope {
        match self.attack2 {
            Some((stage_level, attack2)) => {
                PercEnvelope::two_stage(self.attack, stage_level, attack2, self.decay * decay_scale)
            }
            None => PercEnvelope::percussive(self.attack, self.decay * decay_scale),
        }
    }

    pub fn total_time(&self) -> f32 {
        self.scaled_total_time(1.0)
    }

    pub fn scaled_total_time(&self, decay_scale: f32) -> f32 {
        let attack2 = self.attack2.map_or(0.0, |(_, t)| t);
        self.attack + attack2 + self.decay * decay_scale
    }
}

/// A pitched layer: oscillator + pitch ramp + wobbles + envelope.
#[derive(Debug, Clone)]
pub struct ToneLayer {
    pub waveform: Waveform,
    /// Settle frequency in Hz.
    pub frequency: f32,
    /// Frequency the pitch ramp starts from; equal to `frequency` when the
    /// layer has no ramp.
    pub strike_frequency: f32,
    /// Ramp time constant in seconds; 0 disables the ramp.
    pub ramp_tau: f32,
    pub envelope: EnvSpec,
    pub gain: f32,
    pub wobbles: Vec<Wobble>,
}

/// Spectral focus for a noise layer.
#[derive(Debug, Clone, Copy)]
pub enum NoiseFilter {
    /// Band-pass: `(center_hz, resonance)`.
    Band(f32, f32),
    /// High-pass above the cutoff.
    High(f32),
    /// Low-pass below the cutoff.
    Low(f32),
}

/// A noise layer: table color + filter focus + envelope.
#[derive(Debug, Clone, Copy)]
pub struct NoiseLayer {
    pub color: NoiseColor,
    pub filter: NoiseFilter,
    pub envelope: EnvSpec,
    pub gain: f32,
    /// Stretches only the decay; > 1 makes a "heat tail" that rings past
    /// the body of the hit.
    pub duration_scale: f32,
}

/// One post-sum EQ stage.
#[derive(Debug, Clone, Copy)]
pub struct EqStage {
    pub shape: EqShape,
    pub frequency: f32,
    pub gain_db: f32,
    pub q: f32,
}

impl EqStage {
    pub const fn low_shelf(frequency: f32, gain_db: f32) -> Self {
        Self {
            shape: EqShape::LowShelf,
            frequency,
            gain_db,
            q: 0.707,
        }
    }

    pub const fn high_shelf(frequency: f32, gain_db: f32) -> Self {
        Self {
            shape: EqShape::HighShelf,
            frequency,
            gain_db,
            q: 0.707,
        }
    }

    pub const fn peaking(frequency: f32, gain_db: f32, q: f32) -> Self {
        Self {
            shape: EqShape::Peaking,
            frequency,
            gain_db,
            q,
        }
    }

    pub fn build(&self) -> BiquadEq {
        BiquadEq::new(self.shape, self.frequency, self.gain_db, self.q)
    }
}

/// A delayed, low-passed copy of the whole hit mixed back in quietly - a
/// few milliseconds of "room" behind the close mic.
#[derive(Debug, Clone, Copy)]
pub struct Bleed {
    /// Seconds between the hit and its reflection.
    pub delay: f32,
    pub lowpass_hz: f32,
    pub gain: f32,
}

#[derive(Debug, Clone)]
pub struct VoiceDescriptor {
    pub name: &'static str,
    pub tones: Vec<ToneLayer>,
    pub noises: Vec<NoiseLayer>,
    pub eq: Vec<EqStage>,
    pub bleed: Option<Bleed>,
}

impl VoiceDescriptor {
    /// Length of the layered body, before any bleed: the slowest layer's
    /// full contour.
    pub fn body_duration(&self) -> f32 {
        let tones = self
            .tones
            .iter()
            .map(|layer| layer.envelope.total_time())
            .fold(0.0f32, f32::max);
        let noises = self
            .noises
            .iter()
            .map(|layer| layer.envelope.scaled_total_time(layer.duration_scale))
            .fold(0.0f32, f32::max);
        tones.max(noises)
    }

    /// Full audible length of one hit, bleed included.
    pub fn duration(&self) -> f32 {
        self.body_duration() + self.bleed.map_or(0.0, |bleed| bleed.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_spec_totals_include_both_attack_stages() {
        let spec = EnvSpec::two_stage(0.003, 0.55, 0.012, 0.14);
        assert!((spec.total_time() - 0.155).abs() < 1e-6);
    }

    #[test]
    fn scaled_total_stretches_only_the_decay() {
        let spec = EnvSpec::percussive(0.01, 0.1);
        assert!((spec.scaled_total_time(2.0) - 0.21).abs() < 1e-6);
    }

    #[test]
    fn duration_is_the_slowest_layer_plus_bleed() {
        let descriptor = VoiceDescriptor {
            name: "test",
            tones: vec![ToneLayer {
                waveform: Waveform::Sine,
                frequency: 100.0,
                strike_frequency: 100.0,
                ramp_tau: 0.0,
                envelope: EnvSpec::percussive(0.0, 0.3),
                gain: 1.0,
                wobbles: Vec::new(),
            }],
            noises: vec![NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::High(1_000.0),
                envelope: EnvSpec::percussive(0.0, 0.1),
                gain: 0.5,
                duration_scale: 5.0, // 0.5 s: the heat tail dominates
            }],
            eq: Vec::new(),
            bleed: Some(Bleed {
                delay: 0.01,
                lowpass_hz: 800.0,
                gain: 0.1,
            }),
        };

        assert!((descriptor.body_duration() - 0.5).abs() < 1e-6);
        assert!((descriptor.duration() - 0.51).abs() < 1e-6);
    }
}

//! Closed hi-hat recipe.
//!
//! Three inharmonic metallic layers (two squares and a saw in a non-integer
//! ratio) under bright high-passed noise. Every metallic layer carries the
//! three-wobble stack - slow drift, vibrato, micro-jitter - with staggered
//! phases, so repeated hats never sound like the same static sample. The
//! "heat tail" is a quieter pink layer whose decay runs 2.2x the body.

use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::Waveform;
use crate::voices::descriptor::{
    EnvSpec, EqStage, NoiseFilter, NoiseLayer, ToneLayer, VoiceDescriptor, Wobble,
};

/// The shared detune stack: drift / vibrato / jitter.
/// `phase_offset` staggers the stack between layers.
pub(super) fn wobble_stack(phase_offset: f32) -> Vec<Wobble> {
    vec![
        Wobble {
            rate_hz: 0.4,
            depth_cents: 14.0,
            phase: phase_offset,
        },
        Wobble {
            rate_hz: 5.2,
            depth_cents: 7.0,
            phase: phase_offset + 0.33,
        },
        Wobble {
            rate_hz: 31.0,
            depth_cents: 3.0,
            phase: phase_offset + 0.66,
        },
    ]
}

pub(super) fn metallic_layers(decay: f32) -> Vec<ToneLayer> {
    vec![
        ToneLayer {
            waveform: Waveform::Square,
            frequency: 3_100.0,
            strike_frequency: 3_100.0,
            ramp_tau: 0.0,
            envelope: EnvSpec::percussive(0.0, decay),
            gain: 0.22,
            wobbles: wobble_stack(0.0),
        },
        ToneLayer {
            waveform: Waveform::Square,
            frequency: 4_160.0, // non-integer ratio to the first: inharmonic
            strike_frequency: 4_160.0,
            ramp_tau: 0.0,
            envelope: EnvSpec::percussive(0.0, decay),
            gain: 0.18,
            wobbles: wobble_stack(0.41),
        },
        ToneLayer {
            waveform: Waveform::Saw,
            frequency: 5_500.0,
            strike_frequency: 5_500.0,
            ramp_tau: 0.0,
            envelope: EnvSpec::percussive(0.0, decay * 0.8),
            gain: 0.12,
            wobbles: wobble_stack(0.77),
        },
    ]
}

pub fn hat_closed() -> VoiceDescriptor {
    VoiceDescriptor {
        name: "hat-closed",
        tones: metallic_layers(0.045),
        noises: vec![
            // Brightness on top of the metallic stack
            NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::High(7_500.0),
                envelope: EnvSpec::percussive(0.0, 0.05),
                gain: 0.6,
                duration_scale: 1.0,
            },
            // Heat tail: quiet, darker, 2.2x the body decay
            NoiseLayer {
                color: NoiseColor::Pink,
                filter: NoiseFilter::High(6_000.0),
                envelope: EnvSpec::percussive(0.0, 0.05),
                gain: 0.22,
                duration_scale: 2.2,
            },
        ],
        eq: vec![
            EqStage::low_shelf(300.0, -6.0),
            EqStage::high_shelf(9_500.0, 3.0),
        ],
        bleed: None,
    }
}

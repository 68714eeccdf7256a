//! Kick drum recipe.
//!
//! A sine body with a fast exponential pitch drop (160 Hz strike down to
//! 50 Hz fundamental), a short triangle "knock" partial, and a high-passed
//! click transient. A low shelf brings the weight, a small presence peak
//! keeps the click audible on small speakers, and the room bleed adds a
//! few milliseconds of low-passed depth behind the hit.

use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::Waveform;
use crate::voices::descriptor::{
    Bleed, EnvSpec, EqStage, NoiseFilter, NoiseLayer, ToneLayer, VoiceDescriptor,
};

pub fn kick() -> VoiceDescriptor {
    VoiceDescriptor {
        name: "kick",
        tones: vec![
            // Body: deep sine with the membrane pitch drop
            ToneLayer {
                waveform: Waveform::Sine,
                frequency: 50.0,
                strike_frequency: 160.0,
                ramp_tau: 0.03,
                envelope: EnvSpec::percussive(0.0, 0.45),
                gain: 1.0,
                wobbles: Vec::new(),
            },
            // Knock: a short higher partial for beater character
            ToneLayer {
                waveform: Waveform::Triangle,
                frequency: 120.0,
                strike_frequency: 260.0,
                ramp_tau: 0.015,
                envelope: EnvSpec::percussive(0.0, 0.12),
                gain: 0.25,
                wobbles: Vec::new(),
            },
        ],
        noises: vec![
            // Click: a few milliseconds of bright noise at the strike
            NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::High(4_000.0),
                envelope: EnvSpec::percussive(0.0, 0.03),
                gain: 0.12,
                duration_scale: 1.0,
            },
        ],
        eq: vec![
            EqStage::low_shelf(80.0, 3.0),
            EqStage::peaking(3_500.0, 2.0, 1.0),
        ],
        bleed: Some(Bleed {
            delay: 0.006,
            lowpass_hz: 900.0,
            gain: 0.12,
        }),
    }
}

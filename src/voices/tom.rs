//! Tom recipes - one parameterized builder, three tunings.
//!
//! A tom is structurally a small kick: sine fundamental with a pitch drop,
//! a quieter fifth above it, and a tiny stick transient. The three kit toms
//! differ only in tuning and decay - the low tom rings longest.

use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::Waveform;
use crate::voices::descriptor::{
    EnvSpec, EqStage, NoiseFilter, NoiseLayer, ToneLayer, VoiceDescriptor,
};

fn tom(name: &'static str, fundamental: f32, decay: f32) -> VoiceDescriptor {
    VoiceDescriptor {
        name,
        tones: vec![
            ToneLayer {
                waveform: Waveform::Sine,
                frequency: fundamental,
                strike_frequency: fundamental * 2.3,
                ramp_tau: 0.04,
                envelope: EnvSpec::percussive(0.0, decay),
                gain: 1.0,
                wobbles: Vec::new(),
            },
            // A fifth above the fundamental, decaying faster
            ToneLayer {
                waveform: Waveform::Triangle,
                frequency: fundamental * 1.5,
                strike_frequency: fundamental * 2.8,
                ramp_tau: 0.025,
                envelope: EnvSpec::percussive(0.0, decay * 0.4),
                gain: 0.2,
                wobbles: Vec::new(),
            },
        ],
        noises: vec![NoiseLayer {
            color: NoiseColor::White,
            filter: NoiseFilter::High(2_500.0),
            envelope: EnvSpec::percussive(0.0, 0.025),
            gain: 0.08,
            duration_scale: 1.0,
        }],
        eq: vec![
            EqStage::low_shelf(100.0, 2.0),
            // Cut the cardboard-box band
            EqStage::peaking(900.0, -1.5, 1.0),
        ],
        bleed: None,
    }
}

pub fn tom_low() -> VoiceDescriptor {
    tom("tom-low", 95.0, 0.32)
}

pub fn tom_mid() -> VoiceDescriptor {
    tom("tom-mid", 140.0, 0.26)
}

pub fn tom_hi() -> VoiceDescriptor {
    tom("tom-hi", 200.0, 0.2)
}

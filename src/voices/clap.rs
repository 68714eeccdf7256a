//! Hand clap recipe.
//!
//! Almost all noise. The main burst uses the two-stage attack - a fast ramp
//! to partial level, then a slower ramp to the peak - which reads as several
//! palms landing a few milliseconds apart. A second, darker band-passed
//! layer decays longer for the room. A faint triangle partial stops the
//! sound from being pure hiss.

use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::Waveform;
use crate::voices::descriptor::{
    EnvSpec, EqStage, NoiseFilter, NoiseLayer, ToneLayer, VoiceDescriptor,
};

pub fn clap() -> VoiceDescriptor {
    VoiceDescriptor {
        name: "clap",
        tones: vec![ToneLayer {
            waveform: Waveform::Triangle,
            frequency: 1_100.0,
            strike_frequency: 1_100.0,
            ramp_tau: 0.0,
            envelope: EnvSpec::percussive(0.003, 0.04),
            gain: 0.05,
            wobbles: Vec::new(),
        }],
        noises: vec![
            // Crack: the clap itself, two-stage "multiple palms" attack
            NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::Band(1_400.0, 0.4),
                envelope: EnvSpec::two_stage(0.003, 0.55, 0.012, 0.14),
                gain: 1.0,
                duration_scale: 1.0,
            },
            // Room: darker, longer decay behind the crack
            NoiseLayer {
                color: NoiseColor::Pink,
                filter: NoiseFilter::Band(1_100.0, 0.25),
                envelope: EnvSpec::percussive(0.01, 0.25),
                gain: 0.35,
                duration_scale: 1.0,
            },
        ],
        eq: vec![
            EqStage::low_shelf(400.0, -3.0),
            EqStage::peaking(1_500.0, 2.5, 1.1),
        ],
        bleed: None,
    }
}

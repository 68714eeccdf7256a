//! Snare drum recipe.
//!
//! Two pitched partials give the drum-head "body" (a triangle fundamental
//! and a sine overtone, both with short pitch drops); band-passed noise is
//! the wire buzz and a high-passed burst the stick snap. The EQ thins the
//! low end and pushes the 5 kHz crack; the bleed is slightly longer and
//! brighter than the kick's.

use crate::dsp::noise::NoiseColor;
use crate::dsp::oscillator::Waveform;
use crate::voices::descriptor::{
    Bleed, EnvSpec, EqStage, NoiseFilter, NoiseLayer, ToneLayer, VoiceDescriptor,
};

pub fn snare() -> VoiceDescriptor {
    VoiceDescriptor {
        name: "snare",
        tones: vec![
            ToneLayer {
                waveform: Waveform::Triangle,
                frequency: 185.0,
                strike_frequency: 330.0,
                ramp_tau: 0.02,
                envelope: EnvSpec::percussive(0.0, 0.13),
                gain: 0.5,
                wobbles: Vec::new(),
            },
            ToneLayer {
                waveform: Waveform::Sine,
                frequency: 255.0,
                strike_frequency: 400.0,
                ramp_tau: 0.012,
                envelope: EnvSpec::percussive(0.0, 0.09),
                gain: 0.3,
                wobbles: Vec::new(),
            },
        ],
        noises: vec![
            // Wire buzz: the defining snare rattle
            NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::Band(3_000.0, 0.3),
                envelope: EnvSpec::percussive(0.0, 0.18),
                gain: 0.8,
                duration_scale: 1.0,
            },
            // Snap: short bright burst on top
            NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::High(6_000.0),
                envelope: EnvSpec::percussive(0.0, 0.05),
                gain: 0.3,
                duration_scale: 1.0,
            },
        ],
        eq: vec![
            EqStage::low_shelf(150.0, -2.0),
            EqStage::peaking(4_800.0, 3.0, 0.9),
        ],
        bleed: Some(Bleed {
            delay: 0.009,
            lowpass_hz: 1_400.0,
            gain: 0.15,
        }),
    }
}

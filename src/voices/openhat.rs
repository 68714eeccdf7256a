//! Open hi-hat recipe.
//!
//! Same metallic stack as the closed hat, but the envelopes ring out: the
//! body decays ~8x longer and the heat tail stretches to 2.5x that, which
//! is what makes the hat sound "open" rather than a different instrument.

use crate::dsp::noise::NoiseColor;
use crate::voices::descriptor::{EnvSpec, EqStage, NoiseFilter, NoiseLayer, VoiceDescriptor};
use crate::voices::hihat::metallic_layers;

pub fn hat_open() -> VoiceDescriptor {
    VoiceDescriptor {
        name: "hat-open",
        tones: metallic_layers(0.35),
        noises: vec![
            NoiseLayer {
                color: NoiseColor::White,
                filter: NoiseFilter::High(7_000.0),
                envelope: EnvSpec::percussive(0.0, 0.3),
                gain: 0.5,
                duration_scale: 1.0,
            },
            // Long wash behind the ring
            NoiseLayer {
                color: NoiseColor::Pink,
                filter: NoiseFilter::High(5_500.0),
                envelope: EnvSpec::percussive(0.0, 0.25),
                gain: 0.3,
                duration_scale: 2.5,
            },
        ],
        eq: vec![
            EqStage::low_shelf(250.0, -6.0),
            EqStage::high_shelf(9_000.0, 2.5),
        ],
        bleed: None,
    }
}

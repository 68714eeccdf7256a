//! Per-drum recipes and the generic voice renderer.
//!
//! Each drum file exports a `VoiceDescriptor` - pure data. The renderer in
//! [`render`] interprets descriptors for both engine modes (live per-hit
//! synthesis and one-time pre-rendering).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod descriptor;
pub mod render;

mod clap;
mod hihat;
mod kick;
mod openhat;
mod snare;
mod tom;

pub use clap::clap;
pub use hihat::hat_closed;
pub use kick::kick;
pub use openhat::hat_open;
pub use render::{HitParams, VoiceRenderer};
pub use snare::snare;
pub use tom::{tom_hi, tom_low, tom_mid};

use descriptor::VoiceDescriptor;

/// Identifies one track in a pattern.
///
/// `HatClosed32` is the auxiliary dense accent track: a second closed-hat
/// lane that the scheduler gates on the excitement parameter. It plays the
/// same sound as `HatClosed`, which is why [`VoiceId::DRUMS`] (the set of
/// distinct sounds, used by the pre-render cache) has 8 entries while the
/// pattern grid has 9 lanes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceId {
    Kick,
    Snare,
    Clap,
    TomLow,
    TomMid,
    TomHi,
    HatClosed,
    HatOpen,
    HatClosed32,
}

impl VoiceId {
    /// All pattern lanes, in the fixed enumeration order the scheduler
    /// walks them.
    pub const ALL: [VoiceId; 9] = [
        VoiceId::Kick,
        VoiceId::Snare,
        VoiceId::Clap,
        VoiceId::TomLow,
        VoiceId::TomMid,
        VoiceId::TomHi,
        VoiceId::HatClosed,
        VoiceId::HatOpen,
        VoiceId::HatClosed32,
    ];

    /// The distinct drum sounds (the accent lane reuses the closed hat).
    pub const DRUMS: [VoiceId; 8] = [
        VoiceId::Kick,
        VoiceId::Snare,
        VoiceId::Clap,
        VoiceId::TomLow,
        VoiceId::TomMid,
        VoiceId::TomHi,
        VoiceId::HatClosed,
        VoiceId::HatOpen,
    ];

    /// The sound this lane plays. Accent lane folds onto the closed hat.
    pub fn sound(self) -> VoiceId {
        match self {
            VoiceId::HatClosed32 => VoiceId::HatClosed,
            other => other,
        }
    }

    pub fn descriptor(self) -> VoiceDescriptor {
        match self.sound() {
            VoiceId::Kick => kick(),
            VoiceId::Snare => snare(),
            VoiceId::Clap => clap(),
            VoiceId::TomLow => tom_low(),
            VoiceId::TomMid => tom_mid(),
            VoiceId::TomHi => tom_hi(),
            VoiceId::HatClosed => hat_closed(),
            VoiceId::HatOpen => hat_open(),
            VoiceId::HatClosed32 => unreachable!("sound() folds the accent lane"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VoiceId::Kick => "kick",
            VoiceId::Snare => "snare",
            VoiceId::Clap => "clap",
            VoiceId::TomLow => "tomLow",
            VoiceId::TomMid => "tomMid",
            VoiceId::TomHi => "tomHi",
            VoiceId::HatClosed => "hatClosed",
            VoiceId::HatOpen => "hatOpen",
            VoiceId::HatClosed32 => "hatClosed32",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_lane_plays_the_closed_hat() {
        assert_eq!(VoiceId::HatClosed32.sound(), VoiceId::HatClosed);
        assert_eq!(
            VoiceId::HatClosed32.descriptor().name,
            VoiceId::HatClosed.descriptor().name
        );
    }

    #[test]
    fn every_drum_has_a_descriptor_with_layers() {
        for voice in VoiceId::DRUMS {
            let desc = voice.descriptor();
            assert!(
                !desc.tones.is_empty() || !desc.noises.is_empty(),
                "{voice:?} has no layers"
            );
            assert!(desc.duration() > 0.0);
        }
    }
}

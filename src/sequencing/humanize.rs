use std::f64::consts::TAU;

use crate::sequencing::transport::Transport;
use crate::voices::VoiceId;

/*
Groove LFO
==========

Humanization here is NOT per-hit randomness. The LFO is a pure function of
musical phase - a sine over an 8-beat period - and every trigger samples it
at its own scheduled time:

    phase(t) = sin(TAU * (beats_at(t) mod 8) / 8)        in [-1, 1]

Two hits close together get nearly the same offset; hits four beats apart
get opposite ones. The result is a repeating push-and-pull (rushing into
one half of the phrase, laying back in the other) that reads as a player's
groove, where independent jitter would just read as sloppiness.

Per-voice depths scale the phase into actual offsets. The tables encode
kit intuition: the kick anchors (zero pan, tiny timing), while the hats -
which carry most of the perceived groove - move the most in every
dimension. The numbers are empirically tuned stylistic defaults.
*/

const PERIOD_BEATS: f64 = 8.0;

/// Per-voice humanization depths.
#[derive(Debug, Clone, Copy)]
pub struct GrooveDepth {
    /// Seconds of timing push/pull at full phase.
    pub time: f64,
    /// Fractional velocity excursion at full phase.
    pub velocity: f32,
    /// Pan excursion at full phase (-1..1 field).
    pub pan: f32,
}

/// Result of one humanization draw for one trigger.
#[derive(Debug, Clone, Copy)]
pub struct Humanization {
    pub time_offset: f64,
    pub velocity_scale: f32,
    pub pan: f32,
}

/// Depth table and drop weights, indexed by voice.
fn depth(voice: VoiceId) -> GrooveDepth {
    match voice {
        VoiceId::Kick => GrooveDepth {
            time: 0.004,
            velocity: 0.06,
            pan: 0.0,
        },
        VoiceId::Snare => GrooveDepth {
            time: 0.006,
            velocity: 0.10,
            pan: 0.02,
        },
        VoiceId::Clap => GrooveDepth {
            time: 0.008,
            velocity: 0.12,
            pan: 0.05,
        },
        VoiceId::TomLow | VoiceId::TomMid | VoiceId::TomHi => GrooveDepth {
            time: 0.005,
            velocity: 0.08,
            pan: 0.04,
        },
        VoiceId::HatClosed | VoiceId::HatClosed32 => GrooveDepth {
            time: 0.012,
            velocity: 0.25,
            pan: 0.12,
        },
        VoiceId::HatOpen => GrooveDepth {
            time: 0.010,
            velocity: 0.18,
            pan: 0.10,
        },
    }
}

/// How eagerly a lane sheds hits as excitement falls. Kick and snare hold
/// the groove and never drop; the accent lane is the most volatile.
fn drop_weight(voice: VoiceId) -> f32 {
    match voice {
        VoiceId::Kick | VoiceId::Snare => 0.0,
        VoiceId::Clap | VoiceId::TomLow | VoiceId::TomMid | VoiceId::TomHi => 0.1,
        VoiceId::HatClosed => 0.25,
        VoiceId::HatOpen => 0.2,
        VoiceId::HatClosed32 => 0.85,
    }
}

/// The accent lane only exists at high excitement.
const ACCENT_GATE: f32 = 0.8;

#[derive(Debug, Clone, Copy)]
pub struct GrooveLfo {
    transport: Transport,
}

impl GrooveLfo {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn set_transport(&mut self, transport: Transport) {
        self.transport = transport;
    }

    /// Raw phase in [-1, 1] at audio-clock time `t`.
    #[inline]
    pub fn phase(&self, t: f64) -> f64 {
        let beats = self.transport.beats_at(t).rem_euclid(PERIOD_BEATS);
        (TAU * beats / PERIOD_BEATS).sin()
    }

    /// Humanization draw for one voice at one scheduled time.
    pub fn humanize(&self, voice: VoiceId, t: f64) -> Humanization {
        let phase = self.phase(t);
        let depth = depth(voice);

        Humanization {
            time_offset: phase * depth.time,
            velocity_scale: 1.0 + phase as f32 * depth.velocity,
            pan: phase as f32 * depth.pan,
        }
    }

    /// Gate check for one hit at the given excitement level. Returns true
    /// if the hit should play.
    ///
    /// The accent lane (`HatClosed32`) is hard-gated below
    /// 0.8 excitement; above the gate its drop chance falls linearly to
    /// exactly zero at excitement 1.0. Other lanes shed hits with a small
    /// probability weighted by `(1 - excitement)`.
    pub fn passes_gate(voice: VoiceId, excitement: f32, draw: f32) -> bool {
        let excitement = excitement.clamp(0.0, 1.0);
        let weight = drop_weight(voice);

        let drop_chance = if voice == VoiceId::HatClosed32 {
            if excitement < ACCENT_GATE {
                return false;
            }
            weight * (1.0 - excitement) / (1.0 - ACCENT_GATE)
        } else {
            weight * (1.0 - excitement)
        };

        draw >= drop_chance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lfo(bpm: f64) -> GrooveLfo {
        GrooveLfo::new(Transport::new(0.0, bpm))
    }

    #[test]
    fn phase_is_bounded_everywhere() {
        let lfo = lfo(137.0);
        for i in 0..10_000 {
            let t = i as f64 * 0.013;
            let phase = lfo.phase(t);
            assert!((-1.0..=1.0).contains(&phase), "phase {phase} out of range at t={t}");
        }
    }

    #[test]
    fn phase_repeats_every_eight_beats() {
        let lfo = lfo(120.0); // 8 beats = 4 seconds
        for t in [0.3, 1.7, 2.9] {
            assert!((lfo.phase(t) - lfo.phase(t + 4.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn phase_is_smooth_across_nearby_queries() {
        // Re-querying at slightly different real times must yield smoothly
        // varying offsets, not jumps - that is what separates groove from
        // jitter
        let lfo = lfo(120.0);
        let a = lfo.phase(1.000);
        let b = lfo.phase(1.005);
        assert!((a - b).abs() < 0.02);
    }

    #[test]
    fn humanization_respects_depth_bounds() {
        let lfo = lfo(97.0);
        for voice in VoiceId::ALL {
            let depth = super::depth(voice);
            for i in 0..1_000 {
                let t = i as f64 * 0.021;
                let h = lfo.humanize(voice, t);
                assert!(h.time_offset.abs() <= depth.time + 1e-12);
                assert!(
                    h.velocity_scale >= 1.0 - depth.velocity - 1e-6
                        && h.velocity_scale <= 1.0 + depth.velocity + 1e-6
                );
                assert!(h.pan.abs() <= depth.pan + 1e-6);
            }
        }
    }

    #[test]
    fn kick_never_pans() {
        let lfo = lfo(120.0);
        for i in 0..100 {
            assert_eq!(lfo.humanize(VoiceId::Kick, i as f64 * 0.1).pan, 0.0);
        }
    }

    #[test]
    fn accent_lane_is_gated_off_at_low_excitement() {
        for draw in [0.0, 0.5, 0.999] {
            assert!(!GrooveLfo::passes_gate(VoiceId::HatClosed32, 0.0, draw));
            assert!(!GrooveLfo::passes_gate(VoiceId::HatClosed32, 0.79, draw));
        }
    }

    #[test]
    fn accent_lane_always_passes_at_full_excitement() {
        for draw in [0.0, 0.0001, 0.5, 0.999] {
            assert!(GrooveLfo::passes_gate(VoiceId::HatClosed32, 1.0, draw));
        }
    }

    #[test]
    fn kick_and_snare_never_drop() {
        for excitement in [0.0, 0.3, 0.8] {
            assert!(GrooveLfo::passes_gate(VoiceId::Kick, excitement, 0.0));
            assert!(GrooveLfo::passes_gate(VoiceId::Snare, excitement, 0.0));
        }
    }
}

use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::voices::VoiceId;

/*
Pattern Grid
============

The timeline is fixed: 32 bars of 4 beats, each beat divided into 12 steps.
Twelve subdivisions per beat is the finest grid that lands both straight
sixteenths (every 3 steps) and triplet feels (every 4 steps) on integer
indices, which is why it is the resolution and not a power of two.

A pattern is just membership: for each lane, the set of absolute step
indices (0..1536) where it fires. Consumers only ever ask "does lane X
contain step N" - there is no ordering requirement and no validation; the
pattern is supplied by external preset tables and read as-is. Out-of-range
indices simply never match.
*/

pub const STEPS_PER_BEAT: usize = 12;
pub const BEATS_PER_BAR: usize = 4;
pub const STEPS_PER_BAR: usize = STEPS_PER_BEAT * BEATS_PER_BAR; // 48
pub const BARS: usize = 32;
pub const PATTERN_LEN: usize = STEPS_PER_BAR * BARS; // 1536

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    lanes: HashMap<VoiceId, HashSet<u32>>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style lane assignment.
    pub fn with_steps(mut self, voice: VoiceId, steps: impl IntoIterator<Item = u32>) -> Self {
        self.set_steps(voice, steps);
        self
    }

    pub fn set_steps(&mut self, voice: VoiceId, steps: impl IntoIterator<Item = u32>) {
        self.lanes.insert(voice, steps.into_iter().collect());
    }

    /// Membership test - the only query the scheduler makes.
    #[inline]
    pub fn contains(&self, voice: VoiceId, step: u32) -> bool {
        self.lanes
            .get(&voice)
            .is_some_and(|steps| steps.contains(&step))
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.values().all(|steps| steps.is_empty())
    }

    /// Number of hits across all lanes.
    pub fn hit_count(&self) -> usize {
        self.lanes.values().map(|steps| steps.len()).sum()
    }
}

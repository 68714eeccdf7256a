use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

use crate::voices::{VoiceId, VoiceRenderer, HitParams};

/*
Pre-Render Cache
================

Cached playback trades per-hit variation for zero render cost at trigger
time: each drum is rendered once at full velocity, parked in an immutable
buffer, and every later hit replays it (velocity becomes a playback gain).

Slots are `OnceLock`s behind an `Arc`, so readers on the control thread
never block and a buffer can never be replaced once written. Warm-up runs
on a background thread; until a slot fills, triggers for that drum are
skipped with a debug log rather than stalling anything. In practice all
eight drums render well inside the scheduler's startup margin.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Uninitialized,
    Rendering,
    Ready,
}

struct Slots {
    buffers: [OnceLock<Arc<[f32]>>; 8],
    started: AtomicBool,
}

#[derive(Clone)]
pub struct PreRenderCache {
    slots: Arc<Slots>,
}

fn slot_index(voice: VoiceId) -> usize {
    match voice.sound() {
        VoiceId::Kick => 0,
        VoiceId::Snare => 1,
        VoiceId::Clap => 2,
        VoiceId::TomLow => 3,
        VoiceId::TomMid => 4,
        VoiceId::TomHi => 5,
        VoiceId::HatClosed => 6,
        VoiceId::HatOpen => 7,
        // sound() already folded the accent lane
        VoiceId::HatClosed32 => unreachable!(),
    }
}

impl PreRenderCache {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Slots {
                buffers: Default::default(),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Kick off background rendering of all eight drums. Subsequent calls
    /// are no-ops: a slot is filled exactly once for the cache's lifetime.
    pub fn warm_up(&self, sample_rate: f32) {
        if self.slots.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let slots = Arc::clone(&self.slots);
        thread::spawn(move || fill_all(&slots, sample_rate));
    }

    /// Render all drums on the calling thread. For offline use and tests.
    pub fn warm_up_blocking(&self, sample_rate: f32) {
        if self.slots.started.swap(true, Ordering::SeqCst) {
            // Another warm-up owns the fill; wait for it to finish
            while !self.is_ready() {
                thread::yield_now();
            }
            return;
        }
        fill_all(&self.slots, sample_rate);
    }

    pub fn state(&self, voice: VoiceId) -> CacheState {
        if self.slots.buffers[slot_index(voice)].get().is_some() {
            CacheState::Ready
        } else if self.slots.started.load(Ordering::SeqCst) {
            CacheState::Rendering
        } else {
            CacheState::Uninitialized
        }
    }

    pub fn is_ready(&self) -> bool {
        self.slots.buffers.iter().all(|slot| slot.get().is_some())
    }

    /// The cached buffer for a drum, or `None` while it is still warming.
    pub fn buffer(&self, voice: VoiceId) -> Option<Arc<[f32]>> {
        self.slots.buffers[slot_index(voice)].get().cloned()
    }
}

impl Default for PreRenderCache {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_all(slots: &Slots, sample_rate: f32) {
    let mut renderer = VoiceRenderer::new(sample_rate);
    for voice in VoiceId::DRUMS {
        let descriptor = voice.descriptor();
        let samples = renderer.render(&descriptor, HitParams::default());
        log::debug!(
            "pre-rendered {} ({} samples)",
            voice.name(),
            samples.len()
        );
        let buffer: Arc<[f32]> = samples.into();
        // set() can only fail if warm-up ran twice, which started prevents
        let _ = slots.buffers[slot_index(voice)].set(buffer);
    }
    log::info!("pre-render cache ready");
}

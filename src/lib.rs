//! Procedural drum synthesis with a look-ahead pattern scheduler.
//!
//! Everything audible is synthesized from primitive oscillators and noise:
//! kick, snare, clap, three toms and closed/open hats are described by
//! data-only voice descriptors and rendered by one generic renderer. A
//! look-ahead scheduler walks a 12-steps-per-beat pattern grid against the
//! audio clock, humanizing timing/velocity/pan with a slow beat-phase LFO.
//!
//! Layering, bottom up:
//! - [`dsp`]: realtime-safe primitives (oscillators, envelopes, filters, EQ)
//! - [`graph`]: composable audio graph nodes with fluent combinators
//! - [`voices`]: per-drum descriptor tables + the generic voice renderer
//! - [`sequencing`]: pattern grid, transport, groove humanizer
//! - [`engine`]: look-ahead scheduler, pre-render cache, mix bus, facade
//! - [`io`]: cpal output sink and the audio clock

pub mod dsp;
pub mod engine;
pub mod graph;
pub mod io;
pub mod sequencing;
pub mod voices;

pub use engine::{DrumEngine, EngineConfig, EngineError, HitOptions, RenderMode};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;

/// Envelope floor: exponential decays stop here instead of chasing zero,
/// avoiding denormals and an audible click at hard cutoff.
pub(crate) const ENV_FLOOR: f32 = 0.001;

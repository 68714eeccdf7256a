//! Realtime-safe DSP primitives with no graph knowledge.
//!
//! Everything here renders into caller-provided buffers and never allocates
//! on the audio path. The graph layer wraps these blocks with the ergonomics
//! needed for voice design.

pub mod envelope;
pub mod eq;
pub mod filter;
pub mod noise;
pub mod oscillator;

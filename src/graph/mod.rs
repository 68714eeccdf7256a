//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with the ergonomics needed
//! for drum design: one-shot triggering, activity tracking, and block-based
//! rendering. The `extensions` module adds fluent helpers so a voice layer
//! reads as a chain: `osc.amplify(env).through(filter)`.

/// Multiply two signals together (amplitude enveloping).
pub mod amplify;
/// Percussive envelope generator node.
pub mod envelope;
/// EQ stage node (shelf / peaking biquads).
pub mod eq;
/// Fluent combinators (`.amplify()`, `.through()`, `.gain()`).
pub mod extensions;
/// State-variable filter node.
pub mod filter;
/// Constant gain scaling.
pub mod gain;
/// Noise-table reader node.
pub mod noise;
/// Core traits shared by all graph nodes.
pub mod node;
/// Pitched oscillator with exponential pitch ramp and detune wobble.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};

//! Audio device plumbing: the cpal output stream and the frame clock.

pub mod output;

pub use output::{AudioClock, AudioOutput, ScheduledHit};

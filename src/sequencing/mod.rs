//! Musical timing: the pattern grid, the transport, and the groove
//! humanizer.

pub mod humanize;
pub mod pattern;
pub mod transport;

pub use humanize::{GrooveLfo, Humanization};
pub use pattern::{Pattern, BARS, BEATS_PER_BAR, PATTERN_LEN, STEPS_PER_BAR, STEPS_PER_BEAT};
pub use transport::Transport;

//! The scheduled-spike value type shared by the encoder, queue, and merger.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single spike scheduled to occur at `timestamp` on `channel`.
///
/// Immutable once placed: nothing in this crate mutates a `ScheduledSpike`
/// after it's written into a scheduler buffer or queue.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduledSpike {
    /// When the spike occurs, in seconds.
    pub timestamp: f32,
    /// The channel the spike occurs on.
    pub channel: u16,
}

impl ScheduledSpike {
    /// Creates a new scheduled spike.
    pub fn new(timestamp: f32, channel: u16) -> Self {
        Self { timestamp, channel }
    }
}

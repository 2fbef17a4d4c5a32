//! Error types for the ports of the engine that cross a trust boundary.
//!
//! The per-spike hot path (`Neuron::spike`, `Cortex::spike`, `Hippocampus::
//! receive_input`, `Brain::spike`) takes channel indices as already-validated
//! internal values and never returns a `Result` — an out-of-range index there
//! is a programmer error, not a recoverable condition. Construction-time and
//! encoder-facing entry points that take externally supplied sizes do return
//! `Result`.

use thiserror::Error;

/// Errors raised while configuring or driving the spike scheduler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpikeError {
    /// A scheduler or brain was constructed with zero channels.
    #[error("num_channels must be greater than zero")]
    NoChannels,

    /// An embedding passed to `schedule_embedding` didn't match the
    /// scheduler's channel count.
    #[error("embedding length mismatch: expected {expected} channels, got {actual}")]
    EmbeddingLengthMismatch {
        /// The scheduler's configured channel count.
        expected: usize,
        /// The length of the slice that was passed in.
        actual: usize,
    },
}

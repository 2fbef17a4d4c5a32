//! A spiking neural computation engine.
//!
//! Spikes arrive on numbered input channels, decay exponentially between
//! events, and drive fixed-threshold integrate-and-fire neurons in a
//! [`Cortex`]. A [`Hippocampus`] watches the same spikes, builds candidate
//! neurons from their recent statistics, and promotes them into the cortex
//! once learned — all without gradient descent, backpropagation, or any
//! floating-point weight that survives past promotion.
//!
//! [`Brain`] wires a cortex and a hippocampus together as the main entry
//! point; [`SpikeScheduler`] converts scalar values and byte embeddings into
//! the spike trains a brain consumes.
//!
//! # Features
//!
//! - `logging` (default): structured tracing of promotion and reset events
//! - `serde`: (de)serialization of [`Parameters`] — learned network state is
//!   never persisted, by design
//! - `full`: all features enabled

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod brain;
pub mod cortex;
mod decay;
pub mod error;
pub mod hippocampus;
mod neuron;
pub mod params;
pub mod queue;
pub mod scheduler;
pub mod spike;

pub use brain::Brain;
pub use cortex::Cortex;
pub use error::SpikeError;
pub use hippocampus::Hippocampus;
pub use params::Parameters;
pub use queue::{SequenceMerger, SpikeQueue};
pub use scheduler::SpikeScheduler;
pub use spike::ScheduledSpike;

/// Library version following semantic versioning.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn a_brain_end_to_end_can_learn_and_fire() {
        let parameters = Parameters::default();
        let mut brain = Brain::new(2, &parameters);
        let mut outputs = Vec::new();
        let mut t = 0.0f32;
        for _ in 0..500 {
            outputs.clear();
            brain.spike(t, 0, true, &parameters, &mut outputs);
            t += 0.05;
        }
        assert!(brain.neuron_count() > 0);
    }
}

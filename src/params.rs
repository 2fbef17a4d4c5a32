//! Tunable parameters shared across the encoder, cortex, and hippocampus.
//!
//! Mirrors the original `Parameters` class: a small bag of immutable floats
//! with one blessed set of defaults. Unlike learned network state (which this
//! crate never persists, per its scope), `Parameters` is plain configuration
//! and can round-trip through `serde` when the `serde` feature is enabled —
//! the same way the reference crate's `RouterConfig` does.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the scheduler, cortex, and hippocampus.
///
/// All durations are in seconds; `SPIKE_FRACTION` and `NEGATIVE_SPIKE_FRACTION`
/// are unitless fractions in `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameters {
    /// The minimum interval between spikes on an encoded channel, and the
    /// refractory duration of every cortex neuron.
    pub min_spike_interval: f32,
    /// The duration spikes are scheduled over for a single embedding sample.
    pub seconds_per_sample: f32,
    /// The fraction of the distance to 1 that a spike closes.
    pub spike_fraction: f32,
    /// The half life, in seconds, of cumulative-input decay.
    pub decay_half_life: f32,
    /// The fraction of the distance to 1 that a negative-weight spike closes.
    pub negative_spike_fraction: f32,
    /// The half life, in seconds, of the hippocampus negative-weight
    /// controller.
    pub negative_weight_half_life: f32,
}

impl Default for Parameters {
    /// The parameter set the original implementation shipped as
    /// `DEFAULT_PARAMETERS`.
    fn default() -> Self {
        Self {
            min_spike_interval: 0.01,
            seconds_per_sample: 0.5,
            spike_fraction: 0.08,
            decay_half_life: 0.5,
            negative_spike_fraction: 0.08,
            negative_weight_half_life: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_constants() {
        let p = Parameters::default();
        assert_eq!(p.min_spike_interval, 0.01);
        assert_eq!(p.seconds_per_sample, 0.5);
        assert_eq!(p.spike_fraction, 0.08);
        assert_eq!(p.decay_half_life, 0.5);
        assert_eq!(p.negative_spike_fraction, 0.08);
        assert_eq!(p.negative_weight_half_life, 5.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn round_trips_through_json() {
        let p = Parameters::default();
        let json = serde_json::to_string(&p).unwrap();
        let restored: Parameters = serde_json::from_str(&json).unwrap();
        assert_eq!(p, restored);
    }
}

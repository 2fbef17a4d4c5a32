//! The hippocampus: builds candidate neurons from recent input statistics and
//! promotes them into the cortex once a channel's negative weight correctly
//! balances its inputs against its outputs.

use crate::cortex::Cortex;
use crate::decay::DecayingValue;
use crate::params::Parameters;

/// The negative weight a channel's controller settles on is never allowed
/// past this floor, so a channel with no contradicting outputs at all can
/// still eventually promote a neuron instead of decaying the weight away to
/// nothing.
const MAX_NEGATIVE_WEIGHT: i32 = -4;

/// One channel's worth of under-construction-neuron bookkeeping.
///
/// Each `HcChannel` tracks a candidate neuron that fires onto its own output
/// channel. `negative_weight_controller` rises on every input spike and
/// falls on every output spike on this channel; while it hasn't settled
/// (`weight_is_correct` is false) the candidate keeps resetting instead of
/// being promoted.
#[derive(Debug, Clone)]
struct HcChannel {
    id: u16,
    activation_level: i16,
    negative_weight_controller: DecayingValue,
    weight_is_correct: bool,
}

impl HcChannel {
    fn new(id: u16, negative_weight_half_life: f32, negative_weight_spike_fraction: f32) -> Self {
        Self {
            id,
            activation_level: 0,
            negative_weight_controller: DecayingValue::new(
                negative_weight_half_life,
                negative_weight_spike_fraction,
            ),
            weight_is_correct: false,
        }
    }

    fn receive_input(&mut self, timestamp: f32) {
        self.negative_weight_controller.spike(timestamp);
        self.activation_level = 0;
    }

    fn receive_output(&mut self, timestamp: f32) {
        self.negative_weight_controller.negative_spike(timestamp);
        self.activation_level = 0;
    }

    /// The negative weight applied to every input of the under-construction
    /// neuron, floored at [`MAX_NEGATIVE_WEIGHT`].
    fn calculate_negative_weight(&mut self, timestamp: f32) -> i8 {
        let negative_weight =
            ((self.negative_weight_controller.get_value(timestamp) - 1.0) * 128.0).round() as i32;
        negative_weight.min(MAX_NEGATIVE_WEIGHT) as i8
    }

    fn reset(&mut self) {
        self.activation_level = 0;
        self.weight_is_correct = false;
        self.negative_weight_controller.reset();
    }

    /// Applies a weighted spike to the under-construction neuron. Returns
    /// `true` if it fires.
    fn activate(&mut self, timestamp: f32, weighted_input: i8) -> bool {
        let negative_weight = self.calculate_negative_weight(timestamp);
        self.activation_level += weighted_input as i16 + negative_weight as i16;
        if self.activation_level >= 128 {
            self.activation_level = 0;
            self.weight_is_correct = true;
            return true;
        }
        if self.activation_level < 0 {
            self.activation_level = 0;
        }
        false
    }
}

/// Builds and promotes cortex neurons from recent input statistics.
///
/// One [`crate::decay::DecayingValue`] per input channel tracks that
/// channel's recent activity (`cumulative_inputs`); one [`HcChannel`] per
/// channel builds a candidate neuron that would fire onto that same channel
/// number. When a candidate's negative weight has settled into balance with
/// its outputs, the candidate snapshot is promoted into the cortex as a real
/// neuron and the candidate starts over.
#[derive(Debug, Clone)]
pub struct Hippocampus {
    cumulative_inputs: Vec<DecayingValue>,
    channels: Vec<HcChannel>,
}

impl Hippocampus {
    /// Creates a hippocampus with one candidate channel per input channel.
    pub fn new(num_channels: u16, parameters: &Parameters) -> Self {
        let cumulative_inputs = (0..num_channels)
            .map(|_| DecayingValue::new(parameters.decay_half_life, parameters.spike_fraction))
            .collect();
        let channels = (0..num_channels)
            .map(|id| {
                HcChannel::new(
                    id,
                    parameters.negative_weight_half_life,
                    parameters.negative_spike_fraction,
                )
            })
            .collect();
        Self {
            cumulative_inputs,
            channels,
        }
    }

    /// Processes a spike on `input_channel`, promoting any candidate neuron
    /// that fires into `cortex` and appending the output channels that fired
    /// to `outputs`.
    pub fn receive_input(
        &mut self,
        timestamp: f32,
        input_channel: u16,
        parameters: &Parameters,
        cortex: &mut Cortex,
        outputs: &mut Vec<u16>,
    ) {
        let weighted_input = self.cumulative_inputs[input_channel as usize].get_weight(timestamp);
        if weighted_input > 0 {
            let num_channels = self.cumulative_inputs.len();
            for channel in &mut self.channels {
                if !channel.activate(timestamp, weighted_input) {
                    continue;
                }
                outputs.push(channel.id);
                if !channel.weight_is_correct {
                    continue;
                }
                let mut weights = Vec::with_capacity(num_channels);
                for cumulative_input in &mut self.cumulative_inputs {
                    let negative_weight = channel.calculate_negative_weight(timestamp);
                    weights.push(cumulative_input.get_weight(timestamp) + negative_weight);
                }
                cortex.add_neuron(channel.id, &weights, parameters);
                #[cfg(feature = "logging")]
                tracing::debug!(channel = channel.id, %timestamp, "promoted candidate neuron to cortex");
                channel.reset();
            }
        }

        self.cumulative_inputs[input_channel as usize].spike(timestamp);
        self.channels[input_channel as usize].receive_input(timestamp);
    }

    /// Processes a spike on `output_channel`, nudging that channel's
    /// candidate towards balance.
    pub fn receive_output(&mut self, timestamp: f32, output_channel: u16) {
        self.channels[output_channel as usize].receive_output(timestamp);
    }

    /// Resets every cumulative input and candidate channel.
    pub fn reset(&mut self) {
        for cumulative_input in &mut self.cumulative_inputs {
            cumulative_input.reset();
        }
        for channel in &mut self.channels {
            channel.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Parameters {
        Parameters::default()
    }

    #[test]
    fn negative_weight_is_floored_at_max() {
        let mut channel = HcChannel::new(0, 5.0, 0.08);
        // No inputs at all: the controller stays at 0, giving value - 1 = -1,
        // i.e. -128 rounded — always clamped to the floor.
        assert_eq!(channel.calculate_negative_weight(0.0), -4);
    }

    #[test]
    fn negative_weight_rises_towards_zero_with_input_spikes() {
        let mut channel = HcChannel::new(0, 5.0, 0.5);
        let floor = channel.calculate_negative_weight(0.0);
        for i in 0..20 {
            channel.receive_input(i as f32 * 0.01);
        }
        let risen = channel.calculate_negative_weight(0.2);
        assert!(risen > floor);
    }

    #[test]
    fn activate_fires_and_resets_activation() {
        let mut channel = HcChannel::new(0, 5.0, 0.08);
        // with no input spikes the negative weight stays at the floor (-4),
        // so a positive weighted input of 127 needs more than one spike.
        assert!(!channel.activate(0.0, 127));
        assert!(channel.activate(0.0, 127));
        assert!(channel.weight_is_correct);
    }

    #[test]
    fn activate_clips_negative_activation_at_zero() {
        let mut channel = HcChannel::new(0, 5.0, 0.08);
        assert!(!channel.activate(0.0, 0));
        assert_eq!(channel.activation_level, 0);
    }

    #[test]
    fn hippocampus_does_not_promote_from_a_single_weak_input() {
        let mut hippocampus = Hippocampus::new(4, &params());
        let mut cortex = Cortex::new();
        let mut outputs = Vec::new();
        hippocampus.receive_input(0.0, 0, &params(), &mut cortex, &mut outputs);
        assert_eq!(cortex.neuron_count(), 0);
        assert!(outputs.is_empty());
    }

    #[test]
    fn repeated_input_on_one_channel_eventually_promotes_a_neuron() {
        let mut hippocampus = Hippocampus::new(2, &params());
        let mut cortex = Cortex::new();
        let mut outputs = Vec::new();
        let mut t = 0.0f32;
        for _ in 0..500 {
            hippocampus.receive_input(t, 0, &params(), &mut cortex, &mut outputs);
            t += 0.05;
        }
        assert!(cortex.neuron_count() > 0, "expected at least one promoted neuron");
    }

    #[test]
    fn receive_output_does_not_panic_on_any_channel() {
        let mut hippocampus = Hippocampus::new(3, &params());
        hippocampus.receive_output(0.0, 0);
        hippocampus.receive_output(1.0, 2);
    }

    #[test]
    fn reset_clears_cumulative_inputs() {
        let mut hippocampus = Hippocampus::new(2, &params());
        let mut cortex = Cortex::new();
        let mut outputs = Vec::new();
        hippocampus.receive_input(0.0, 0, &params(), &mut cortex, &mut outputs);
        hippocampus.reset();
        assert_eq!(hippocampus.cumulative_inputs[0].get_weight(0.0), 0);
    }
}

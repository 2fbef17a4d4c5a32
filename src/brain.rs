//! A processing unit combining a cerebral cortex with a learning hippocampus.

use crate::cortex::Cortex;
use crate::hippocampus::Hippocampus;
use crate::params::Parameters;

/// A cortex and a hippocampus wired together: every input spike goes to both,
/// and every channel that fires (from either) is fed back into the
/// hippocampus as training signal.
#[derive(Debug, Clone)]
pub struct Brain {
    cortex: Cortex,
    hippocampus: Hippocampus,
}

impl Brain {
    /// Creates a brain with `num_channels` input/output channels.
    pub fn new(num_channels: u16, parameters: &Parameters) -> Self {
        Self {
            cortex: Cortex::new(),
            hippocampus: Hippocampus::new(num_channels, parameters),
        }
    }

    /// Reserves storage for at least `num_neurons` additional cortex neurons.
    pub fn reserve(&mut self, num_neurons: usize) {
        self.cortex.reserve(num_neurons);
    }

    /// Sends a spike to `input_channel`. When `use_hippocampus` is true,
    /// learning is enabled: candidate neurons are activated and may be
    /// promoted into the cortex, and every channel that fires (cortex or
    /// hippocampus) is fed back into the hippocampus as training signal.
    /// Returns the output channels that fired, appended to `outputs`.
    pub fn spike(
        &mut self,
        timestamp: f32,
        input_channel: u16,
        use_hippocampus: bool,
        parameters: &Parameters,
        outputs: &mut Vec<u16>,
    ) {
        self.cortex.spike(timestamp, input_channel, outputs);

        if use_hippocampus {
            self.hippocampus
                .receive_input(timestamp, input_channel, parameters, &mut self.cortex, outputs);

            for &channel in outputs.iter() {
                self.hippocampus.receive_output(timestamp, channel);
            }
        }
    }

    /// Resets the hippocampus and cortex.
    pub fn reset(&mut self) {
        #[cfg(feature = "logging")]
        tracing::debug!(neuron_count = self.cortex.neuron_count(), "resetting brain");
        self.hippocampus.reset();
        self.cortex.reset();
    }

    /// The number of neurons currently in the cortex.
    pub fn neuron_count(&self) -> u32 {
        self.cortex.neuron_count()
    }
}

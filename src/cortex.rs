//! An append-only, insertion-ordered collection of neurons.

use crate::neuron::Neuron;
use crate::params::Parameters;

/// The cerebral cortex: a growable, insertion-ordered set of neurons that
/// never shrinks during a session.
///
/// Iteration order is always insertion order; two neurons may share an
/// output channel and both fire on the same event — there's no
/// deduplication.
#[derive(Debug, Clone, Default)]
pub struct Cortex {
    neurons: Vec<Neuron>,
}

impl Cortex {
    /// Creates an empty cortex.
    pub fn new() -> Self {
        Self { neurons: Vec::new() }
    }

    /// Reserves storage for at least `num_neurons` additional neurons.
    pub fn reserve(&mut self, num_neurons: usize) {
        self.neurons.reserve(num_neurons);
    }

    /// Constructs a neuron from `weights` and appends it.
    pub fn add_neuron(&mut self, output_channel: u16, weights: &[i8], parameters: &Parameters) {
        self.neurons.push(Neuron::new(output_channel, weights, parameters));
    }

    /// Forwards a spike to every neuron in insertion order, appending the
    /// output channel of each that fires to `outputs`.
    pub fn spike(&mut self, timestamp: f32, input_channel: u16, outputs: &mut Vec<u16>) {
        for neuron in &mut self.neurons {
            if neuron.spike(timestamp, input_channel) {
                outputs.push(neuron.output_channel());
            }
        }
    }

    /// Resets every neuron's transient activation state.
    pub fn reset(&mut self) {
        for neuron in &mut self.neurons {
            neuron.reset();
        }
    }

    /// The number of neurons currently in the cortex.
    pub fn neuron_count(&self) -> u32 {
        self.neurons.len() as u32
    }
}

//! Trains a brain to associate a "bell" stimulus with a "food" stimulus, then
//! shows that presenting the bell alone recalls the food response.
//!
//! Run with: `cargo run --example pavlovian`

use rand::rngs::StdRng;
use rand::SeedableRng;
use spikecortex::{Brain, Parameters, SpikeScheduler};

const NUM_CHANNELS: u16 = 6;
const BELL_DURATION: f32 = 0.5;
const BELL_INTENSITY: f32 = 0.7;
const GAP_DURATION: f32 = 0.25;
const FOOD_DURATION: f32 = 0.5;
const FOOD_INTENSITY: f32 = 0.7;

// Channels 0-2 carry the bell, 3-5 carry the food.
fn schedule_training_spikes(parameters: &Parameters, scheduler: &mut SpikeScheduler) {
    for channel in 0..3 {
        scheduler.schedule_value(0.0, BELL_DURATION, channel, BELL_INTENSITY, true);
    }
    let food_start = BELL_DURATION + GAP_DURATION;
    for channel in 3..6 {
        scheduler.schedule_value(food_start, FOOD_DURATION, channel, FOOD_INTENSITY, true);
    }
    let _ = parameters;
}

fn schedule_testing_spikes(scheduler: &mut SpikeScheduler) {
    for channel in 0..3 {
        scheduler.schedule_value(0.0, BELL_DURATION, channel, BELL_INTENSITY, true);
    }
}

fn apply_spikes(brain: &mut Brain, scheduler: &mut SpikeScheduler, parameters: &Parameters, use_hippocampus: bool) -> Vec<u16> {
    let mut all_outputs = Vec::new();
    let mut outputs = Vec::new();
    loop {
        let Some(spike) = scheduler.peek_next() else {
            break;
        };
        let (timestamp, channel) = (spike.timestamp, spike.channel);
        brain.spike(timestamp, channel, use_hippocampus, parameters, &mut outputs);
        scheduler.advance();
        all_outputs.append(&mut outputs);
    }
    all_outputs
}

fn main() {
    let parameters = Parameters::default();
    let mut brain = Brain::new(NUM_CHANNELS, &parameters);
    brain.reserve(NUM_CHANNELS as usize * 100);

    let mut rng = StdRng::seed_from_u64(1);
    let mut training_scheduler = SpikeScheduler::with_rng(
        NUM_CHANNELS,
        &parameters,
        StdRng::from_rng(&mut rng).unwrap(),
    )
    .unwrap();
    schedule_training_spikes(&parameters, &mut training_scheduler);
    apply_spikes(&mut brain, &mut training_scheduler, &parameters, true);

    println!("{} neurons created during training.", brain.neuron_count());
    brain.reset();

    let mut testing_scheduler = SpikeScheduler::with_rng(
        NUM_CHANNELS,
        &parameters,
        StdRng::from_rng(&mut rng).unwrap(),
    )
    .unwrap();
    schedule_testing_spikes(&mut testing_scheduler);
    let outputs = apply_spikes(&mut brain, &mut testing_scheduler, &parameters, false);

    let mut counts = vec![0u32; NUM_CHANNELS as usize];
    for channel in outputs {
        counts[channel as usize] += 1;
    }

    println!("Output spikes with bell input. [0-2] bell, [3-5] food.");
    for (channel, count) in counts.iter().enumerate() {
        println!("{}: {}", channel, count);
    }
}

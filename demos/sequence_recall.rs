//! Trains a brain on a repeating sequence of similar vectors, then prompts it
//! with the first vector and watches it recall the rest of the sequence by
//! feeding each cortex output back in as the next input, with a small random
//! delay so simultaneous firings don't collide.
//!
//! Run with: `cargo run --example sequence_recall`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spikecortex::{Brain, Parameters, SequenceMerger, SpikeQueue, SpikeScheduler};

const PATTERN: [f32; 2] = [0.51, 0.51];
const SEQUENCE_LENGTH: u16 = 8;

fn num_channels() -> u16 {
    PATTERN.len() as u16 * SEQUENCE_LENGTH
}

fn schedule_training_spikes(parameters: &Parameters, scheduler: &mut SpikeScheduler) {
    for step in 0..SEQUENCE_LENGTH {
        let start_time = step as f32 * parameters.seconds_per_sample;
        let base_channel = step * PATTERN.len() as u16;
        for (offset, &value) in PATTERN.iter().enumerate() {
            scheduler.schedule_value(
                start_time,
                parameters.seconds_per_sample,
                base_channel + offset as u16,
                value,
                true,
            );
        }
    }
}

fn schedule_prompt_spikes(parameters: &Parameters, scheduler: &mut SpikeScheduler) {
    for (channel, &value) in PATTERN.iter().enumerate() {
        scheduler.schedule_value(0.0, parameters.seconds_per_sample, channel as u16, value, true);
    }
}

fn random_feedback_delay(parameters: &Parameters, rng: &mut StdRng) -> f32 {
    parameters.min_spike_interval * (1.0 + 2.0 * rng.gen::<f32>())
}

fn main() {
    let parameters = Parameters::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut brain = Brain::new(num_channels(), &parameters);
    brain.reserve(num_channels() as usize * 100);

    let mut training_scheduler = SpikeScheduler::with_rng(
        num_channels(),
        &parameters,
        StdRng::from_rng(&mut rng).unwrap(),
    )
    .unwrap();
    schedule_training_spikes(&parameters, &mut training_scheduler);
    let mut outputs = Vec::new();
    while let Some(spike) = training_scheduler.peek_next() {
        let (timestamp, channel) = (spike.timestamp, spike.channel);
        brain.spike(timestamp, channel, true, &parameters, &mut outputs);
        training_scheduler.advance();
        outputs.clear();
    }
    println!("{} neurons created during training.", brain.neuron_count());
    brain.reset();

    let mut prompt_scheduler = SpikeScheduler::with_rng(
        num_channels(),
        &parameters,
        StdRng::from_rng(&mut rng).unwrap(),
    )
    .unwrap();
    schedule_prompt_spikes(&parameters, &mut prompt_scheduler);

    let duration = parameters.seconds_per_sample * (SEQUENCE_LENGTH as f32 + 2.0);
    let mut feedback_queue = SpikeQueue::new();
    let mut counts = vec![0u32; num_channels() as usize];

    let reporting_interval = 0.1;
    let mut reporting_deadline = reporting_interval;

    loop {
        let next = {
            let mut merger = SequenceMerger::new(&mut prompt_scheduler, Some(&mut feedback_queue), duration);
            merger.get_next()
        };
        let Some((timestamp, channel)) = next else {
            break;
        };

        outputs.clear();
        brain.spike(timestamp, channel, false, &parameters, &mut outputs);

        for &fired_channel in &outputs {
            let delay = random_feedback_delay(&parameters, &mut rng);
            feedback_queue.add(timestamp + delay, fired_channel);
            counts[fired_channel as usize] += 1;
        }

        if timestamp >= reporting_deadline {
            report_counts(&counts, reporting_deadline);
            counts.iter_mut().for_each(|count| *count = 0);
            reporting_deadline += reporting_interval;
        }
    }
    report_counts(&counts, reporting_deadline);
}

fn report_counts(counts: &[u32], timestamp: f32) {
    print!("{:4.2}:", timestamp);
    for count in counts {
        print!(" {:2}", count);
    }
    println!();
}

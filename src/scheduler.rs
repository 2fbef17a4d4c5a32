//! Converts scalar values and embeddings into time-ordered spike trains.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SpikeError;
use crate::params::Parameters;
use crate::spike::ScheduledSpike;

/// Returns the smallest power of two, at least 64, strictly greater than
/// `requested_size`.
fn add_headroom(requested_size: usize) -> usize {
    let mut n = 64;
    while n <= requested_size {
        n <<= 1;
    }
    n
}

fn calculate_spike_count(period: f32, duration: f32) -> usize {
    1 + (duration / period).floor() as usize
}

/// Schedules scalar values and embeddings as time-ordered spike trains on a
/// fixed set of channels.
///
/// Spikes are stored in a single growable buffer, compacted (not
/// ring-buffered) on every allocation: consumed spikes before
/// `next_scheduled_spike` are dropped and the remainder shifted down,
/// mirroring the growth discipline of the buffer this design is based on.
/// The buffer only ever grows in powers of two, starting at 64.
///
/// Unlike a process-wide seeded generator, randomization is driven by an
/// explicit [`rand::RngCore`] owned by the scheduler, so callers can make
/// scheduling fully deterministic by constructing with [`SpikeScheduler::with_rng`].
#[derive(Debug)]
pub struct SpikeScheduler {
    num_channels: u16,
    min_spike_interval: f32,
    spike_fraction: f32,
    next_scheduled_spike: usize,
    scheduled_spikes: Vec<ScheduledSpike>,
    rng: StdRng,
}

impl SpikeScheduler {
    /// Creates a scheduler for `num_channels` channels, seeded from the
    /// system entropy source. Fails if `num_channels` is zero.
    pub fn new(num_channels: u16, parameters: &Parameters) -> Result<Self, SpikeError> {
        Self::with_rng(num_channels, parameters, StdRng::from_entropy())
    }

    /// Creates a scheduler driven by an explicitly provided random number
    /// generator, for deterministic scheduling in tests and demos. Fails if
    /// `num_channels` is zero.
    pub fn with_rng(
        num_channels: u16,
        parameters: &Parameters,
        rng: StdRng,
    ) -> Result<Self, SpikeError> {
        if num_channels == 0 {
            return Err(SpikeError::NoChannels);
        }
        Ok(Self {
            num_channels,
            min_spike_interval: parameters.min_spike_interval,
            spike_fraction: parameters.spike_fraction,
            next_scheduled_spike: 0,
            scheduled_spikes: Vec::new(),
            rng,
        })
    }

    fn calculate_period(&self, value: f32) -> f32 {
        if value <= self.spike_fraction {
            0.0
        } else if value > 1.0 {
            self.min_spike_interval
        } else {
            self.min_spike_interval / value
        }
    }

    /// Converts a value in `[0, 1]` into time-ordered spikes on `channel`,
    /// scheduled between `start_timestamp` and `start_timestamp + duration`.
    /// Values at or below the parameters' spike fraction produce no spikes at
    /// all. When `randomize` is true the first spike's offset within its
    /// period is drawn from the scheduler's RNG; otherwise it's the period's
    /// midpoint.
    pub fn schedule_value(
        &mut self,
        start_timestamp: f32,
        duration: f32,
        channel: u16,
        value: f32,
        randomize: bool,
    ) {
        let period = self.calculate_period(value);
        if period <= 0.0 {
            return;
        }

        let start_offset_fraction = if randomize { self.rng.gen::<f32>() } else { 0.5 };
        let start_offset = start_offset_fraction * period;
        if start_offset > duration - self.min_spike_interval {
            return;
        }

        let count = calculate_spike_count(period, duration - start_offset - self.min_spike_interval);
        self.allocate_additional_spikes(count);

        let mut timestamp = start_timestamp + start_offset;
        for _ in 0..count {
            self.scheduled_spikes.push(ScheduledSpike::new(timestamp, channel));
            timestamp += period;
        }

        self.scheduled_spikes
            .sort_by(|a, b| a.timestamp.partial_cmp(&b.timestamp).unwrap());
    }

    /// Converts an embedding (one byte per channel) into a time-ordered
    /// sequence of spikes across all channels, scheduled between
    /// `start_timestamp` and `start_timestamp + duration`.
    ///
    /// Returns [`SpikeError::EmbeddingLengthMismatch`] if `embedding.len()`
    /// doesn't match the scheduler's channel count.
    pub fn schedule_embedding(
        &mut self,
        start_timestamp: f32,
        duration: f32,
        embedding: &[u8],
        randomize: bool,
    ) -> Result<(), SpikeError> {
        if embedding.len() != self.num_channels as usize {
            return Err(SpikeError::EmbeddingLengthMismatch {
                expected: self.num_channels as usize,
                actual: embedding.len(),
            });
        }

        let mut periods = vec![0.0f32; embedding.len()];
        let mut start_offsets = vec![0.0f32; embedding.len()];
        let mut counts = vec![0usize; embedding.len()];
        let mut total_count = 0usize;

        for (i, &byte) in embedding.iter().enumerate() {
            let period = self.calculate_period(byte as f32 / 256.0);
            if period == 0.0 {
                continue;
            }
            periods[i] = period;

            let start_offset_fraction = if randomize { self.rng.gen::<f32>() } else { 0.5 };
            let start_offset = start_offset_fraction * period;
            if start_offset > duration - self.min_spike_interval {
                continue;
            }
            start_offsets[i] = start_offset;

            let count = calculate_spike_count(period, duration - start_offset - self.min_spike_interval);
            counts[i] = count;
            total_count += count;
        }

        if total_count == 0 {
            return Ok(());
        }
        self.allocate_additional_spikes(total_count);

        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let period = periods[i];
            let mut timestamp = start_timestamp + start_offsets[i];
            for _ in 0..count {
                self.scheduled_spikes.push(ScheduledSpike::new(timestamp, i as u16));
                timestamp += period;
            }
        }

        self.scheduled_spikes
            .sort_by(|a, b| a.timestamp.partial_cmp(&b.timestamp).unwrap());
        Ok(())
    }

    /// Returns the next scheduled spike, without consuming it.
    pub fn peek_next(&self) -> Option<&ScheduledSpike> {
        self.scheduled_spikes.get(self.next_scheduled_spike)
    }

    /// Consumes the next scheduled spike.
    pub fn advance(&mut self) {
        self.next_scheduled_spike += 1;
    }

    fn allocate_additional_spikes(&mut self, n: usize) {
        if self.next_scheduled_spike > 0 {
            self.scheduled_spikes.drain(0..self.next_scheduled_spike);
            self.next_scheduled_spike = 0;
        }
        let needed = self.scheduled_spikes.len() + n;
        if self.scheduled_spikes.capacity() < needed {
            let new_size = add_headroom(needed);
            self.scheduled_spikes.reserve(new_size - self.scheduled_spikes.len());
        }
    }
}

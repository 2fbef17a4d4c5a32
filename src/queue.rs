//! A time-ordered spike queue and a merger that interleaves it with a
//! [`SpikeScheduler`](crate::scheduler::SpikeScheduler), for feedback loops
//! such as sequence recall.

use std::collections::VecDeque;

use crate::scheduler::SpikeScheduler;
use crate::spike::ScheduledSpike;

/// A queue of spikes kept in ascending timestamp order.
///
/// `add` inserts at the correct position rather than appending and
/// resorting; in the common case — timestamps arriving already in order —
/// this is an O(1) push to the back.
#[derive(Debug, Clone, Default)]
pub struct SpikeQueue {
    scheduled_spikes: VecDeque<ScheduledSpike>,
}

impl SpikeQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            scheduled_spikes: VecDeque::new(),
        }
    }

    /// Inserts a spike at `timestamp`, keeping the queue ordered. Spikes with
    /// equal timestamps keep their relative insertion order.
    pub fn add(&mut self, timestamp: f32, channel: u16) {
        let spike = ScheduledSpike::new(timestamp, channel);
        if self.scheduled_spikes.is_empty()
            || timestamp >= self.scheduled_spikes.back().unwrap().timestamp
        {
            self.scheduled_spikes.push_back(spike);
            return;
        }
        if timestamp < self.scheduled_spikes.front().unwrap().timestamp {
            self.scheduled_spikes.push_front(spike);
            return;
        }
        let insert_at = self
            .scheduled_spikes
            .iter()
            .rposition(|existing| timestamp >= existing.timestamp)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.scheduled_spikes.insert(insert_at, spike);
    }

    /// Returns `true` if there are no scheduled spikes.
    pub fn is_empty(&self) -> bool {
        self.scheduled_spikes.is_empty()
    }

    /// Returns the earliest scheduled spike, without consuming it.
    pub fn front(&self) -> Option<&ScheduledSpike> {
        self.scheduled_spikes.front()
    }

    /// Removes the earliest scheduled spike.
    pub fn pop(&mut self) -> Option<ScheduledSpike> {
        self.scheduled_spikes.pop_front()
    }
}

/// Merges a [`SpikeScheduler`]'s output with an optional feedback
/// [`SpikeQueue`] into a single time-ordered sequence, up to a deadline.
///
/// On a tie, the scheduler's spike is returned first — feedback spikes added
/// at exactly the same timestamp as a scheduled one are deferred by one step.
pub struct SequenceMerger<'a> {
    spike_scheduler: &'a mut SpikeScheduler,
    spike_queue: Option<&'a mut SpikeQueue>,
    deadline: f32,
}

impl<'a> SequenceMerger<'a> {
    /// Creates a merger over `spike_scheduler` and an optional
    /// `spike_queue`, yielding spikes up to (but not including) `deadline`.
    pub fn new(
        spike_scheduler: &'a mut SpikeScheduler,
        spike_queue: Option<&'a mut SpikeQueue>,
        deadline: f32,
    ) -> Self {
        Self {
            spike_scheduler,
            spike_queue,
            deadline,
        }
    }

    /// Returns the next spike before the deadline, consuming it from
    /// whichever source it came from. Returns `None` once both sources are
    /// exhausted or past the deadline.
    pub fn get_next(&mut self) -> Option<(f32, u16)> {
        let scheduler_candidate = self
            .spike_scheduler
            .peek_next()
            .filter(|spike| spike.timestamp < self.deadline)
            .map(|spike| (spike.timestamp, spike.channel));

        let queue_candidate = self
            .spike_queue
            .as_ref()
            .and_then(|queue| queue.front())
            .filter(|spike| spike.timestamp < self.deadline)
            .map(|spike| (spike.timestamp, spike.channel));

        match (scheduler_candidate, queue_candidate) {
            (Some(scheduler_spike), Some(queue_spike)) => {
                if scheduler_spike.0 <= queue_spike.0 {
                    self.spike_scheduler.advance();
                    Some(scheduler_spike)
                } else {
                    self.spike_queue.as_mut().unwrap().pop();
                    Some(queue_spike)
                }
            }
            (Some(scheduler_spike), None) => {
                self.spike_scheduler.advance();
                Some(scheduler_spike)
            }
            (None, Some(queue_spike)) => {
                self.spike_queue.as_mut().unwrap().pop();
                Some(queue_spike)
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn add_in_order_appends_to_back() {
        let mut queue = SpikeQueue::new();
        queue.add(0.0, 1);
        queue.add(1.0, 2);
        queue.add(2.0, 3);
        assert_eq!(queue.front().unwrap().timestamp, 0.0);
    }

    #[test]
    fn add_out_of_order_inserts_at_correct_position() {
        let mut queue = SpikeQueue::new();
        queue.add(2.0, 1);
        queue.add(0.0, 2);
        queue.add(1.0, 3);
        let mut timestamps = Vec::new();
        while let Some(spike) = queue.pop() {
            timestamps.push(spike.timestamp);
        }
        assert_eq!(timestamps, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let mut queue = SpikeQueue::new();
        queue.add(1.0, 10);
        queue.add(1.0, 20);
        assert_eq!(queue.pop().unwrap().channel, 10);
        assert_eq!(queue.pop().unwrap().channel, 20);
    }

    #[test]
    fn is_empty_reports_correctly() {
        let mut queue = SpikeQueue::new();
        assert!(queue.is_empty());
        queue.add(0.0, 0);
        assert!(!queue.is_empty());
        queue.pop();
        assert!(queue.is_empty());
    }

    fn scheduler_with(channel_value: f32) -> SpikeScheduler {
        let mut scheduler =
            SpikeScheduler::with_rng(1, &Parameters::default(), StdRng::seed_from_u64(7)).unwrap();
        scheduler.schedule_value(0.0, 1.0, 0, channel_value, false);
        scheduler
    }

    #[test]
    fn merger_prefers_scheduler_on_a_tie() {
        let mut scheduler = scheduler_with(2.0); // fires at min_spike_interval period
        let first_timestamp = scheduler.peek_next().unwrap().timestamp;
        let mut queue = SpikeQueue::new();
        queue.add(first_timestamp, 99);
        let mut merger = SequenceMerger::new(&mut scheduler, Some(&mut queue), 10.0);
        let (timestamp, channel) = merger.get_next().unwrap();
        assert_eq!(timestamp, first_timestamp);
        assert_eq!(channel, 0);
    }

    #[test]
    fn merger_stops_at_the_deadline() {
        let mut scheduler = scheduler_with(2.0);
        let mut merger = SequenceMerger::new(&mut scheduler, None, 0.0);
        assert!(merger.get_next().is_none());
    }

    #[test]
    fn merger_falls_back_to_queue_when_scheduler_is_exhausted() {
        let mut scheduler =
            SpikeScheduler::with_rng(1, &Parameters::default(), StdRng::seed_from_u64(7)).unwrap();
        let mut queue = SpikeQueue::new();
        queue.add(0.5, 42);
        let mut merger = SequenceMerger::new(&mut scheduler, Some(&mut queue), 10.0);
        let (timestamp, channel) = merger.get_next().unwrap();
        assert_eq!(timestamp, 0.5);
        assert_eq!(channel, 42);
        assert!(merger.get_next().is_none());
    }
}

// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::{Duration, SimTime};
use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::collections::BinaryHeap;

#[cfg(test)]
#[path = "unit_tests/simulator_tests.rs"]
mod simulator_tests;

/// Lower bound on every channel delay, in seconds.
pub const MIN_DELAY: Duration = Duration(0.01);

/// A time-ordered queue of scheduled events driving a single simulated
/// clock. Events at equal times run in scheduling (FIFO) order, which keeps
/// a run deterministic under a fixed seed.
pub struct EventQueue<E> {
    clock: SimTime,
    next_seq: u64,
    pending: BinaryHeap<ScheduledEvent<E>>,
}

struct ScheduledEvent<E> {
    time: SimTime,
    seq: u64,
    event: E,
}

impl<E> PartialEq for ScheduledEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<E> Eq for ScheduledEvent<E> {}

impl<E> PartialOrd for ScheduledEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for ScheduledEvent<E> {
    // Reversed so that the max-heap pops the earliest (time, seq) first.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> EventQueue<E> {
        EventQueue {
            clock: SimTime::ZERO,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn schedule_at(&mut self, time: SimTime, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!("Scheduling event #{} for {:?}", seq, time);
        self.pending.push(ScheduledEvent { time, seq, event });
    }

    /// Pop the next event strictly before `deadline` and advance the clock
    /// to it. Returns `None` once the queue is drained up to the deadline;
    /// later events stay pending.
    pub fn next_before(&mut self, deadline: SimTime) -> Option<(SimTime, E)> {
        let ready = match self.pending.peek() {
            Some(scheduled) => scheduled.time < deadline,
            None => false,
        };
        if !ready {
            return None;
        }
        let scheduled = self.pending.pop().unwrap();
        // Events scheduled in the past are fine but they do not move the
        // clock backwards.
        self.clock.max_update(scheduled.time);
        Some((self.clock, scheduled.event))
    }

    pub fn advance_to(&mut self, time: SimTime) {
        self.clock.max_update(time);
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay imposed by a propagation channel: propagation plus transmission
/// plus a uniform jitter, never below `MIN_DELAY`.
#[derive(Copy, Clone)]
pub struct DelayModel {
    bandwidth: f64,
    signal_speed: f64,
    variance: Uniform<f64>,
}

impl DelayModel {
    pub fn new(bandwidth: f64, signal_speed: f64, delay_variance: f64) -> DelayModel {
        DelayModel {
            bandwidth,
            signal_speed,
            variance: Uniform::new_inclusive(-delay_variance, delay_variance),
        }
    }

    pub fn sample<R: Rng>(&self, length_m: f64, size_bits: f64, rng: &mut R) -> Duration {
        let delay = length_m / self.signal_speed
            + size_bits / self.bandwidth
            + self.variance.sample(rng);
        if delay < MIN_DELAY.0 {
            MIN_DELAY
        } else {
            Duration(delay)
        }
    }
}

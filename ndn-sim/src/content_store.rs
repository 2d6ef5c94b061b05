// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::packet::Data;
use log::trace;
use ndn_lib::{
    base_types::{Name, SimTime},
    metrics::RunMetrics,
};
use rand::Rng;
use std::collections::{HashMap, VecDeque};

#[cfg(test)]
#[path = "unit_tests/content_store_tests.rs"]
mod content_store_tests;

/// Fixed-capacity named-data cache with TTL expiry and a
/// popularity-weighted eviction score. Entries are kept newest-first.
pub struct ContentStore {
    max_size: usize,
    content: VecDeque<Data>,
}

impl ContentStore {
    pub fn new(max_size: usize) -> ContentStore {
        ContentStore {
            max_size,
            content: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &Data> {
        self.content.iter()
    }

    /// True iff the store holds an unexpired entry under `name`.
    pub fn search(&self, name: &Name, now: SimTime) -> bool {
        for data in &self.content {
            if data.name == *name && data.expire_time > now {
                trace!("Data {} found in content store", name);
                return true;
            }
        }
        trace!("Data {} not found in content store", name);
        false
    }

    /// Apply the cache-management policy to a data packet passing through:
    /// purge expired entries, insert with probability `prob`, then evict the
    /// entry with the lowest `popularity * remaining-TTL` score if over
    /// capacity. Ties go to the last minimal entry, i.e. the oldest one.
    pub fn cache<R: Rng>(
        &mut self,
        data: Data,
        now: SimTime,
        prob: f64,
        popularity: &HashMap<Name, u64>,
        metrics: &mut RunMetrics,
        rng: &mut R,
    ) {
        self.content.retain(|entry| {
            if entry.is_expired(now) {
                trace!("{} has expired and has been removed", entry.name);
                metrics.note_evicted(&entry.name);
                false
            } else {
                true
            }
        });
        if !rng.gen_bool(prob) {
            trace!("Did not cache {} in content store", data.name);
            return;
        }
        debug_assert!(
            !self.content.iter().any(|entry| entry.name == data.name),
            "content store entries must have distinct names"
        );
        trace!("Cached {} in content store", data.name);
        metrics.note_cached(&data.name);
        self.content.push_front(data);
        if self.content.len() > self.max_size {
            let mut min_score = f64::INFINITY;
            let mut victim = 0;
            for (index, entry) in self.content.iter().enumerate() {
                let count = popularity.get(&entry.name).copied().unwrap_or(0);
                let score = count as f64 * entry.remaining_ttl(now).0;
                if score <= min_score {
                    min_score = score;
                    victim = index;
                }
            }
            let evicted = self.content.remove(victim).expect("victim index is in range");
            trace!("Evicted {} (score {})", evicted.name, min_score);
            metrics.note_evicted(&evicted.name);
        }
    }

    /// Insert without the probability draw or eviction scan; used to
    /// prefill stores at sample boundaries.
    pub fn insert(&mut self, data: Data, metrics: &mut RunMetrics) {
        debug_assert!(self.content.len() < self.max_size);
        metrics.note_cached(&data.name);
        self.content.push_front(data);
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }
}

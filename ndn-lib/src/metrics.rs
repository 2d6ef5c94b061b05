// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::{Duration, InterestId, Name};
use log::warn;
use serde::Serialize;
use std::collections::HashMap;

#[cfg(test)]
#[path = "unit_tests/metrics_tests.rs"]
mod metrics_tests;

/// Run-global measurement state, owned by the sample driver and threaded
/// into channels, nodes, and the generator. All vectors are append-only
/// within a run.
#[derive(Debug, Default)]
pub struct RunMetrics {
    /// Per-interest hop counts, indexed by `InterestId`.
    hit_distances: Vec<u32>,
    /// Emission-to-delivery times, in delivery order.
    return_times: Vec<Duration>,
    /// Number of content stores currently holding each name, network-wide.
    cache_status: HashMap<Name, usize>,
    /// Start index of each sample in `hit_distances` / `return_times`.
    hd_marks: Vec<usize>,
    rt_marks: Vec<usize>,
}

impl RunMetrics {
    pub fn new() -> RunMetrics {
        RunMetrics::default()
    }

    /// Open a fresh hit-distance slot; its index becomes the interest id.
    pub fn register_interest(&mut self) -> InterestId {
        self.hit_distances.push(0);
        InterestId(self.hit_distances.len() - 1)
    }

    pub fn bump_hit_distance(&mut self, id: InterestId) {
        self.hit_distances[id.0] += 1;
    }

    pub fn record_return_time(&mut self, return_time: Duration) {
        self.return_times.push(return_time);
    }

    pub fn note_cached(&mut self, name: &Name) {
        *self.cache_status.entry(name.clone()).or_insert(0) += 1;
    }

    pub fn note_evicted(&mut self, name: &Name) {
        match self.cache_status.get_mut(name) {
            Some(count) if *count > 0 => *count -= 1,
            _ => warn!("Cache status underflow for {}", name),
        }
    }

    pub fn cached_copies(&self, name: &Name) -> usize {
        self.cache_status.get(name).copied().unwrap_or(0)
    }

    pub fn reset_cache_status(&mut self) {
        for count in self.cache_status.values_mut() {
            *count = 0;
        }
    }

    pub fn mark_sample_start(&mut self) {
        self.hd_marks.push(self.hit_distances.len());
        self.rt_marks.push(self.return_times.len());
    }

    pub fn hit_distances(&self) -> &[u32] {
        &self.hit_distances
    }

    pub fn return_times(&self) -> &[Duration] {
        &self.return_times
    }

    pub fn interests(&self) -> usize {
        self.hit_distances.len()
    }

    pub fn deliveries(&self) -> usize {
        self.return_times.len()
    }

    pub fn sample_marks(&self) -> (&[usize], &[usize]) {
        (&self.hd_marks, &self.rt_marks)
    }

    /// Aggregate the run into a report. `cache_hit_ratio` is supplied by
    /// the caller because it lives in the per-node counters.
    pub fn summarize(&self, cache_hit_ratio: f64) -> MetricsSummary {
        let hit_distances: Vec<f64> = self.hit_distances.iter().map(|d| f64::from(*d)).collect();
        let return_times: Vec<f64> = self.return_times.iter().map(|rt| rt.0).collect();

        let sample_hit_distance_means = sample_means(&hit_distances, &self.hd_marks, "hit-distance");
        let sample_return_time_means = sample_means(&return_times, &self.rt_marks, "return-time");

        let mut hit_distance_percentages = [0.0; 5];
        if !hit_distances.is_empty() {
            for distance in 1..=5u32 {
                let count = self.hit_distances.iter().filter(|d| **d == distance).count();
                hit_distance_percentages[distance as usize - 1] =
                    100.0 * count as f64 / hit_distances.len() as f64;
            }
        }

        MetricsSummary {
            interests: hit_distances.len(),
            deliveries: return_times.len(),
            hit_distance_mean: mean(&hit_distances),
            hit_distance_variance: variance(&hit_distances),
            return_time_mean: mean(&return_times),
            return_time_variance: variance(&return_times),
            hit_distance_sample_variance: variance(&sample_hit_distance_means),
            return_time_sample_variance: variance(&sample_return_time_means),
            sample_hit_distance_means,
            sample_return_time_means,
            hit_distance_percentages,
            cache_hit_ratio,
        }
    }
}

/// Aggregated results of one run, over all samples.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsSummary {
    pub interests: usize,
    pub deliveries: usize,
    pub hit_distance_mean: f64,
    pub hit_distance_variance: f64,
    pub return_time_mean: f64,
    pub return_time_variance: f64,
    /// Variance across the per-sample means below.
    pub hit_distance_sample_variance: f64,
    pub return_time_sample_variance: f64,
    pub sample_hit_distance_means: Vec<f64>,
    pub sample_return_time_means: Vec<f64>,
    /// Share of interests satisfied at hop 1..=5, in percent.
    pub hit_distance_percentages: [f64; 5],
    /// Average over nodes of `cache_hits / total_requests`.
    pub cache_hit_ratio: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Unbiased sample variance; zero when fewer than two values.
fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64
}

/// Per-sample means, slicing by the recorded start marks. Samples that
/// produced no values are skipped with a warning.
fn sample_means(values: &[f64], marks: &[usize], what: &str) -> Vec<f64> {
    let mut means = Vec::new();
    for (sample, window) in marks.iter().enumerate() {
        let start = *window;
        let end = marks.get(sample + 1).copied().unwrap_or(values.len());
        let slice = &values[start..end];
        if slice.is_empty() {
            warn!("Sample {} produced no {} values; skipping it", sample, what);
            continue;
        }
        means.push(mean(slice));
    }
    means
}

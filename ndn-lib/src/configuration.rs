// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::base_types::{Duration, Result};
use anyhow::ensure;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "unit_tests/configuration_tests.rs"]
mod configuration_tests;

/// How the size of a data packet is determined.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DataSizing {
    /// Uniform in `base_bits ± jitter_bits`.
    Jittered { base_bits: f64, jitter_bits: f64 },
    /// `40 + 524280 / (depth + 1)`: more specific names carry smaller payloads.
    DepthScaled,
}

/// What happens to the content stores at the end of a sample.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CacheResetPolicy {
    /// Empty every content store.
    Clear,
    /// Refill every content store to capacity with fresh data under
    /// distinct uniformly-drawn names.
    Prefill,
}

/// Tunable constants of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Probability that a node caches a data packet passing through it.
    pub prob: f64,
    /// Capacity of each content store, in entries.
    pub cache_size: usize,
    /// Channel bandwidth, in bits per second.
    pub bandwidth: f64,
    /// Signal propagation speed, in meters per second.
    pub signal_speed: f64,
    /// Half-width of the uniform jitter added to every channel delay, in seconds.
    pub delay_variance: f64,
    /// Time-to-live of `health_info` data.
    pub hi_ttl: Duration,
    /// Time-to-live of all other data.
    pub mi_ttl: Duration,
    /// Number of independent samples.
    pub samples: usize,
    /// Simulated duration of one sample.
    pub run_time: Duration,
    /// Mean of the exponential interest inter-arrival law, in seconds.
    pub arrival_mean: f64,
    /// Probability that an interest targets the central producer.
    pub p_central: f64,
    pub data_sizing: DataSizing,
    pub cache_reset: CacheResetPolicy,
}

impl Default for SimulationConfig {
    /// The reference configuration of the underwater fleet deployment.
    fn default() -> Self {
        SimulationConfig {
            prob: 1.0,
            cache_size: 5,
            bandwidth: 100_000_000.0,
            signal_speed: 1500.0,
            delay_variance: 0.005,
            hi_ttl: Duration(60.0),
            mi_ttl: Duration(40.0),
            samples: 1,
            run_time: Duration(1000.0),
            arrival_mean: 10.0,
            p_central: 0.3,
            data_sizing: DataSizing::Jittered {
                base_bits: 2000.0,
                jitter_bits: 200.0,
            },
            cache_reset: CacheResetPolicy::Clear,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.prob),
            "caching probability must be within [0, 1]"
        );
        ensure!(
            (0.0..=1.0).contains(&self.p_central),
            "central-producer probability must be within [0, 1]"
        );
        ensure!(self.cache_size > 0, "content stores must hold at least one entry");
        ensure!(self.bandwidth > 0.0, "bandwidth must be positive");
        ensure!(self.signal_speed > 0.0, "signal speed must be positive");
        ensure!(self.delay_variance >= 0.0, "delay variance must be non-negative");
        ensure!(self.hi_ttl.0 > 0.0, "health-info TTL must be positive");
        ensure!(self.mi_ttl.0 > 0.0, "mission-info TTL must be positive");
        ensure!(self.samples > 0, "at least one sample is required");
        ensure!(self.run_time.0 > 0.0, "run time must be positive");
        ensure!(self.arrival_mean > 0.0, "arrival mean must be positive");
        if let DataSizing::Jittered {
            base_bits,
            jitter_bits,
        } = self.data_sizing
        {
            ensure!(base_bits > 0.0, "base data size must be positive");
            ensure!(
                jitter_bits >= 0.0 && jitter_bits < base_bits,
                "data size jitter must be non-negative and below the base size"
            );
        }
        Ok(())
    }
}

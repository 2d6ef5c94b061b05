// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use ndn_lib::{
    base_types::{ChannelId, Duration, Name, NodeId},
    configuration::SimulationConfig,
};
use rand::Rng;
use rand_distr::{Distribution, Exp};

#[cfg(test)]
#[path = "unit_tests/generator_tests.rs"]
mod generator_tests;

/// Draws the interest workload: exponential inter-arrival waits, a
/// producer choice biased toward the central producer, a uniform name from
/// the producer's catalogue, and a uniform edge channel to emit on.
pub struct InterestGenerator {
    edge_channels: Vec<ChannelId>,
    catalogues: Vec<Vec<Name>>,
    central_producer: NodeId,
    p_central: f64,
    arrival: Exp<f64>,
}

impl InterestGenerator {
    pub fn new(
        edge_channels: Vec<ChannelId>,
        catalogues: Vec<Vec<Name>>,
        central_producer: NodeId,
        config: &SimulationConfig,
    ) -> InterestGenerator {
        InterestGenerator {
            edge_channels,
            catalogues,
            central_producer,
            p_central: config.p_central,
            arrival: Exp::new(1.0 / config.arrival_mean).unwrap(),
        }
    }

    pub fn sample_wait<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration(self.arrival.sample(rng))
    }

    /// The next interest to emit: a name and the edge channel to send it on.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> (Name, ChannelId) {
        let producer = if rng.gen_bool(self.p_central) {
            self.central_producer.0
        } else {
            rng.gen_range(0..self.catalogues.len())
        };
        let catalogue = &self.catalogues[producer];
        let name = catalogue[rng.gen_range(0..catalogue.len())].clone();
        let channel = self.edge_channels[rng.gen_range(0..self.edge_channels.len())];
        (name, channel)
    }
}

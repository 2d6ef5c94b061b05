// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context as _;
use ndn_lib::{
    base_types::{ChannelId, Name, NodeId, Result},
    descriptor::{EdgeChannel, Link, NetworkDescriptor},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

#[cfg(test)]
#[path = "unit_tests/scenario_tests.rs"]
mod scenario_tests;

/// Everything a run consumes besides the tunable constants: the network
/// descriptor, the per-node producer catalogues (whose first entry is the
/// node's producer root name), the per-node FIB tables, and the designated
/// central producer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub descriptor: NetworkDescriptor,
    pub catalogues: Vec<Vec<Name>>,
    pub fibs: Vec<HashMap<Name, ChannelId>>,
    pub central_producer: NodeId,
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("expected one catalogue and one FIB table per node ({num_nodes} nodes)")]
    WrongTableCount { num_nodes: usize },
    #[error("node {node} has an empty catalogue")]
    EmptyCatalogue { node: usize },
    #[error("central producer {node} is out of range")]
    BadCentralProducer { node: usize },
    #[error("node {node} has no FIB entry for '{name}'")]
    MissingFibEntry { node: usize, name: Name },
    #[error(
        "FIB entry for '{name}' at node {node} uses channel {channel}, which is not connected to it"
    )]
    DisconnectedFibEntry {
        node: usize,
        name: Name,
        channel: usize,
    },
    #[error("FIB entry for '{name}' at node {node} forwards to the user side")]
    FibLeadsToUser { node: usize, name: Name },
    #[error("FIB entries for '{name}' starting at node {node} loop without reaching a producer")]
    FibLoop { node: usize, name: Name },
}

#[derive(Copy, Clone)]
enum ChannelEnds {
    Between(usize, usize),
    Edge(usize),
}

impl Scenario {
    pub fn load(path: &str) -> Result<Scenario> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario file '{}'", path))?;
        let scenario: Scenario = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scenario file '{}'", path))?;
        Ok(scenario)
    }

    pub fn producer_root(&self, node: NodeId) -> &Name {
        &self.catalogues[node.0][0]
    }

    /// Every name the simulation can generate.
    pub fn all_names(&self) -> Vec<Name> {
        self.catalogues.iter().flatten().cloned().collect()
    }

    /// Check the descriptor, then that catalogues and FIB tables cover all
    /// nodes, that FIBs are total over the name universe, and that
    /// following FIB entries from any node reaches a producer without
    /// looping.
    pub fn validate(&self) -> Result<()> {
        self.descriptor.validate()?;
        self.check()?;
        Ok(())
    }

    fn check(&self) -> std::result::Result<(), ScenarioError> {
        let num_nodes = self.descriptor.num_nodes;
        if self.catalogues.len() != num_nodes || self.fibs.len() != num_nodes {
            return Err(ScenarioError::WrongTableCount { num_nodes });
        }
        for (node, catalogue) in self.catalogues.iter().enumerate() {
            if catalogue.is_empty() {
                return Err(ScenarioError::EmptyCatalogue { node });
            }
        }
        if self.central_producer.0 >= num_nodes {
            return Err(ScenarioError::BadCentralProducer {
                node: self.central_producer.0,
            });
        }

        let mut ends = Vec::new();
        for _ in 0..self.descriptor.channel_count() {
            ends.push(None);
        }
        for link in &self.descriptor.links {
            ends[link.id] = Some(ChannelEnds::Between(link.a, link.b));
        }
        for edge in &self.descriptor.edge_channels {
            ends[edge.id] = Some(ChannelEnds::Edge(edge.node));
        }

        for start in 0..num_nodes {
            for name in self.all_names() {
                self.walk_to_producer(start, &name, &ends)?;
            }
        }
        Ok(())
    }

    /// Follow FIB entries for `name` from `start` until a producer is
    /// reached.
    fn walk_to_producer(
        &self,
        start: usize,
        name: &Name,
        ends: &[Option<ChannelEnds>],
    ) -> std::result::Result<(), ScenarioError> {
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(start);
        loop {
            if name.has_prefix(self.producer_root(NodeId(current))) {
                return Ok(());
            }
            let channel = self.fibs[current]
                .get(name)
                .ok_or_else(|| ScenarioError::MissingFibEntry {
                    node: current,
                    name: name.clone(),
                })?;
            let next = match ends.get(channel.0).copied().flatten() {
                Some(ChannelEnds::Between(a, b)) if a == current => b,
                Some(ChannelEnds::Between(a, b)) if b == current => a,
                Some(ChannelEnds::Edge(node)) if node == current => {
                    return Err(ScenarioError::FibLeadsToUser {
                        node: current,
                        name: name.clone(),
                    });
                }
                _ => {
                    return Err(ScenarioError::DisconnectedFibEntry {
                        node: current,
                        name: name.clone(),
                        channel: channel.0,
                    });
                }
            };
            if !visited.insert(next) {
                return Err(ScenarioError::FibLoop {
                    node: start,
                    name: name.clone(),
                });
            }
            current = next;
        }
    }
}

/// The ten-vehicle reference deployment: three chains of three vehicles
/// meeting at the hub node 9, user-facing edge channels on nodes 0 and 6,
/// link lengths drawn as in the at-sea configuration (10-1000 m between
/// vehicles, 500-2000 m up to the users).
pub fn fleet<R: Rng>(rng: &mut R) -> Scenario {
    const VEHICLES: [(&str, bool); 10] = [
        ("usv1", false),
        ("usv2", false),
        ("uuv1", true),
        ("uuv2", true),
        ("uuv3", true),
        ("uuv4", true),
        ("usv3", false),
        ("usv4", false),
        ("uuv5", true),
        ("uuv6", true),
    ];
    let links = [
        (1, 0, 1),
        (2, 1, 2),
        (3, 2, 9),
        (4, 3, 4),
        (5, 4, 5),
        (6, 5, 9),
        (8, 6, 7),
        (9, 7, 8),
        (10, 8, 9),
    ]
    .iter()
    .map(|(id, a, b)| Link {
        id: *id,
        a: *a,
        b: *b,
        length_m: rng.gen_range(10..1000) as f64,
    })
    .collect();
    let edge_channels = [(0, 0), (7, 6)]
        .iter()
        .map(|(id, node)| EdgeChannel {
            id: *id,
            node: *node,
            length_m: rng.gen_range(500..2000) as f64,
        })
        .collect();
    let descriptor = NetworkDescriptor {
        num_nodes: VEHICLES.len(),
        links,
        edge_channels,
    };
    let catalogues: Vec<Vec<Name>> = VEHICLES
        .iter()
        .map(|(root, underwater)| catalogue(root, *underwater))
        .collect();
    let fibs = shortest_path_fibs(&descriptor, &catalogues);
    Scenario {
        descriptor,
        catalogues,
        fibs,
        central_producer: NodeId(9),
    }
}

/// The names a vehicle produces. Underwater vehicles additionally report
/// their depth.
fn catalogue(root: &str, underwater: bool) -> Vec<Name> {
    let mut names = vec![
        root.to_string(),
        format!("{}/health_info", root),
        format!("{}/mission_info", root),
        format!("{}/mission_info/mission_log", root),
        format!("{}/mission_info/route", root),
        format!("{}/mission_info/antennas", root),
        format!("{}/mission_info/antennas/antenna1", root),
        format!("{}/mission_info/antennas/antenna2", root),
        format!("{}/mission_info/antennas/antenna3", root),
        format!("{}/mission_info/sensors", root),
        format!("{}/mission_info/sensors/sensor1", root),
        format!("{}/mission_info/sensors/sensor2", root),
        format!("{}/mission_info/sensors/sensor3", root),
        format!("{}/mission_info/location", root),
    ];
    if underwater {
        names.push(format!("{}/mission_info/depth", root));
    }
    names.extend(vec![
        format!("{}/health_info/log", root),
        format!("{}/health_info/antenna_conditions/antenna1", root),
        format!("{}/health_info/antenna_conditions/antenna2", root),
        format!("{}/health_info/antenna_conditions/antenna3", root),
        format!("{}/health_info/sensor_conditions/sensor1", root),
        format!("{}/health_info/sensor_conditions/sensor2", root),
        format!("{}/health_info/sensor_conditions/sensor3", root),
        format!("{}/health_info/battery_level", root),
    ]);
    names.into_iter().map(Name::new).collect()
}

/// Derive every node's FIB from BFS shortest paths: interests for a
/// producer's names leave on the first hop toward that producer.
pub fn shortest_path_fibs(
    descriptor: &NetworkDescriptor,
    catalogues: &[Vec<Name>],
) -> Vec<HashMap<Name, ChannelId>> {
    let num_nodes = descriptor.num_nodes;
    let mut fibs = vec![HashMap::new(); num_nodes];
    for (producer, catalogue) in catalogues.iter().enumerate() {
        let mut next_hop: Vec<Option<usize>> = vec![None; num_nodes];
        let mut visited = vec![false; num_nodes];
        visited[producer] = true;
        let mut frontier = VecDeque::new();
        frontier.push_back(producer);
        while let Some(current) = frontier.pop_front() {
            for (channel, neighbor) in descriptor.neighbors(current) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    // The neighbor's first hop toward the producer is its
                    // BFS tree edge back to `current`.
                    next_hop[neighbor] = Some(channel);
                    frontier.push_back(neighbor);
                }
            }
        }
        for node in 0..num_nodes {
            if node == producer {
                continue;
            }
            if let Some(channel) = next_hop[node] {
                for name in catalogue {
                    fibs[node].insert(name.clone(), ChannelId(channel));
                }
            }
        }
    }
    fibs
}

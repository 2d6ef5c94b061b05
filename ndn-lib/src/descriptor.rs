// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
#[path = "unit_tests/descriptor_tests.rs"]
mod descriptor_tests;

/// A bidirectional channel between two forwarding nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: usize,
    pub a: usize,
    pub b: usize,
    pub length_m: f64,
}

/// A channel with one endpoint on the external user side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeChannel {
    pub id: usize,
    pub node: usize,
    pub length_m: f64,
}

/// The graph a simulation runs on: `num_nodes` forwarding nodes, the
/// channels between them, and the edge channels users emit interests on.
/// Channel ids must cover `0..links.len() + edge_channels.len()` exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub num_nodes: usize,
    pub links: Vec<Link>,
    pub edge_channels: Vec<EdgeChannel>,
}

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("channel ids must cover 0..{expected} exactly (id {id} is duplicated or out of range)")]
    BadChannelId { id: usize, expected: usize },
    #[error("channel {channel} references node {node} but the descriptor has {num_nodes} nodes")]
    NodeOutOfRange {
        channel: usize,
        node: usize,
        num_nodes: usize,
    },
    #[error("channel {channel} has non-positive length {length_m}m")]
    NonPositiveLength { channel: usize, length_m: f64 },
    #[error("a descriptor needs at least one edge channel to emit interests on")]
    NoEdgeChannels,
    #[error("a descriptor needs at least one forwarding node")]
    NoNodes,
}

impl NetworkDescriptor {
    pub fn channel_count(&self) -> usize {
        self.links.len() + self.edge_channels.len()
    }

    /// Ids of all channels connected to `node`, graph links first.
    pub fn channels_of(&self, node: usize) -> Vec<usize> {
        let mut ids = Vec::new();
        for link in &self.links {
            if link.a == node || link.b == node {
                ids.push(link.id);
            }
        }
        for edge in &self.edge_channels {
            if edge.node == node {
                ids.push(edge.id);
            }
        }
        ids
    }

    /// `(channel id, neighbor node)` pairs for `node`, over graph links only.
    pub fn neighbors(&self, node: usize) -> Vec<(usize, usize)> {
        self.links
            .iter()
            .filter_map(|link| {
                if link.a == node {
                    Some((link.id, link.b))
                } else if link.b == node {
                    Some((link.id, link.a))
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn validate(&self) -> std::result::Result<(), DescriptorError> {
        if self.num_nodes == 0 {
            return Err(DescriptorError::NoNodes);
        }
        if self.edge_channels.is_empty() {
            return Err(DescriptorError::NoEdgeChannels);
        }
        let expected = self.channel_count();
        let mut seen = vec![false; expected];
        let mut check_id = |id: usize| {
            if id >= expected || seen[id] {
                Err(DescriptorError::BadChannelId { id, expected })
            } else {
                seen[id] = true;
                Ok(())
            }
        };
        for link in &self.links {
            check_id(link.id)?;
        }
        for edge in &self.edge_channels {
            check_id(edge.id)?;
        }
        for link in &self.links {
            for node in [link.a, link.b].iter() {
                if *node >= self.num_nodes {
                    return Err(DescriptorError::NodeOutOfRange {
                        channel: link.id,
                        node: *node,
                        num_nodes: self.num_nodes,
                    });
                }
            }
            if link.length_m <= 0.0 {
                return Err(DescriptorError::NonPositiveLength {
                    channel: link.id,
                    length_m: link.length_m,
                });
            }
        }
        for edge in &self.edge_channels {
            if edge.node >= self.num_nodes {
                return Err(DescriptorError::NodeOutOfRange {
                    channel: edge.id,
                    node: edge.node,
                    num_nodes: self.num_nodes,
                });
            }
            if edge.length_m <= 0.0 {
                return Err(DescriptorError::NonPositiveLength {
                    channel: edge.id,
                    length_m: edge.length_m,
                });
            }
        }
        Ok(())
    }
}

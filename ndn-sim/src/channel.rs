// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use ndn_lib::base_types::{ChannelId, Endpoint, NodeId};

#[cfg(test)]
#[path = "unit_tests/channel_tests.rs"]
mod channel_tests;

/// Bidirectional propagation link between two endpoints. Either endpoint
/// may send; the destination is always the other one.
pub struct Channel {
    id: ChannelId,
    endpoints: (Endpoint, Endpoint),
    length_m: f64,
}

impl Channel {
    pub fn between(id: ChannelId, a: NodeId, b: NodeId, length_m: f64) -> Channel {
        Channel {
            id,
            endpoints: (Endpoint::Node(a), Endpoint::Node(b)),
            length_m,
        }
    }

    /// An edge channel: one endpoint is the external user side.
    pub fn edge(id: ChannelId, node: NodeId, length_m: f64) -> Channel {
        Channel {
            id,
            endpoints: (Endpoint::User, Endpoint::Node(node)),
            length_m,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    pub fn is_edge(&self) -> bool {
        self.endpoints.0 == Endpoint::User || self.endpoints.1 == Endpoint::User
    }

    pub fn receiver(&self, from: Endpoint) -> Endpoint {
        if self.endpoints.0 == from {
            self.endpoints.1
        } else {
            self.endpoints.0
        }
    }
}

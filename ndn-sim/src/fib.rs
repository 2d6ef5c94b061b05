// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use log::trace;
use ndn_lib::base_types::{ChannelId, Name, NodeId};
use std::collections::HashMap;
use thiserror::Error;

#[cfg(test)]
#[path = "unit_tests/fib_tests.rs"]
mod fib_tests;

/// An interest named something no FIB entry covers. Configurations must be
/// total, so this aborts the run.
#[derive(Error, Debug)]
#[error("no FIB entry for '{name}' at node {node}")]
pub struct MissingFibEntry {
    pub node: NodeId,
    pub name: Name,
}

/// Static mapping from data name to outbound channel, fixed for a run.
pub struct ForwardingBase {
    node: NodeId,
    content: HashMap<Name, ChannelId>,
}

impl ForwardingBase {
    pub fn new(node: NodeId, content: HashMap<Name, ChannelId>) -> ForwardingBase {
        ForwardingBase { node, content }
    }

    /// The channel an interest for `name` must be forwarded on.
    pub fn outbound(&self, name: &Name) -> Result<ChannelId, MissingFibEntry> {
        match self.content.get(name) {
            Some(channel) => {
                trace!("Sending request for {} to channel {}", name, channel);
                Ok(*channel)
            }
            None => Err(MissingFibEntry {
                node: self.node,
                name: name.clone(),
            }),
        }
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.content.contains_key(name)
    }
}

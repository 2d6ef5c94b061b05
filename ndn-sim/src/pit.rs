// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::packet::Interest;
use log::trace;
use ndn_lib::base_types::{ChannelId, Name};
use std::collections::HashMap;

#[cfg(test)]
#[path = "unit_tests/pit_tests.rs"]
mod pit_tests;

/// Records in-flight requests per name, together with every inbound
/// interface awaiting the response. While a name is present, exactly one
/// upstream request for it is outstanding from this node.
#[derive(Default)]
pub struct PendingInterestTable {
    content: HashMap<Name, Vec<(Interest, ChannelId)>>,
}

impl PendingInterestTable {
    pub fn new() -> PendingInterestTable {
        PendingInterestTable::default()
    }

    pub fn search(&self, name: &Name) -> bool {
        if self.content.contains_key(name) {
            trace!("Data {} found in pending interest table", name);
            true
        } else {
            trace!("Data {} not found in pending interest table", name);
            false
        }
    }

    /// Open a new entry for the interest's name.
    pub fn add_name(&mut self, interest: Interest, from: ChannelId) {
        trace!("Data {} added to pending interest table", interest.name);
        self.content
            .insert(interest.name.clone(), vec![(interest, from)]);
    }

    /// Extend the reverse-path interface set of an existing entry.
    pub fn add_interface(&mut self, interest: Interest, from: ChannelId) {
        trace!(
            "Interface {} added to {} in pending interest table",
            from,
            interest.name
        );
        self.content
            .get_mut(&interest.name)
            .expect("entries should be opened before interfaces are added")
            .push((interest, from));
    }

    /// Close the entry for `name`, handing back the interfaces to serve.
    pub fn take(&mut self, name: &Name) -> Option<Vec<(Interest, ChannelId)>> {
        let entries = self.content.remove(name);
        if entries.is_some() {
            trace!("Data {} removed from pending interest table", name);
        }
        entries
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

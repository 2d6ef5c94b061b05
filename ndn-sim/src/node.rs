// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::{
    content_store::ContentStore,
    fib::ForwardingBase,
    packet::{Data, Interest},
    pit::PendingInterestTable,
};
use log::{trace, warn};
use ndn_lib::{
    base_types::{ChannelId, Name, NodeId, Result, SimTime},
    configuration::SimulationConfig,
    metrics::RunMetrics,
};
use rand::Rng;
use std::collections::{HashMap, VecDeque};

#[cfg(test)]
#[path = "unit_tests/node_tests.rs"]
mod node_tests;

/// Forwards requested by the forwarding rule after consuming one inbox
/// item. The world performs them in order; each one suspends the worker
/// for the sampled channel delay.
#[derive(Debug)]
pub enum ForwardAction {
    SendInterest {
        channel: ChannelId,
        interest: Interest,
    },
    SendData {
        channel: ChannelId,
        data: Data,
        interest: Interest,
    },
}

/// Per-channel inboxes and the busy state of the two workers draining
/// them.
#[derive(Default)]
struct Interface {
    interests: VecDeque<Interest>,
    interest_worker_busy: bool,
    data: VecDeque<Data>,
    data_worker_busy: bool,
}

/// A forwarding node: content store, pending interest table, and
/// forwarding base bound together by the NDN forwarding rule, plus one
/// interest inbox and one data inbox per connected channel.
pub struct Node {
    id: NodeId,
    producer_root: Name,
    channel_ids: Vec<ChannelId>,
    content_store: ContentStore,
    pending_interest: PendingInterestTable,
    forwarding_base: ForwardingBase,
    interfaces: HashMap<ChannelId, Interface>,
    data_popularity: HashMap<Name, u64>,
    cache_hits: u64,
    total_requests: u64,
}

impl Node {
    pub fn new(
        id: NodeId,
        producer_root: Name,
        channel_ids: Vec<ChannelId>,
        cache_size: usize,
        fib_content: HashMap<Name, ChannelId>,
    ) -> Node {
        let interfaces = channel_ids
            .iter()
            .map(|channel| (*channel, Interface::default()))
            .collect();
        Node {
            id,
            producer_root,
            channel_ids,
            content_store: ContentStore::new(cache_size),
            pending_interest: PendingInterestTable::new(),
            forwarding_base: ForwardingBase::new(id, fib_content),
            interfaces,
            data_popularity: HashMap::new(),
            cache_hits: 0,
            total_requests: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn producer_root(&self) -> &Name {
        &self.producer_root
    }

    pub fn channel_ids(&self) -> &[ChannelId] {
        &self.channel_ids
    }

    pub fn content_store(&self) -> &ContentStore {
        &self.content_store
    }

    pub fn pending_interests(&self) -> &PendingInterestTable {
        &self.pending_interest
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    fn interface(&mut self, channel: ChannelId) -> &mut Interface {
        self.interfaces
            .get_mut(&channel)
            .expect("deliveries should only target connected channels")
    }

    /// Queue an interest on the channel's inbox. Returns true when the
    /// idle worker must be woken.
    pub fn enqueue_interest(&mut self, channel: ChannelId, interest: Interest) -> bool {
        let interface = self.interface(channel);
        interface.interests.push_back(interest);
        if interface.interest_worker_busy {
            false
        } else {
            interface.interest_worker_busy = true;
            true
        }
    }

    /// Next inbox item for the channel's interest worker; going idle when
    /// the inbox is drained.
    pub fn next_interest(&mut self, channel: ChannelId) -> Option<Interest> {
        let interface = self.interface(channel);
        let item = interface.interests.pop_front();
        if item.is_none() {
            interface.interest_worker_busy = false;
        }
        item
    }

    pub fn enqueue_data(&mut self, channel: ChannelId, data: Data) -> bool {
        let interface = self.interface(channel);
        interface.data.push_back(data);
        if interface.data_worker_busy {
            false
        } else {
            interface.data_worker_busy = true;
            true
        }
    }

    pub fn next_data(&mut self, channel: ChannelId) -> Option<Data> {
        let interface = self.interface(channel);
        let item = interface.data.pop_front();
        if item.is_none() {
            interface.data_worker_busy = false;
        }
        item
    }

    /// The NDN forwarding rule: producer match, then content store, then
    /// pending-interest deduplication, then upstream forwarding.
    pub fn receive_interest<R: Rng>(
        &mut self,
        interest: Interest,
        from: ChannelId,
        now: SimTime,
        config: &SimulationConfig,
        metrics: &mut RunMetrics,
        rng: &mut R,
    ) -> Result<Vec<ForwardAction>> {
        trace!("Node {} receiving request for {}", self.id, interest.name);
        self.total_requests += 1;
        metrics.bump_hit_distance(interest.id);
        *self
            .data_popularity
            .entry(interest.name.clone())
            .or_insert(0) += 1;

        let mut actions = Vec::new();
        if interest.name.has_prefix(&self.producer_root) {
            trace!(
                "{} producing {}, responding to channel {}",
                self.producer_root,
                interest.name,
                from
            );
            let data = Data::new(interest.name.clone(), now, config, rng);
            actions.push(ForwardAction::SendData {
                channel: from,
                data,
                interest,
            });
        } else if self.content_store.search(&interest.name, now) {
            self.cache_hits += 1;
            // The response is manufactured fresh; the cached entry stays.
            let data = Data::new(interest.name.clone(), now, config, rng);
            actions.push(ForwardAction::SendData {
                channel: from,
                data,
                interest,
            });
        } else if self.pending_interest.search(&interest.name) {
            self.pending_interest.add_interface(interest, from);
        } else {
            let outbound = self.forwarding_base.outbound(&interest.name)?;
            self.pending_interest.add_name(interest.clone(), from);
            actions.push(ForwardAction::SendInterest {
                channel: outbound,
                interest,
            });
        }
        Ok(actions)
    }

    /// Data return leg: close the pending entry, try to cache, then serve
    /// every recorded interface. Unsolicited data is discarded.
    pub fn receive_data<R: Rng>(
        &mut self,
        data: Data,
        now: SimTime,
        config: &SimulationConfig,
        metrics: &mut RunMetrics,
        rng: &mut R,
    ) -> Vec<ForwardAction> {
        trace!("Node {} receiving data {}", self.id, data.name);
        let entries = match self.pending_interest.take(&data.name) {
            Some(entries) => entries,
            None => {
                warn!(
                    "Node {} received unsolicited data {}; discarding it",
                    self.id, data.name
                );
                return Vec::new();
            }
        };
        self.content_store.cache(
            data.clone(),
            now,
            config.prob,
            &self.data_popularity,
            metrics,
            rng,
        );
        entries
            .into_iter()
            .map(|(interest, channel)| ForwardAction::SendData {
                channel,
                data: data.clone(),
                interest,
            })
            .collect()
    }

    pub fn clear_content_store(&mut self) {
        self.content_store.clear();
    }

    pub fn prefill_content_store(&mut self, data: Data, metrics: &mut RunMetrics) {
        self.content_store.insert(data, metrics);
    }
}

// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use crate::{
    channel::Channel,
    generator::InterestGenerator,
    node::{ForwardAction, Node},
    packet::{Data, Interest},
    scenario::Scenario,
};
use log::{debug, info, trace};
use ndn_lib::{
    base_types::{ChannelId, Endpoint, InterestId, Name, NodeId, Result, SimTime},
    configuration::{CacheResetPolicy, SimulationConfig},
    metrics::{MetricsSummary, RunMetrics},
    simulator::{DelayModel, EventQueue},
};
use rand::{seq::SliceRandom, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

#[cfg(test)]
#[path = "unit_tests/world_tests.rs"]
mod world_tests;

/// A scheduled continuation of the simulation.
#[derive(Debug)]
enum Event {
    /// A packet finishes its traversal of a channel.
    InterestDelivery {
        channel: ChannelId,
        receiver: Endpoint,
        interest: Interest,
    },
    DataDelivery {
        channel: ChannelId,
        receiver: Endpoint,
        data: Data,
        interest: Interest,
    },
    /// A per-interface worker re-polls its inbox.
    InterestWake { node: NodeId, channel: ChannelId },
    DataWake { node: NodeId, channel: ChannelId },
    /// The generator emits its next interest.
    NextArrival,
}

/// The closed world of one run. Nodes and channels live in arenas and every
/// cross-reference is an integer id; the world also owns the event queue,
/// the seeded RNG, and the run metrics, so exactly one continuation mutates
/// state at a time.
pub struct World {
    config: SimulationConfig,
    nodes: Vec<Node>,
    channels: Vec<Channel>,
    queue: EventQueue<Event>,
    delay: DelayModel,
    rng: Xoshiro256StarStar,
    metrics: RunMetrics,
    generator: InterestGenerator,
    name_universe: Vec<Name>,
}

impl World {
    pub fn new(scenario: &Scenario, config: SimulationConfig, seed: u64) -> Result<World> {
        config.validate()?;
        scenario.validate()?;
        let descriptor = &scenario.descriptor;
        let mut channels: Vec<Option<Channel>> =
            (0..descriptor.channel_count()).map(|_| None).collect();
        for link in &descriptor.links {
            channels[link.id] = Some(Channel::between(
                ChannelId(link.id),
                NodeId(link.a),
                NodeId(link.b),
                link.length_m,
            ));
        }
        for edge in &descriptor.edge_channels {
            channels[edge.id] = Some(Channel::edge(
                ChannelId(edge.id),
                NodeId(edge.node),
                edge.length_m,
            ));
        }
        let channels = channels
            .into_iter()
            .map(|channel| channel.expect("validated descriptors have dense channel ids"))
            .collect();
        let nodes = (0..descriptor.num_nodes)
            .map(|index| {
                Node::new(
                    NodeId(index),
                    scenario.producer_root(NodeId(index)).clone(),
                    descriptor
                        .channels_of(index)
                        .into_iter()
                        .map(ChannelId)
                        .collect(),
                    config.cache_size,
                    scenario.fibs[index].clone(),
                )
            })
            .collect();
        let generator = InterestGenerator::new(
            descriptor
                .edge_channels
                .iter()
                .map(|edge| ChannelId(edge.id))
                .collect(),
            scenario.catalogues.clone(),
            scenario.central_producer,
            &config,
        );
        let delay = DelayModel::new(config.bandwidth, config.signal_speed, config.delay_variance);
        let mut world = World {
            nodes,
            channels,
            queue: EventQueue::new(),
            delay,
            rng: Xoshiro256StarStar::seed_from_u64(seed),
            metrics: RunMetrics::new(),
            generator,
            name_universe: scenario.all_names(),
            config,
        };
        if world.config.cache_reset == CacheResetPolicy::Prefill {
            world.prefill_content_stores();
        }
        Ok(world)
    }

    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id.0).unwrap()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Schedule the first generator arrival.
    pub fn start_traffic(&mut self) {
        let wait = self.generator.sample_wait(&mut self.rng);
        let at = self.queue.now() + wait;
        self.queue.schedule_at(at, Event::NextArrival);
    }

    /// Emit one interest from the user side of an edge channel.
    pub fn emit_interest(&mut self, name: Name, channel: ChannelId) -> InterestId {
        self.emit(name, channel).0
    }

    fn emit(&mut self, name: Name, channel: ChannelId) -> (InterestId, SimTime) {
        debug_assert!(self.channels[channel.0].is_edge());
        let now = self.queue.now();
        let id = self.metrics.register_interest();
        let interest = Interest::new(id, name, now);
        info!("About to send request for {}", interest.name);
        let completed = self.forward_interest(now, channel, Endpoint::User, interest);
        (id, completed)
    }

    /// Drive the event loop until `deadline`. Later events stay pending and
    /// carry over into the next sample.
    pub fn run_until(&mut self, deadline: SimTime) -> Result<()> {
        while let Some((now, event)) = self.queue.next_before(deadline) {
            self.handle_event(now, event)?;
        }
        self.queue.advance_to(deadline);
        Ok(())
    }

    pub fn begin_sample(&mut self) {
        self.metrics.mark_sample_start();
    }

    /// End-of-sample reset: every content store is emptied (or refilled,
    /// per policy) and the network-wide cache census starts over.
    pub fn reset_content_stores(&mut self) {
        for node in &mut self.nodes {
            node.clear_content_store();
        }
        self.metrics.reset_cache_status();
        if self.config.cache_reset == CacheResetPolicy::Prefill {
            self.prefill_content_stores();
        }
    }

    fn prefill_content_stores(&mut self) {
        let now = self.queue.now();
        for index in 0..self.nodes.len() {
            let names: Vec<Name> = self
                .name_universe
                .choose_multiple(&mut self.rng, self.config.cache_size)
                .cloned()
                .collect();
            for name in names {
                let data = Data::new(name, now, &self.config, &mut self.rng);
                self.nodes[index].prefill_content_store(data, &mut self.metrics);
            }
        }
    }

    /// Average over nodes of `cache_hits / total_requests`, skipping nodes
    /// that saw no traffic.
    pub fn average_cache_hit_ratio(&self) -> f64 {
        let mut total = 0.0;
        let mut counted = 0usize;
        for node in &self.nodes {
            if node.total_requests() != 0 {
                total += node.cache_hits() as f64 / node.total_requests() as f64;
                counted += 1;
            }
        }
        if counted == 0 {
            0.0
        } else {
            total / counted as f64
        }
    }

    pub fn report(&self) -> MetricsSummary {
        self.metrics.summarize(self.average_cache_hit_ratio())
    }

    /// Invariant check used by tests: the cache census matches the number
    /// of content stores actually holding each name.
    pub fn cache_status_consistent(&self) -> bool {
        self.name_universe.iter().all(|name| {
            let held = self
                .nodes
                .iter()
                .filter(|node| node.content_store().entries().any(|data| data.name == *name))
                .count();
            held == self.metrics.cached_copies(name)
        })
    }

    fn handle_event(&mut self, now: SimTime, event: Event) -> Result<()> {
        debug!("{:?} Processing event {:?}", now, event);
        match event {
            Event::InterestDelivery {
                channel,
                receiver,
                interest,
            } => match receiver {
                // Users do not consume interests.
                Endpoint::User => {
                    trace!("Channel {} dropping user-bound interest {}", channel, interest.name)
                }
                Endpoint::Node(node) => {
                    trace!(
                        "Channel {} forwarding request for {} to node {}",
                        channel,
                        interest.name,
                        node
                    );
                    if self.nodes[node.0].enqueue_interest(channel, interest) {
                        self.queue.schedule_at(now, Event::InterestWake { node, channel });
                    }
                }
            },
            Event::DataDelivery {
                channel,
                receiver,
                data,
                interest,
            } => match receiver {
                Endpoint::User => {
                    let return_time = now - interest.creation_time;
                    info!("Returning data {} to user; took {:?}", data.name, return_time);
                    self.metrics.record_return_time(return_time);
                }
                Endpoint::Node(node) => {
                    trace!("Channel {} forwarding {} to node {}", channel, data.name, node);
                    if self.nodes[node.0].enqueue_data(channel, data) {
                        self.queue.schedule_at(now, Event::DataWake { node, channel });
                    }
                }
            },
            Event::InterestWake { node, channel } => {
                if let Some(interest) = self.nodes[node.0].next_interest(channel) {
                    let actions = self.nodes[node.0].receive_interest(
                        interest,
                        channel,
                        now,
                        &self.config,
                        &mut self.metrics,
                        &mut self.rng,
                    )?;
                    let completed = self.perform(now, Endpoint::Node(node), actions);
                    self.queue
                        .schedule_at(completed, Event::InterestWake { node, channel });
                }
            }
            Event::DataWake { node, channel } => {
                if let Some(data) = self.nodes[node.0].next_data(channel) {
                    let actions = self.nodes[node.0].receive_data(
                        data,
                        now,
                        &self.config,
                        &mut self.metrics,
                        &mut self.rng,
                    );
                    let completed = self.perform(now, Endpoint::Node(node), actions);
                    self.queue
                        .schedule_at(completed, Event::DataWake { node, channel });
                }
            }
            Event::NextArrival => {
                let (name, channel) = self.generator.pick(&mut self.rng);
                let (_, completed) = self.emit(name, channel);
                // The generator suspends through the edge forward before
                // waiting out the next inter-arrival draw.
                let wait = self.generator.sample_wait(&mut self.rng);
                self.queue.schedule_at(completed + wait, Event::NextArrival);
            }
        }
        Ok(())
    }

    /// Carry out forwards in order. Each one samples its channel delay,
    /// schedules the delivery, and suspends the caller until the delivery
    /// time, so back-to-back forwards accumulate their delays.
    fn perform(&mut self, start: SimTime, from: Endpoint, actions: Vec<ForwardAction>) -> SimTime {
        let mut clock = start;
        for action in actions {
            clock = match action {
                ForwardAction::SendInterest { channel, interest } => {
                    self.forward_interest(clock, channel, from, interest)
                }
                ForwardAction::SendData {
                    channel,
                    data,
                    interest,
                } => self.forward_data(clock, channel, from, data, interest),
            };
        }
        clock
    }

    fn forward_interest(
        &mut self,
        start: SimTime,
        channel: ChannelId,
        from: Endpoint,
        interest: Interest,
    ) -> SimTime {
        let (length_m, receiver) = {
            let link = &self.channels[channel.0];
            (link.length_m(), link.receiver(from))
        };
        let delay = self.delay.sample(length_m, interest.size_bits, &mut self.rng);
        let arrival = start + delay;
        self.queue.schedule_at(
            arrival,
            Event::InterestDelivery {
                channel,
                receiver,
                interest,
            },
        );
        arrival
    }

    fn forward_data(
        &mut self,
        start: SimTime,
        channel: ChannelId,
        from: Endpoint,
        data: Data,
        interest: Interest,
    ) -> SimTime {
        let (length_m, receiver) = {
            let link = &self.channels[channel.0];
            (link.length_m(), link.receiver(from))
        };
        let delay = self.delay.sample(length_m, data.size_bits, &mut self.rng);
        let arrival = start + delay;
        self.queue.schedule_at(
            arrival,
            Event::DataDelivery {
                channel,
                receiver,
                data,
                interest,
            },
        );
        arrival
    }
}

// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use ndn_lib::{
    base_types::{ChannelId, Name, NodeId, SimTime},
    configuration::{DataSizing, SimulationConfig},
    descriptor::{EdgeChannel, Link, NetworkDescriptor},
};
use ndn_sim::{
    driver,
    scenario::{fleet, shortest_path_fibs, Scenario},
    world::World,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// user -- 0 -- 1 -- 2, where node 2 produces `p/*`.
fn three_node_line() -> Scenario {
    let descriptor = NetworkDescriptor {
        num_nodes: 3,
        links: vec![
            Link {
                id: 1,
                a: 0,
                b: 1,
                length_m: 300.0,
            },
            Link {
                id: 2,
                a: 1,
                b: 2,
                length_m: 450.0,
            },
        ],
        edge_channels: vec![EdgeChannel {
            id: 0,
            node: 0,
            length_m: 900.0,
        }],
    };
    let catalogues = vec![
        vec![Name::from("n0")],
        vec![Name::from("n1")],
        vec![Name::from("p"), Name::from("p/x"), Name::from("p/y")],
    ];
    let fibs = shortest_path_fibs(&descriptor, &catalogues);
    Scenario {
        descriptor,
        catalogues,
        fibs,
        central_producer: NodeId(2),
    }
}

fn quiet_config(prob: f64) -> SimulationConfig {
    SimulationConfig {
        prob,
        delay_variance: 0.0,
        data_sizing: DataSizing::Jittered {
            base_bits: 2000.0,
            jitter_bits: 0.0,
        },
        ..SimulationConfig::default()
    }
}

#[test]
fn test_duplicate_interests_share_one_upstream_request() {
    let scenario = three_node_line();
    let mut world = World::new(&scenario, quiet_config(1.0), 52).unwrap();
    // Two interests for the same name, in flight together before any data
    // can return.
    world.emit_interest(Name::from("p/x"), ChannelId(0));
    world.emit_interest(Name::from("p/x"), ChannelId(0));
    world.run_until(SimTime(100.0)).unwrap();

    // Node 0 forwarded exactly one request upstream.
    assert_eq!(world.node(NodeId(1)).total_requests(), 1);
    assert_eq!(world.node(NodeId(2)).total_requests(), 1);
    assert_eq!(world.metrics().hit_distances(), &[3, 1]);
    // Both copies were delivered, later ones later in time.
    let return_times = world.metrics().return_times();
    assert_eq!(return_times.len(), 2);
    assert!(return_times[0] < return_times[1]);
    // Every pending entry was resolved.
    for node in world.nodes() {
        assert!(node.pending_interests().is_empty());
    }
    assert!(world.cache_status_consistent());
}

#[test]
fn test_sample_boundaries_slice_the_run() {
    let scenario = fleet(&mut Xoshiro256StarStar::seed_from_u64(3));
    let mut config = quiet_config(1.0);
    config.run_time = ndn_lib::base_types::Duration(60.0);
    config.arrival_mean = 2.0;
    config.samples = 2;
    let mut world = World::new(&scenario, config.clone(), 19).unwrap();
    world.start_traffic();

    world.begin_sample();
    world.run_until(SimTime(60.0)).unwrap();
    world.reset_content_stores();
    let after_first = world.metrics().interests();

    world.begin_sample();
    world.run_until(SimTime(120.0)).unwrap();
    world.reset_content_stores();

    assert!(after_first > 0);
    assert!(world.metrics().interests() > after_first);
    let (hd_marks, rt_marks) = world.metrics().sample_marks();
    // The second sample's slice starts strictly after the first sample's
    // last interest id.
    assert_eq!(hd_marks, &[0, after_first]);
    assert!(rt_marks[1] >= rt_marks[0]);
    // Stores were cleared at both boundaries.
    for node in world.nodes() {
        assert!(node.content_store().is_empty());
    }
    assert!(world.cache_status_consistent());
}

#[test]
fn test_runs_are_deterministic_under_a_seed() {
    let scenario = fleet(&mut Xoshiro256StarStar::seed_from_u64(3));
    let config = SimulationConfig {
        arrival_mean: 2.0,
        ..SimulationConfig::default()
    };

    let mut results = Vec::new();
    for _ in 0..2 {
        let mut world = World::new(&scenario, config.clone(), 48).unwrap();
        world.start_traffic();
        world.begin_sample();
        world.run_until(SimTime(300.0)).unwrap();
        results.push((
            world.metrics().hit_distances().to_vec(),
            world.metrics().return_times().to_vec(),
        ));
    }
    assert!(!results[0].0.is_empty());
    assert_eq!(results[0].0, results[1].0);
    assert_eq!(results[0].1, results[1].1);
}

#[test]
fn test_cache_off_leaves_producers_to_serve_everything() {
    let scenario = fleet(&mut Xoshiro256StarStar::seed_from_u64(3));
    let mut config = quiet_config(0.0);
    config.arrival_mean = 2.0;
    config.run_time = ndn_lib::base_types::Duration(300.0);
    let mut world = World::new(&scenario, config, 7).unwrap();
    world.start_traffic();
    world.begin_sample();
    world.run_until(SimTime(300.0)).unwrap();

    assert!(world.metrics().deliveries() > 0);
    for node in world.nodes() {
        assert_eq!(node.cache_hits(), 0);
        assert!(node.content_store().is_empty());
    }
    assert_eq!(world.average_cache_hit_ratio(), 0.0);
    assert!(world.cache_status_consistent());
}

#[test]
fn test_fleet_run_produces_a_sane_summary() {
    let scenario = fleet(&mut Xoshiro256StarStar::seed_from_u64(11));
    let config = SimulationConfig {
        samples: 2,
        run_time: ndn_lib::base_types::Duration(120.0),
        arrival_mean: 2.0,
        ..SimulationConfig::default()
    };
    let summary = driver::run(&scenario, &config, 52, None).unwrap();

    assert!(summary.interests > 0);
    assert!(summary.deliveries > 0);
    assert!(summary.deliveries <= summary.interests);
    assert!(summary.hit_distance_mean > 0.0);
    assert!(summary.return_time_mean > 0.0);
    assert!(summary.hit_distance_variance >= 0.0);
    assert!(summary.return_time_variance >= 0.0);
    assert_eq!(summary.sample_hit_distance_means.len(), 2);
    assert!((0.0..=1.0).contains(&summary.cache_hit_ratio));
    let pct_sum: f64 = summary.hit_distance_percentages.iter().sum();
    assert!(pct_sum <= 100.0 + 1e-9);
    // Every delivered interest crossed at least one node.
    for (distance, delivered) in summary
        .sample_hit_distance_means
        .iter()
        .zip(summary.sample_return_time_means.iter())
    {
        assert!(*distance > 0.0);
        assert!(*delivered > 0.0);
    }
}

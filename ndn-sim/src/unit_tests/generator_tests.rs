// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use super::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn catalogues() -> Vec<Vec<Name>> {
    vec![
        vec![Name::from("a"), Name::from("a/x")],
        vec![Name::from("b")],
        vec![Name::from("c"), Name::from("c/x"), Name::from("c/y")],
    ]
}

#[test]
fn test_full_central_bias() {
    let config = SimulationConfig {
        p_central: 1.0,
        ..SimulationConfig::default()
    };
    let generator = InterestGenerator::new(
        vec![ChannelId(0), ChannelId(7)],
        catalogues(),
        NodeId(2),
        &config,
    );
    let mut rng = Xoshiro256StarStar::seed_from_u64(9);
    for _ in 0..50 {
        let (name, channel) = generator.pick(&mut rng);
        assert!(name.has_prefix(&Name::from("c")));
        assert!(channel == ChannelId(0) || channel == ChannelId(7));
    }
}

#[test]
fn test_names_come_from_catalogues() {
    let config = SimulationConfig {
        p_central: 0.0,
        ..SimulationConfig::default()
    };
    let generator =
        InterestGenerator::new(vec![ChannelId(0)], catalogues(), NodeId(2), &config);
    let mut rng = Xoshiro256StarStar::seed_from_u64(9);
    let all: Vec<Name> = catalogues().into_iter().flatten().collect();
    let mut seen_non_central = false;
    for _ in 0..100 {
        let (name, channel) = generator.pick(&mut rng);
        assert!(all.contains(&name));
        assert_eq!(channel, ChannelId(0));
        if !name.has_prefix(&Name::from("c")) {
            seen_non_central = true;
        }
    }
    assert!(seen_non_central);
}

#[test]
fn test_waits_are_positive() {
    let config = SimulationConfig::default();
    let generator =
        InterestGenerator::new(vec![ChannelId(0)], catalogues(), NodeId(0), &config);
    let mut rng = Xoshiro256StarStar::seed_from_u64(9);
    for _ in 0..100 {
        assert!(generator.sample_wait(&mut rng).0 > 0.0);
    }
}

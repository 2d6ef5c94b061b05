// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use super::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn config() -> SimulationConfig {
    SimulationConfig::default()
}

#[test]
fn test_ttl_follows_name_kind() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let config = config();
    let now = SimTime(100.0);
    let health = Data::new(Name::from("uuv1/health_info/log"), now, &config, &mut rng);
    assert_eq!(health.send_time, now);
    assert_eq!(health.expire_time, now + config.hi_ttl);
    let mission = Data::new(Name::from("uuv1/mission_info/route"), now, &config, &mut rng);
    assert_eq!(mission.expire_time, now + config.mi_ttl);
}

#[test]
fn test_expiry() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(1);
    let data = Data::new(Name::from("uuv1/mission_info"), SimTime(0.0), &config(), &mut rng);
    assert!(!data.is_expired(SimTime(39.9)));
    assert!(data.is_expired(SimTime(40.0)));
    assert_eq!(data.remaining_ttl(SimTime(10.0)), Duration(30.0));
}

#[test]
fn test_jittered_size() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(5);
    let mut config = config();
    for _ in 0..50 {
        let data = Data::new(Name::from("usv1"), SimTime(0.0), &config, &mut rng);
        assert!(data.size_bits >= 1800.0 && data.size_bits <= 2200.0);
    }
    config.data_sizing = DataSizing::Jittered {
        base_bits: 2000.0,
        jitter_bits: 0.0,
    };
    let data = Data::new(Name::from("usv1"), SimTime(0.0), &config, &mut rng);
    assert_eq!(data.size_bits, 2000.0);
}

#[test]
fn test_depth_scaled_size() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(5);
    let mut config = config();
    config.data_sizing = DataSizing::DepthScaled;
    let shallow = Data::new(Name::from("uuv1"), SimTime(0.0), &config, &mut rng);
    assert_eq!(shallow.size_bits, 40.0 + 524_280.0);
    let deep = Data::new(
        Name::from("uuv1/health_info/battery_level"),
        SimTime(0.0),
        &config,
        &mut rng,
    );
    assert_eq!(deep.size_bits, 40.0 + 524_280.0 / 3.0);
    assert!(deep.size_bits < shallow.size_bits);
}

#[test]
fn test_interest_size_is_fixed() {
    let interest = Interest::new(InterestId(0), Name::from("uuv1"), SimTime(2.0));
    assert_eq!(interest.size_bits, INTEREST_SIZE_BITS);
    assert_eq!(interest.creation_time, SimTime(2.0));
}

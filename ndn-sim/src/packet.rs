// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use ndn_lib::{
    base_types::{Duration, InterestId, Name, SimTime},
    configuration::{DataSizing, SimulationConfig},
};
use rand::Rng;

#[cfg(test)]
#[path = "unit_tests/packet_tests.rs"]
mod packet_tests;

/// Size of every interest packet, in bits.
pub const INTEREST_SIZE_BITS: f64 = 1000.0;

/// Names carrying this segment expire on the health-info TTL.
pub const HEALTH_INFO_TOKEN: &str = "health_info";

/// A request packet naming the data the requester wants.
#[derive(Clone, Debug)]
pub struct Interest {
    pub id: InterestId,
    pub name: Name,
    pub creation_time: SimTime,
    pub size_bits: f64,
}

impl Interest {
    pub fn new(id: InterestId, name: Name, now: SimTime) -> Interest {
        Interest {
            id,
            name,
            creation_time: now,
            size_bits: INTEREST_SIZE_BITS,
        }
    }
}

/// A named payload returned in response to an interest.
#[derive(Clone, Debug)]
pub struct Data {
    pub name: Name,
    pub send_time: SimTime,
    pub expire_time: SimTime,
    pub size_bits: f64,
}

impl Data {
    pub fn new<R: Rng>(name: Name, now: SimTime, config: &SimulationConfig, rng: &mut R) -> Data {
        let size_bits = match config.data_sizing {
            DataSizing::Jittered {
                base_bits,
                jitter_bits,
            } => {
                if jitter_bits == 0.0 {
                    base_bits
                } else {
                    rng.gen_range(base_bits - jitter_bits..=base_bits + jitter_bits)
                }
            }
            // Size has an inverse relationship with the specificity of the name.
            DataSizing::DepthScaled => 40.0 + 524_280.0 / (name.depth() as f64 + 1.0),
        };
        let ttl = if name.contains_token(HEALTH_INFO_TOKEN) {
            config.hi_ttl
        } else {
            config.mi_ttl
        };
        Data {
            expire_time: now + ttl,
            send_time: now,
            name,
            size_bits,
        }
    }

    pub fn is_expired(&self, now: SimTime) -> bool {
        self.expire_time <= now
    }

    pub fn remaining_ttl(&self, now: SimTime) -> Duration {
        self.expire_time - now
    }
}

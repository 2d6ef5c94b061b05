// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use anyhow::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "unit_tests/base_type_tests.rs"]
mod base_type_tests;

pub type Result<T> = std::result::Result<T, Error>;

/// Simulated time, in seconds since the start of the simulation.
#[derive(Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime(pub f64);

/// A span of simulated time, in seconds.
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration(pub f64);

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize, Debug)]
pub struct NodeId(pub usize);

#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize, Debug)]
pub struct ChannelId(pub usize);

/// Index of an interest in the run-global `hit_distances` array.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Serialize, Deserialize, Debug)]
pub struct InterestId(pub usize);

/// One end of a channel: either a forwarding node or the external user side.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Serialize, Deserialize, Debug)]
pub enum Endpoint {
    User,
    Node(NodeId),
}

/// A slash-separated hierarchical data name, e.g. `uuv1/health_info/battery_level`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Serialize, Deserialize)]
pub struct Name(String);

impl Eq for SimTime {}

// Simulated clocks never hold NaN, so the total order is the IEEE one.
impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{:.4}", self.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}s", self.0)
    }
}

impl std::ops::Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        SimTime(self.0 + rhs.0)
    }
}

impl std::ops::Sub<SimTime> for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl std::ops::Add<Duration> for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Self::Output {
        Duration(self.0 + rhs.0)
    }
}

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn max_update(&mut self, time: SimTime) {
        *self = std::cmp::max(*self, time);
    }
}

impl Name {
    pub fn new<S: Into<String>>(name: S) -> Name {
        Name(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment-aware prefix test: `a/b` is a prefix of `a/b` and `a/b/c`,
    /// but `uuv1` is not a prefix of `uuv10/x`.
    pub fn has_prefix(&self, prefix: &Name) -> bool {
        match self.0.strip_prefix(&prefix.0) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Whether some segment of the name equals `token`.
    pub fn contains_token(&self, token: &str) -> bool {
        self.0.split('/').any(|segment| segment == token)
    }

    /// Number of `/` separators in the name.
    pub fn depth(&self) -> usize {
        self.0.matches('/').count()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Name {
        Name(name.to_string())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

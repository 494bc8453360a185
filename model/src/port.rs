// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Inclusive ranges of L4 ports

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SubRange {
    pub start: u16,
    pub end: u16,
}

impl SubRange {
    pub const ALL_PORTS: SubRange = SubRange {
        start: 0,
        end: u16::MAX,
    };

    /// Build a range. Returns `None` if `start` is greater than `end`.
    #[must_use]
    pub fn new(start: u16, end: u16) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    #[must_use]
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    #[must_use]
    pub fn contains(&self, port: u16) -> bool {
        self.start <= port && port <= self.end
    }

    /// Tell if the range spans all possible ports
    #[must_use]
    pub fn is_full(&self) -> bool {
        *self == Self::ALL_PORTS
    }
}

impl Display for SubRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

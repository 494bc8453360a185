// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The verdict of a filter line

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum LineAction {
    Permit,
    #[default]
    Deny,
}

impl LineAction {
    #[must_use]
    pub fn is_permit(&self) -> bool {
        matches!(self, LineAction::Permit)
    }
}

impl From<bool> for LineAction {
    fn from(permit: bool) -> Self {
        if permit {
            LineAction::Permit
        } else {
            LineAction::Deny
        }
    }
}

impl Display for LineAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineAction::Permit => write!(f, "ALLOW"),
            LineAction::Deny => write!(f, "DENY"),
        }
    }
}

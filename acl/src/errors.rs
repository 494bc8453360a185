// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors found when compiling network ACL entries

use crate::entry::AclDirection;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum AclError {
    #[error("Duplicate rule number {rule} in {direction} entries of network ACL {acl}")]
    DuplicateRuleNumber {
        acl: String,
        direction: AclDirection,
        rule: u32,
    },
    #[error("Invalid port range {from}..{to} in rule {rule} of network ACL {acl}")]
    InvalidPortRange {
        acl: String,
        rule: u32,
        from: i32,
        to: i32,
    },
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cloud network ACLs: compilation of provider entries into ordered packet filters,
//! and first-match evaluation of flows against the compiled filters.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod access_list;
pub mod compile;
pub mod display;
pub mod entry;
pub mod errors;

pub use access_list::{FilterResult, Flow, IpAccessList, IpAccessListLine};
pub use compile::{CompileOptions, DuplicateRulePolicy, compile};
pub use entry::{
    AclDirection, NetworkAcl, NetworkAclAssociation, NetworkAclEntry, NetworkAclEntryBuilder,
    PortRange, RuleAction,
};
pub use errors::AclError;

use tracectl::trace_target;
trace_target!("acl", LevelFilter::INFO, &["filtering"]);

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Policy evaluation errors. These are all configuration-consistency defects: the
//! inputs cannot be analyzed. Routes that are not matched or get rejected are
//! ordinary results, never errors.

use model::Prefix;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PolicyError {
    #[error("Routing policy '{0}' is not defined")]
    UndefinedRoutingPolicy(String),
    #[error("Routing policy '{0}' is already defined")]
    DuplicateRoutingPolicy(String),
    #[error("No EIGRP settings were generated for interface '{interface}' of {hostname}")]
    MissingEigrpInterfaceSettings { interface: String, hostname: String },
    #[error("Connected route {0} evaluated outside of a redistribution context")]
    NoRedistributionContext(Prefix),
    #[error("EIGRP process {0} has no redistribution policy")]
    NoRedistributionPolicy(u32),
    #[error("Connected route {0} has no next-hop interface")]
    MissingNextHopInterface(Prefix),
    #[error("Routing policy '{policy}' belongs to {owner}, not to {hostname}")]
    ForeignPolicyOwner {
        policy: String,
        owner: String,
        hostname: String,
    },
    #[error("Routing policy '{0}' calls itself")]
    CircularReference(String),
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral routing policy interpreter. A policy is a list of statements guarded
//! by boolean expressions over the route being evaluated; evaluation happens in an
//! [`Environment`] that borrows the device configuration and the policies visible to it.

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

pub mod display;
pub mod environment;
pub mod errors;
pub mod expr;
pub mod redistribution;
pub mod result;
pub mod routing_policy;
pub mod statement;

pub use environment::Environment;
pub use errors::PolicyError;
pub use expr::{BooleanExpr, IntComparator, PrefixRange};
pub use redistribution::redistribute_into_eigrp;
pub use result::EvalResult;
pub use routing_policy::{RoutingPolicy, RoutingPolicyTable};
pub use statement::Statement;

use tracectl::trace_target;
trace_target!("policy", LevelFilter::INFO, &["routing"]);

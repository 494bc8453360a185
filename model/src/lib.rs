// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Vendor-neutral records describing network devices and the traffic they carry:
//! prefixes and wildcards, IP protocols, port ranges, filter actions, routes and the
//! device configuration that owns them. These types carry no behavior beyond equality,
//! ordering and containment checks; the evaluation engines live in other crates.

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

pub mod action;
pub mod device;
pub mod errors;
pub mod port;
pub mod prefix;
pub mod protocol;
pub mod route;
pub mod wildcard;

// re-exports
pub use action::LineAction;
pub use device::{Configuration, EigrpInterfaceSettings, EigrpProcess, Interface};
pub use errors::{ConfigError, ConfigResult};
pub use port::SubRange;
pub use prefix::{Prefix, PrefixError};
pub use protocol::IpProtocol;
pub use route::{Community, Route, RouteKind, RoutingProtocol};
pub use wildcard::IpWildcard;

use tracectl::trace_target;
trace_target!("model", LevelFilter::INFO, &["config"]);

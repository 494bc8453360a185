// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network prefixes, as they appear in interface addresses, routes and filter entries.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
pub use std::net::IpAddr;
pub use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrefixError {
    #[error("'{0}' is not a prefix in CIDR notation")]
    Invalid(String),
    #[error("Prefix length {0} exceeds the address width")]
    InvalidLength(u8),
}

/// An IPv4 or IPv6 network. Only the network part is kept: `10.1.2.3/8` and
/// `10.0.0.0/8` are the same prefix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub enum Prefix {
    V4(Ipv4Net),
    V6(Ipv6Net),
}

impl Prefix {
    pub const MAX_LEN_IPV4: u8 = 32;
    pub const MAX_LEN_IPV6: u8 = 128;

    /// `0.0.0.0/0`. Network ACL entries use it to match any address.
    #[must_use]
    pub fn root_v4() -> Prefix {
        Prefix::V4(Ipv4Net::new_assert(Ipv4Addr::UNSPECIFIED, 0))
    }
    #[must_use]
    pub fn root_v6() -> Prefix {
        Prefix::V6(Ipv6Net::new_assert(Ipv6Addr::UNSPECIFIED, 0))
    }
    /// Tell if the prefix spans the whole address space of its family
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.length() == 0
    }

    /// Build the prefix of length `len` that contains `addr`
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, PrefixError> {
        let net = IpNet::new(addr, len).map_err(|_| PrefixError::InvalidLength(len))?;
        Ok(Self::from(net))
    }

    #[must_use]
    pub fn is_ipv4(&self) -> bool {
        matches!(self, Prefix::V4(_))
    }
    #[must_use]
    pub fn is_ipv6(&self) -> bool {
        matches!(self, Prefix::V6(_))
    }
    #[must_use]
    pub fn length(&self) -> u8 {
        match self {
            Prefix::V4(net) => net.prefix_len(),
            Prefix::V6(net) => net.prefix_len(),
        }
    }
    /// Width of the addresses of the prefix family
    #[must_use]
    pub fn max_length(&self) -> u8 {
        match self {
            Prefix::V4(_) => Self::MAX_LEN_IPV4,
            Prefix::V6(_) => Self::MAX_LEN_IPV6,
        }
    }

    /// Tell if the address belongs to the prefix. Addresses of the other family never do.
    #[must_use]
    pub fn covers_addr(&self, addr: &IpAddr) -> bool {
        match (self, addr) {
            (Prefix::V4(net), IpAddr::V4(a)) => net.contains(a),
            (Prefix::V6(net), IpAddr::V6(a)) => net.contains(a),
            _ => false,
        }
    }
    /// Tell if `other` is equal to or more specific than this prefix
    #[must_use]
    pub fn covers(&self, other: &Prefix) -> bool {
        match (self, other) {
            (Prefix::V4(net), Prefix::V4(o)) => net.contains(o),
            (Prefix::V6(net), Prefix::V6(o)) => net.contains(o),
            _ => false,
        }
    }

    #[cfg(any(test, feature = "testing"))]
    #[allow(clippy::missing_panics_doc, clippy::expect_used)]
    pub fn expect_from<T>(val: T) -> Self
    where
        T: TryInto<Prefix>,
        T::Error: Debug,
    {
        val.try_into().expect("Invalid prefix")
    }
}

impl From<IpNet> for Prefix {
    fn from(net: IpNet) -> Self {
        match net.trunc() {
            IpNet::V4(net) => Prefix::V4(net),
            IpNet::V6(net) => Prefix::V6(net),
        }
    }
}
impl From<Ipv4Net> for Prefix {
    fn from(net: Ipv4Net) -> Self {
        Prefix::V4(net.trunc())
    }
}
impl From<Ipv6Net> for Prefix {
    fn from(net: Ipv6Net) -> Self {
        Prefix::V6(net.trunc())
    }
}

impl TryFrom<(IpAddr, u8)> for Prefix {
    type Error = PrefixError;

    fn try_from((addr, len): (IpAddr, u8)) -> Result<Self, Self::Error> {
        Prefix::new(addr, len)
    }
}

impl TryFrom<&str> for Prefix {
    type Error = PrefixError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Prefix::from_str(s)
    }
}

impl FromStr for Prefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpNet::from_str(s.trim())
            .map(Prefix::from)
            .map_err(|_| PrefixError::Invalid(s.to_owned()))
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prefix::V4(net) => write!(f, "{net}"),
            Prefix::V6(net) => write!(f, "{net}"),
        }
    }
}

/* Prefixes travel as their CIDR string, which is what provider dumps carry */
impl Serialize for Prefix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cidr = String::deserialize(deserializer)?;
        Prefix::from_str(&cidr).map_err(serde::de::Error::custom)
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IP wildcards: sets of addresses expressed either as a prefix or as an address plus a
//! wildcard mask, where set bits in the mask are "don't care" bits.

use crate::prefix::{IpAddr, Ipv4Addr, Prefix, PrefixError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum IpWildcard {
    Prefix(Prefix),
    Mask { address: Ipv4Addr, wildcard: Ipv4Addr },
}

impl IpWildcard {
    /// Tell if the given address belongs to the set denoted by this wildcard
    #[must_use]
    pub fn contains(&self, addr: &IpAddr) -> bool {
        match (self, addr) {
            (IpWildcard::Prefix(prefix), _) => prefix.covers_addr(addr),
            (IpWildcard::Mask { address, wildcard }, IpAddr::V4(a)) => {
                let care = !wildcard.to_bits();
                a.to_bits() & care == address.to_bits() & care
            }
            (IpWildcard::Mask { .. }, IpAddr::V6(_)) => false,
        }
    }

    /// Tell if this wildcard matches every address of its family
    #[must_use]
    pub fn is_any(&self) -> bool {
        match self {
            IpWildcard::Prefix(prefix) => prefix.is_root(),
            IpWildcard::Mask { wildcard, .. } => wildcard.to_bits() == u32::MAX,
        }
    }
}

impl From<Prefix> for IpWildcard {
    fn from(prefix: Prefix) -> Self {
        IpWildcard::Prefix(prefix)
    }
}

impl FromStr for IpWildcard {
    type Err = PrefixError;

    /// Accepts `a.b.c.d/len`, `a.b.c.d:w.x.y.z` or a bare host address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains('/') {
            return Ok(IpWildcard::Prefix(Prefix::from_str(s)?));
        }
        if let Some((address, wildcard)) = s.split_once(':')
            && let (Ok(address), Ok(wildcard)) =
                (address.parse::<Ipv4Addr>(), wildcard.parse::<Ipv4Addr>())
        {
            return Ok(IpWildcard::Mask { address, wildcard });
        }
        match IpAddr::from_str(s) {
            Ok(addr @ IpAddr::V4(_)) => Ok(IpWildcard::Prefix(Prefix::new(addr, 32)?)),
            Ok(addr @ IpAddr::V6(_)) => Ok(IpWildcard::Prefix(Prefix::new(addr, 128)?)),
            Err(_) => Err(PrefixError::Invalid(s.to_string())),
        }
    }
}

impl Display for IpWildcard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpWildcard::Prefix(prefix) => write!(f, "{prefix}"),
            IpWildcard::Mask { address, wildcard } => write!(f, "{address}:{wildcard}"),
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! IP protocol numbers, with names for the protocols that filters commonly reference.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum IpProtocol {
    Icmp,
    Igmp,
    Tcp,
    Udp,
    Gre,
    Esp,
    Ah,
    Icmpv6,
    Eigrp,
    Ospf,
    Pim,
    Vrrp,
    Sctp,
    Other(u8),
}

impl IpProtocol {
    /// Map a protocol number to its `IpProtocol`
    #[must_use]
    pub fn from_number(number: u8) -> Self {
        match number {
            1 => IpProtocol::Icmp,
            2 => IpProtocol::Igmp,
            6 => IpProtocol::Tcp,
            17 => IpProtocol::Udp,
            47 => IpProtocol::Gre,
            50 => IpProtocol::Esp,
            51 => IpProtocol::Ah,
            58 => IpProtocol::Icmpv6,
            88 => IpProtocol::Eigrp,
            89 => IpProtocol::Ospf,
            103 => IpProtocol::Pim,
            112 => IpProtocol::Vrrp,
            132 => IpProtocol::Sctp,
            n => IpProtocol::Other(n),
        }
    }

    /// The IANA protocol number
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            IpProtocol::Icmp => 1,
            IpProtocol::Igmp => 2,
            IpProtocol::Tcp => 6,
            IpProtocol::Udp => 17,
            IpProtocol::Gre => 47,
            IpProtocol::Esp => 50,
            IpProtocol::Ah => 51,
            IpProtocol::Icmpv6 => 58,
            IpProtocol::Eigrp => 88,
            IpProtocol::Ospf => 89,
            IpProtocol::Pim => 103,
            IpProtocol::Vrrp => 112,
            IpProtocol::Sctp => 132,
            IpProtocol::Other(n) => *n,
        }
    }

    /// Interpret a protocol code as found in cloud network ACL entries. Codes are either
    /// a decimal protocol number or a lowercase name. `-1` and `all` stand for any
    /// protocol, and so does any code that we fail to recognize: `None` is returned in
    /// both cases.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        match code.to_ascii_lowercase().as_str() {
            "-1" | "all" | "" => None,
            "icmp" => Some(IpProtocol::Icmp),
            "tcp" => Some(IpProtocol::Tcp),
            "udp" => Some(IpProtocol::Udp),
            "icmpv6" | "icmp6" => Some(IpProtocol::Icmpv6),
            other => {
                if let Ok(number) = other.parse::<u8>() {
                    Some(IpProtocol::from_number(number))
                } else {
                    debug!("Unrecognized protocol code '{code}': will match any protocol");
                    None
                }
            }
        }
    }
}

impl Display for IpProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpProtocol::Icmp => write!(f, "ICMP"),
            IpProtocol::Igmp => write!(f, "IGMP"),
            IpProtocol::Tcp => write!(f, "TCP"),
            IpProtocol::Udp => write!(f, "UDP"),
            IpProtocol::Gre => write!(f, "GRE"),
            IpProtocol::Esp => write!(f, "ESP"),
            IpProtocol::Ah => write!(f, "AHP"),
            IpProtocol::Icmpv6 => write!(f, "IPV6_ICMP"),
            IpProtocol::Eigrp => write!(f, "EIGRP"),
            IpProtocol::Ospf => write!(f, "OSPF"),
            IpProtocol::Pim => write!(f, "PIM"),
            IpProtocol::Vrrp => write!(f, "VRRP"),
            IpProtocol::Sctp => write!(f, "SCTP"),
            IpProtocol::Other(n) => write!(f, "UNNAMED_{n}"),
        }
    }
}

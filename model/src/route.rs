// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routes, as found in device routing tables or offered for redistribution into
//! another protocol. All routes share a destination, next-hop and preference
//! attributes; protocol-specific attributes live in the [`RouteKind`].

use crate::prefix::{IpAddr, Prefix};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

/// The protocol a route was learnt from
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum RoutingProtocol {
    Connected,
    Local,
    Static,
    Eigrp,
    Ospf,
    Bgp,
    Isis,
    Rip,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EigrpRouteType {
    Internal,
    External,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OspfRouteType {
    IntraArea,
    InterArea,
    External1,
    External2,
}

/// A standard BGP community, shown as `asn:value`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Community(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EigrpAttributes {
    pub process_asn: u32,
    pub route_type: EigrpRouteType,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OspfAttributes {
    pub area: u32,
    pub route_type: OspfRouteType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BgpAttributes {
    pub as_path: Vec<u32>,
    pub communities: BTreeSet<Community>,
    pub local_preference: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteKind {
    Connected,
    Local,
    Static,
    Eigrp(EigrpAttributes),
    Ospf(OspfAttributes),
    Bgp(BgpAttributes),
    Isis,
    Rip,
}

impl RouteKind {
    #[must_use]
    pub fn protocol(&self) -> RoutingProtocol {
        match self {
            RouteKind::Connected => RoutingProtocol::Connected,
            RouteKind::Local => RoutingProtocol::Local,
            RouteKind::Static => RoutingProtocol::Static,
            RouteKind::Eigrp(_) => RoutingProtocol::Eigrp,
            RouteKind::Ospf(_) => RoutingProtocol::Ospf,
            RouteKind::Bgp(_) => RoutingProtocol::Bgp,
            RouteKind::Isis => RoutingProtocol::Isis,
            RouteKind::Rip => RoutingProtocol::Rip,
        }
    }

    /// Default administrative distance for routes of this kind
    #[must_use]
    pub fn default_admin(&self) -> u8 {
        match self {
            RouteKind::Connected | RouteKind::Local => 0,
            RouteKind::Static => 1,
            RouteKind::Bgp(_) => 20,
            RouteKind::Eigrp(EigrpAttributes {
                route_type: EigrpRouteType::Internal,
                ..
            }) => 90,
            RouteKind::Eigrp(EigrpAttributes {
                route_type: EigrpRouteType::External,
                ..
            }) => 170,
            RouteKind::Ospf(_) => 110,
            RouteKind::Isis => 115,
            RouteKind::Rip => 120,
        }
    }
}

/// A route. The kind of a route is fixed when the route is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub network: Prefix,
    pub next_hop_interface: Option<String>,
    pub next_hop_ip: Option<IpAddr>,
    pub admin: u8,
    pub metric: u32,
    pub tag: Option<u32>,
    kind: RouteKind,
}

impl Route {
    #[must_use]
    pub fn new(network: Prefix, kind: RouteKind) -> Self {
        Self {
            network,
            next_hop_interface: None,
            next_hop_ip: None,
            admin: kind.default_admin(),
            metric: 0,
            tag: None,
            kind,
        }
    }
    /// A route to a network directly attached to interface `ifname`
    #[must_use]
    pub fn connected(network: Prefix, ifname: &str) -> Self {
        Self::new(network, RouteKind::Connected).with_next_hop_interface(ifname)
    }
    #[must_use]
    pub fn static_route(network: Prefix, next_hop_ip: IpAddr) -> Self {
        Self::new(network, RouteKind::Static).with_next_hop_ip(next_hop_ip)
    }
    /// An internal route of the EIGRP process with the given autonomous system number
    #[must_use]
    pub fn eigrp(network: Prefix, process_asn: u32) -> Self {
        Self::new(
            network,
            RouteKind::Eigrp(EigrpAttributes {
                process_asn,
                route_type: EigrpRouteType::Internal,
            }),
        )
    }
    #[must_use]
    pub fn ospf(network: Prefix, area: u32, route_type: OspfRouteType) -> Self {
        Self::new(network, RouteKind::Ospf(OspfAttributes { area, route_type }))
    }
    #[must_use]
    pub fn bgp(network: Prefix, as_path: Vec<u32>) -> Self {
        Self::new(
            network,
            RouteKind::Bgp(BgpAttributes {
                as_path,
                communities: BTreeSet::new(),
                local_preference: 100,
            }),
        )
    }

    #[must_use]
    pub fn with_next_hop_interface(mut self, ifname: &str) -> Self {
        self.next_hop_interface = Some(ifname.to_owned());
        self
    }
    #[must_use]
    pub fn with_next_hop_ip(mut self, address: IpAddr) -> Self {
        self.next_hop_ip = Some(address);
        self
    }
    #[must_use]
    pub fn with_metric(mut self, metric: u32) -> Self {
        self.metric = metric;
        self
    }
    #[must_use]
    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = Some(tag);
        self
    }
    #[must_use]
    pub fn with_admin(mut self, admin: u8) -> Self {
        self.admin = admin;
        self
    }

    /// Build a new route of the given kind for the same destination and next-hop.
    /// This is what happens to a route when it gets redistributed into another protocol.
    #[must_use]
    pub fn redistributed(&self, kind: RouteKind) -> Self {
        Self {
            network: self.network,
            next_hop_interface: self.next_hop_interface.clone(),
            next_hop_ip: self.next_hop_ip,
            admin: kind.default_admin(),
            metric: self.metric,
            tag: self.tag,
            kind,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &RouteKind {
        &self.kind
    }
    #[must_use]
    pub fn protocol(&self) -> RoutingProtocol {
        self.kind.protocol()
    }
    /// The EIGRP autonomous system of the route, if it is an EIGRP route
    #[must_use]
    pub fn process_asn(&self) -> Option<u32> {
        match &self.kind {
            RouteKind::Eigrp(attrs) => Some(attrs.process_asn),
            _ => None,
        }
    }
    #[must_use]
    pub fn bgp_attributes(&self) -> Option<&BgpAttributes> {
        match &self.kind {
            RouteKind::Bgp(attrs) => Some(attrs),
            _ => None,
        }
    }
    /// Mutable access to BGP attributes. The kind itself cannot be changed.
    pub fn bgp_attributes_mut(&mut self) -> Option<&mut BgpAttributes> {
        match &mut self.kind {
            RouteKind::Bgp(attrs) => Some(attrs),
            _ => None,
        }
    }
}

/* Impl Display */
impl Display for RoutingProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoutingProtocol::Connected => "connected",
            RoutingProtocol::Local => "local",
            RoutingProtocol::Static => "static",
            RoutingProtocol::Eigrp => "eigrp",
            RoutingProtocol::Ospf => "ospf",
            RoutingProtocol::Bgp => "bgp",
            RoutingProtocol::Isis => "isis",
            RoutingProtocol::Rip => "rip",
        };
        write!(f, "{name}")
    }
}
impl Display for Community {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.0 >> 16, self.0 & 0xffff)
    }
}
impl FromStr for Community {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((high, low)) = s.split_once(':') else {
            return Err(format!("Invalid community '{s}'"));
        };
        let high = high
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("Invalid community '{s}': {e}"))?;
        let low = low
            .trim()
            .parse::<u16>()
            .map_err(|e| format!("Invalid community '{s}': {e}"))?;
        Ok(Community((u32::from(high) << 16) | u32::from(low)))
    }
}
impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}/{}] {}", self.network, self.admin, self.metric, self.protocol())?;
        if let Some(asn) = self.process_asn() {
            write!(f, " as {asn}")?;
        }
        if let Some(address) = &self.next_hop_ip {
            write!(f, " via {address}")?;
        }
        if let Some(ifname) = &self.next_hop_interface {
            write!(f, " dev {ifname}")?;
        }
        Ok(())
    }
}

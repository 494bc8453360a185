// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Compiled packet filters and first-match evaluation of flows against them

use model::prefix::IpAddr;
use model::{IpProtocol, IpWildcard, LineAction, SubRange};
use std::collections::BTreeSet;
use tracing::trace;

/// The header fields of a packet that filters look at
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Flow {
    pub src_ip: IpAddr,
    pub dst_ip: IpAddr,
    pub ip_protocol: IpProtocol,
    pub src_port: Option<u16>,
    pub dst_port: Option<u16>,
}

impl Flow {
    #[must_use]
    pub fn new(src_ip: IpAddr, dst_ip: IpAddr, ip_protocol: IpProtocol) -> Self {
        Self {
            src_ip,
            dst_ip,
            ip_protocol,
            src_port: None,
            dst_port: None,
        }
    }
    #[must_use]
    pub fn set_src_port(mut self, port: u16) -> Self {
        self.src_port = Some(port);
        self
    }
    #[must_use]
    pub fn set_dst_port(mut self, port: u16) -> Self {
        self.dst_port = Some(port);
        self
    }
}

/// A line of a filter. Each constraint is a set of accepted values; an empty set
/// puts no constraint at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IpAccessListLine {
    pub action: LineAction,
    pub src_ips: BTreeSet<IpWildcard>,
    pub dst_ips: BTreeSet<IpWildcard>,
    pub ip_protocols: BTreeSet<IpProtocol>,
    pub dst_ports: BTreeSet<SubRange>,
    pub name: String,
}

impl IpAccessListLine {
    #[must_use]
    pub fn new(action: LineAction) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }

    /// Tell if a flow satisfies every constraint of the line. A flow without a
    /// destination port never satisfies a port constraint.
    #[must_use]
    pub fn matches(&self, flow: &Flow) -> bool {
        (self.src_ips.is_empty() || self.src_ips.iter().any(|w| w.contains(&flow.src_ip)))
            && (self.dst_ips.is_empty() || self.dst_ips.iter().any(|w| w.contains(&flow.dst_ip)))
            && (self.ip_protocols.is_empty() || self.ip_protocols.contains(&flow.ip_protocol))
            && (self.dst_ports.is_empty()
                || flow
                    .dst_port
                    .is_some_and(|port| self.dst_ports.iter().any(|r| r.contains(port))))
    }
}

/// Outcome of filtering a flow: the action taken and, unless no line matched,
/// the position and name of the line that decided it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FilterResult<'a> {
    pub action: LineAction,
    pub line: Option<usize>,
    pub name: Option<&'a str>,
}

impl FilterResult<'_> {
    #[must_use]
    pub fn is_permit(&self) -> bool {
        self.action.is_permit()
    }
}

/// An ordered filter: the first matching line decides, and flows that match no
/// line are denied
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAccessList {
    name: String,
    lines: Vec<IpAccessListLine>,
}

impl IpAccessList {
    #[must_use]
    pub fn new(name: &str, lines: Vec<IpAccessListLine>) -> Self {
        Self {
            name: name.to_owned(),
            lines,
        }
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn lines(&self) -> &[IpAccessListLine] {
        &self.lines
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn filter(&self, flow: &Flow) -> FilterResult<'_> {
        let result = self
            .lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.matches(flow))
            .map_or(
                FilterResult {
                    action: LineAction::Deny,
                    line: None,
                    name: None,
                },
                |(index, line)| FilterResult {
                    action: line.action,
                    line: Some(index),
                    name: Some(line.name.as_str()),
                },
            );
        trace!("{}: {flow} -> {}", self.name, result.action);
        result
    }
}

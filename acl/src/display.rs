// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display implementations

use crate::access_list::{FilterResult, Flow, IpAccessList, IpAccessListLine};
use std::fmt::Display;

impl Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ip_protocol, self.src_ip)?;
        if let Some(port) = self.src_port {
            write!(f, ":{port}")?;
        }
        write!(f, " -> {}", self.dst_ip)?;
        if let Some(port) = self.dst_port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl Display for IpAccessListLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for IpAccessList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ip access-list {}", self.name())?;
        for (index, line) in self.lines().iter().enumerate() {
            writeln!(f, " {index:>4}: {line}")?;
        }
        Ok(())
    }
}

impl Display for FilterResult<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.name) {
            (Some(index), Some(name)) => write!(f, "{} by line {index} '{name}'", self.action),
            _ => write!(f, "{} by default", self.action),
        }
    }
}

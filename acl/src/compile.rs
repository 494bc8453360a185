// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Compilation of network ACL entries into ordered packet filters

use crate::access_list::{IpAccessList, IpAccessListLine};
use crate::entry::{AclDirection, DEFAULT_RULE_NUMBER, NetworkAclEntry, PortRange};
use crate::errors::AclError;
use model::{IpProtocol, IpWildcard, LineAction, Prefix, SubRange};
use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;
use tracing::{debug, error, warn};

/// Port descriptor of ICMP entries, whose type and code we don't model
pub const ICMP_PORTS: &str = "some ICMP type(s)/code(s)";

/// What to do with entries that reuse the rule number of a prior entry of the same
/// direction
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DuplicateRulePolicy {
    #[default]
    Reject,
    KeepFirst,
    KeepLast,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub duplicates: DuplicateRulePolicy,
}

impl CompileOptions {
    #[must_use]
    pub fn set_duplicates(mut self, policy: DuplicateRulePolicy) -> Self {
        self.duplicates = policy;
        self
    }
}

/// Normalize a raw port range: `-1` stands for 0 on the lower end and for 65535 on
/// the upper end.
fn port_range(acl_id: &str, rule: u32, range: PortRange) -> Result<SubRange, AclError> {
    let invalid = || AclError::InvalidPortRange {
        acl: acl_id.to_owned(),
        rule,
        from: range.from,
        to: range.to,
    };
    let from = if range.from == -1 {
        0
    } else {
        u16::try_from(range.from).map_err(|_| invalid())?
    };
    let to = if range.to == -1 {
        u16::MAX
    } else {
        u16::try_from(range.to).map_err(|_| invalid())?
    };
    SubRange::new(from, to).ok_or_else(invalid)
}

fn compile_entry(
    acl_id: &str,
    entry: &NetworkAclEntry,
    direction: AclDirection,
) -> Result<IpAccessListLine, AclError> {
    let action = LineAction::from(entry.is_allow());
    let mut line = IpAccessListLine::new(action);

    // only the IPv4 zero prefix leaves addresses unconstrained; ::/0 matches IPv6 only
    if entry.cidr_block != Prefix::root_v4() {
        let ips = BTreeSet::from([IpWildcard::from(entry.cidr_block)]);
        if direction.is_egress() {
            line.dst_ips = ips;
        } else {
            line.src_ips = ips;
        }
    }

    let protocol = entry.protocol.as_deref().and_then(IpProtocol::from_code);
    if let Some(protocol) = protocol {
        line.ip_protocols.insert(protocol);
    }

    // presence of the port constraint is decided on the raw values
    let raw = entry.port_range.unwrap_or(PortRange::ALL);
    let ports = match port_range(acl_id, entry.rule_number, raw) {
        Ok(ports) => ports,
        Err(e) => {
            error!("{e}");
            return Err(e);
        }
    };
    if raw != PortRange::ALL {
        line.dst_ports.insert(ports);
    }

    let rule = if entry.rule_number == DEFAULT_RULE_NUMBER {
        "*".to_owned()
    } else {
        entry.rule_number.to_string()
    };
    let protocol_desc = protocol.map_or_else(|| "ALL".to_owned(), |p| p.to_string());
    let ports_desc = if protocol == Some(IpProtocol::Icmp) {
        ICMP_PORTS.to_owned()
    } else if raw == PortRange::ALL || ports.is_full() {
        "ALL".to_owned()
    } else {
        ports.to_string()
    };
    line.name = format!(
        "{rule} {protocol_desc} {ports_desc} {} {action}",
        entry.cidr_block
    );
    Ok(line)
}

/// Compile the entries of a network ACL that apply to the given direction into a
/// filter named `{acl_id}_{direction}`, with one line per entry in ascending rule
/// number order. IPv4 and IPv6 entries number their rules independently: when both
/// families use a rule number, the IPv4 entry comes first.
pub fn compile(
    acl_id: &str,
    entries: &[NetworkAclEntry],
    direction: AclDirection,
    options: &CompileOptions,
) -> Result<IpAccessList, AclError> {
    let mut lines: BTreeMap<(u32, bool), IpAccessListLine> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.direction() == direction) {
        let line = compile_entry(acl_id, entry, direction)?;
        match lines.entry((entry.rule_number, entry.cidr_block.is_ipv6())) {
            Entry::Vacant(slot) => {
                slot.insert(line);
            }
            Entry::Occupied(mut slot) => match options.duplicates {
                DuplicateRulePolicy::Reject => {
                    let e = AclError::DuplicateRuleNumber {
                        acl: acl_id.to_owned(),
                        direction,
                        rule: entry.rule_number,
                    };
                    error!("{e}");
                    return Err(e);
                }
                DuplicateRulePolicy::KeepFirst => {
                    warn!(
                        "{acl_id}: ignoring {direction} entry '{}' that reuses rule number {}",
                        line.name, entry.rule_number
                    );
                }
                DuplicateRulePolicy::KeepLast => {
                    warn!(
                        "{acl_id}: {direction} entry '{}' replaces '{}'",
                        line.name,
                        slot.get().name
                    );
                    slot.insert(line);
                }
            },
        }
    }
    let name = format!("{acl_id}_{direction}");
    debug!("Compiled {} lines into {name}", lines.len());
    Ok(IpAccessList::new(&name, lines.into_values().collect()))
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cloud network ACLs and their entries, as found in provider API dumps

use crate::access_list::IpAccessList;
use crate::compile::{CompileOptions, compile};
use crate::errors::AclError;
use derive_builder::Builder;
use model::Prefix;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Rule number of the implicit rule that ends every list of entries
pub const DEFAULT_RULE_NUMBER: u32 = 32767;

/// The traffic that a set of entries applies to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AclDirection {
    Ingress,
    Egress,
}

impl AclDirection {
    #[must_use]
    pub fn is_egress(&self) -> bool {
        matches!(self, AclDirection::Egress)
    }
}

impl Display for AclDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AclDirection::Ingress => write!(f, "ingress"),
            AclDirection::Egress => write!(f, "egress"),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    #[default]
    Deny,
}

/// Raw port range of an entry. `-1` on either end stands for the widest value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: i32,
    pub to: i32,
}

impl PortRange {
    pub const ALL: PortRange = PortRange { from: -1, to: -1 };

    #[must_use]
    pub fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }
}

/// One permit or deny rule of a network ACL
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAclEntry {
    pub rule_number: u32,

    #[builder(default)]
    #[serde(default)]
    pub egress: bool,

    #[builder(default)]
    pub rule_action: RuleAction,

    /// The zero prefix matches every address
    #[builder(default = Prefix::root_v4())]
    #[serde(alias = "ipv6CidrBlock")]
    pub cidr_block: Prefix,

    /// A protocol number or name. `-1` or no value at all stands for all protocols.
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub protocol: Option<String>,

    #[builder(setter(strip_option), default)]
    #[serde(default)]
    pub port_range: Option<PortRange>,
}

impl NetworkAclEntry {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.rule_action == RuleAction::Allow
    }
    #[must_use]
    pub fn direction(&self) -> AclDirection {
        if self.egress {
            AclDirection::Egress
        } else {
            AclDirection::Ingress
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAclAssociation {
    pub network_acl_association_id: String,
    pub network_acl_id: String,
    pub subnet_id: String,
}

/// A network ACL of a VPC, with the subnets it is associated with
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAcl {
    pub network_acl_id: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub associations: Vec<NetworkAclAssociation>,
    #[serde(default)]
    pub entries: Vec<NetworkAclEntry>,
}

impl NetworkAcl {
    #[must_use]
    pub fn new(network_acl_id: &str) -> Self {
        Self {
            network_acl_id: network_acl_id.to_owned(),
            vpc_id: None,
            is_default: false,
            associations: vec![],
            entries: vec![],
        }
    }
    #[must_use]
    pub fn add_entry(mut self, entry: NetworkAclEntry) -> Self {
        self.entries.push(entry);
        self
    }
    pub fn subnet_ids(&self) -> impl Iterator<Item = &str> {
        self.associations.iter().map(|a| a.subnet_id.as_str())
    }
    /// The filter applied to traffic entering the associated subnets
    pub fn ingress_acl(&self, options: &CompileOptions) -> Result<IpAccessList, AclError> {
        compile(
            &self.network_acl_id,
            &self.entries,
            AclDirection::Ingress,
            options,
        )
    }
    /// The filter applied to traffic leaving the associated subnets
    pub fn egress_acl(&self, options: &CompileOptions) -> Result<IpAccessList, AclError> {
        compile(
            &self.network_acl_id,
            &self.entries,
            AclDirection::Egress,
            options,
        )
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network ACLs loaded from a provider dump

use model::{IpProtocol, LineAction};
use netcfg_acl::{AclError, CompileOptions, DuplicateRulePolicy, Flow, NetworkAcl};
use pretty_assertions::assert_eq;

const DUMP: &str = r#"
{
  "networkAclId": "acl-0b4f7c2a",
  "vpcId": "vpc-41c2e1d8",
  "isDefault": false,
  "associations": [
    {
      "networkAclAssociationId": "aclassoc-1",
      "networkAclId": "acl-0b4f7c2a",
      "subnetId": "subnet-a"
    },
    {
      "networkAclAssociationId": "aclassoc-2",
      "networkAclId": "acl-0b4f7c2a",
      "subnetId": "subnet-b"
    }
  ],
  "entries": [
    {
      "ruleNumber": 32767,
      "egress": true,
      "ruleAction": "deny",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 100,
      "egress": true,
      "ruleAction": "allow",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 32767,
      "egress": false,
      "ruleAction": "deny",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 120,
      "egress": false,
      "ruleAction": "allow",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "6",
      "portRange": { "from": 1024, "to": 65535 }
    },
    {
      "ruleNumber": 100,
      "egress": false,
      "ruleAction": "allow",
      "cidrBlock": "203.0.113.0/24",
      "protocol": "6",
      "portRange": { "from": 22, "to": 22 }
    },
    {
      "ruleNumber": 90,
      "egress": false,
      "ruleAction": "deny",
      "cidrBlock": "203.0.113.66/32",
      "protocol": "-1"
    }
  ]
}
"#;

fn tcp(src: &str, dst: &str, port: u16) -> Flow {
    Flow::new(
        src.parse().expect("Bad address"),
        dst.parse().expect("Bad address"),
        IpProtocol::Tcp,
    )
    .set_dst_port(port)
}

#[test]
fn test_load_and_compile() {
    let acl: NetworkAcl = serde_yaml_ng::from_str(DUMP).expect("Should parse");
    assert_eq!(acl.vpc_id.as_deref(), Some("vpc-41c2e1d8"));
    assert_eq!(acl.subnet_ids().collect::<Vec<_>>(), vec!["subnet-a", "subnet-b"]);

    let options = CompileOptions::default();
    let ingress = acl.ingress_acl(&options).expect("Should compile");
    let egress = acl.egress_acl(&options).expect("Should compile");
    assert_eq!(ingress.name(), "acl-0b4f7c2a_ingress");
    assert_eq!(egress.name(), "acl-0b4f7c2a_egress");

    let names: Vec<&str> = ingress.lines().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "90 ALL ALL 203.0.113.66/32 DENY",
            "100 TCP 22-22 203.0.113.0/24 ALLOW",
            "120 TCP 1024-65535 0.0.0.0/0 ALLOW",
            "* ALL ALL 0.0.0.0/0 DENY",
        ]
    );

    // ssh from the admin network, except from a blocked host
    let ssh = ingress.filter(&tcp("203.0.113.10", "10.0.0.5", 22));
    assert_eq!(ssh.action, LineAction::Permit);
    assert_eq!(ssh.line, Some(1));
    let blocked = ingress.filter(&tcp("203.0.113.66", "10.0.0.5", 22));
    assert_eq!(blocked.action, LineAction::Deny);
    assert_eq!(blocked.line, Some(0));
    // return traffic on ephemeral ports from anywhere
    assert!(ingress.filter(&tcp("8.8.8.8", "10.0.0.5", 40000)).is_permit());
    // anything else hits the default rule
    let other = ingress.filter(&tcp("8.8.8.8", "10.0.0.5", 22));
    assert_eq!(other.action, LineAction::Deny);
    assert_eq!(other.line, Some(3));

    assert!(egress.filter(&tcp("10.0.0.5", "8.8.8.8", 443)).is_permit());
}

#[test]
fn test_duplicate_rule_numbers() {
    let mut acl: NetworkAcl = serde_yaml_ng::from_str(DUMP).expect("Should parse");
    let mut dup = acl.entries[4].clone();
    dup.cidr_block = "198.51.100.0/24".parse().expect("Bad prefix");
    acl.entries.push(dup);

    assert!(matches!(
        acl.ingress_acl(&CompileOptions::default()),
        Err(AclError::DuplicateRuleNumber { rule: 100, .. })
    ));
    // only ingress has a duplicate
    assert!(acl.egress_acl(&CompileOptions::default()).is_ok());

    let keep_last = CompileOptions::default().set_duplicates(DuplicateRulePolicy::KeepLast);
    let ingress = acl.ingress_acl(&keep_last).expect("Should compile");
    assert_eq!(ingress.lines()[1].name, "100 TCP 22-22 198.51.100.0/24 ALLOW");
    assert!(!ingress.filter(&tcp("203.0.113.10", "10.0.0.5", 22)).is_permit());
}

const DUAL_STACK_DUMP: &str = r#"
{
  "networkAclId": "acl-5e1d9a03",
  "vpcId": "vpc-41c2e1d8",
  "isDefault": true,
  "associations": [],
  "entries": [
    {
      "ruleNumber": 100,
      "egress": false,
      "ruleAction": "allow",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 101,
      "egress": false,
      "ruleAction": "allow",
      "ipv6CidrBlock": "::/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 32767,
      "egress": false,
      "ruleAction": "deny",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 32767,
      "egress": false,
      "ruleAction": "deny",
      "ipv6CidrBlock": "::/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 90,
      "egress": true,
      "ruleAction": "deny",
      "ipv6CidrBlock": "::/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 100,
      "egress": true,
      "ruleAction": "allow",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 32767,
      "egress": true,
      "ruleAction": "deny",
      "cidrBlock": "0.0.0.0/0",
      "protocol": "-1"
    },
    {
      "ruleNumber": 32767,
      "egress": true,
      "ruleAction": "deny",
      "ipv6CidrBlock": "::/0",
      "protocol": "-1"
    }
  ]
}
"#;

#[test]
fn test_dual_stack_default_acl() {
    let acl: NetworkAcl = serde_yaml_ng::from_str(DUAL_STACK_DUMP).expect("Should parse");
    let options = CompileOptions::default();

    let ingress = acl.ingress_acl(&options).expect("Should compile");
    let names: Vec<&str> = ingress.lines().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "100 ALL ALL 0.0.0.0/0 ALLOW",
            "101 ALL ALL ::/0 ALLOW",
            "* ALL ALL 0.0.0.0/0 DENY",
            "* ALL ALL ::/0 DENY",
        ]
    );
    let v4 = ingress.filter(&tcp("198.51.100.7", "10.0.0.5", 443));
    assert!(v4.is_permit());
    assert_eq!(v4.line, Some(0));
    let v6 = ingress.filter(&tcp("2001:db8::7", "2001:db8:1::5", 443));
    assert!(v6.is_permit());

    // the IPv6 deny-all ahead of the IPv4 allow-all leaves IPv4 traffic alone
    let egress = acl.egress_acl(&options).expect("Should compile");
    assert_eq!(egress.len(), 4);
    let v4 = egress.filter(&tcp("10.0.0.5", "1.1.1.1", 443));
    assert_eq!(v4.action, LineAction::Permit);
    assert_eq!(v4.name, Some("100 ALL ALL 0.0.0.0/0 ALLOW"));
    let v6 = egress.filter(&tcp("2001:db8:1::5", "2001:db8::7", 443));
    assert_eq!(v6.action, LineAction::Deny);
    assert_eq!(v6.name, Some("90 ALL ALL ::/0 DENY"));
}

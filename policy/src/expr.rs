// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Boolean expressions of the routing policy language

use crate::environment::Environment;
use crate::errors::PolicyError;
use crate::result::EvalResult;
use model::route::RouteKind;
use model::{Community, Prefix, RoutingProtocol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, error, trace};

/// Integer comparison used by the metric and tag matchers
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntComparator {
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
}

impl IntComparator {
    #[must_use]
    pub fn apply(&self, lhs: u32, rhs: u32) -> bool {
        match self {
            IntComparator::Eq => lhs == rhs,
            IntComparator::Ge => lhs >= rhs,
            IntComparator::Gt => lhs > rhs,
            IntComparator::Le => lhs <= rhs,
            IntComparator::Lt => lhs < rhs,
        }
    }
}

/// A prefix together with the range of lengths of the networks it matches, like
/// `10.0.0.0/8 ge 16 le 24` in a prefix list
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrefixRange {
    pub prefix: Prefix,
    pub min_len: u8,
    pub max_len: u8,
}

impl PrefixRange {
    #[must_use]
    pub fn new(prefix: Prefix, min_len: u8, max_len: u8) -> Self {
        Self {
            prefix,
            min_len,
            max_len,
        }
    }
    /// A range matching the prefix only
    #[must_use]
    pub fn exact(prefix: Prefix) -> Self {
        Self::new(prefix, prefix.length(), prefix.length())
    }
    /// A range matching the prefix and every more specific network
    #[must_use]
    pub fn orlonger(prefix: Prefix) -> Self {
        Self::new(prefix, prefix.length(), prefix.max_length())
    }
    #[must_use]
    pub fn matches(&self, network: &Prefix) -> bool {
        (self.min_len..=self.max_len).contains(&network.length()) && self.prefix.covers(network)
    }
}

/// A boolean expression over the route being evaluated. Expressions are immutable
/// once built and compare and hash by their literal parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum BooleanExpr {
    True,
    False,
    Not {
        expr: Box<BooleanExpr>,
    },
    Conjunction {
        conjuncts: Vec<BooleanExpr>,
    },
    Disjunction {
        disjuncts: Vec<BooleanExpr>,
    },
    /// Matches routes of, or redistributed into, the EIGRP process with this ASN
    MatchProcessAsn {
        asn: u32,
    },
    MatchPrefix {
        ranges: Vec<PrefixRange>,
    },
    MatchProtocol {
        protocol: RoutingProtocol,
    },
    MatchMetric {
        cmp: IntComparator,
        metric: u32,
    },
    MatchTag {
        cmp: IntComparator,
        tag: u32,
    },
    MatchCommunity {
        community: Community,
    },
    MatchAsPath {
        asn: u32,
    },
    /// Evaluates to the verdict of the routing policy with the given name
    CallPolicy {
        policy: String,
    },
}

/* Impl basic ops */
impl BooleanExpr {
    #[must_use]
    pub fn match_process_asn(asn: u32) -> Self {
        BooleanExpr::MatchProcessAsn { asn }
    }
    #[must_use]
    pub fn match_protocol(protocol: RoutingProtocol) -> Self {
        BooleanExpr::MatchProtocol { protocol }
    }
    #[must_use]
    pub fn match_prefix(ranges: Vec<PrefixRange>) -> Self {
        BooleanExpr::MatchPrefix { ranges }
    }
    #[must_use]
    pub fn call(policy: &str) -> Self {
        BooleanExpr::CallPolicy {
            policy: policy.to_owned(),
        }
    }
    #[must_use]
    pub fn not(expr: BooleanExpr) -> Self {
        BooleanExpr::Not {
            expr: Box::new(expr),
        }
    }
    #[must_use]
    pub fn and(conjuncts: Vec<BooleanExpr>) -> Self {
        BooleanExpr::Conjunction { conjuncts }
    }
    #[must_use]
    pub fn or(disjuncts: Vec<BooleanExpr>) -> Self {
        BooleanExpr::Disjunction { disjuncts }
    }

    /// Names of the policies that this expression may call
    pub fn called_policies<'e>(&'e self, out: &mut BTreeSet<&'e str>) {
        match self {
            BooleanExpr::CallPolicy { policy } => {
                out.insert(policy.as_str());
            }
            BooleanExpr::Not { expr } => expr.called_policies(out),
            BooleanExpr::Conjunction { conjuncts: exprs }
            | BooleanExpr::Disjunction { disjuncts: exprs } => {
                exprs.iter().for_each(|e| e.called_policies(out));
            }
            _ => {}
        }
    }
}

/* Evaluation */
impl BooleanExpr {
    /// Evaluate the expression against the route of the environment
    pub fn evaluate(&self, env: &mut Environment) -> Result<EvalResult, PolicyError> {
        let route = env.original_route();
        let result = match self {
            BooleanExpr::True => EvalResult::new(true),
            BooleanExpr::False => EvalResult::new(false),
            BooleanExpr::Not { expr } => {
                let inner = expr.evaluate(env)?;
                if inner.exit { inner } else { inner.negate() }
            }
            BooleanExpr::Conjunction { conjuncts } => {
                for conjunct in conjuncts {
                    let result = conjunct.evaluate(env)?;
                    if result.exit || !result.boolean {
                        return Ok(result);
                    }
                }
                EvalResult::new(true)
            }
            BooleanExpr::Disjunction { disjuncts } => {
                for disjunct in disjuncts {
                    let result = disjunct.evaluate(env)?;
                    if result.exit || result.boolean {
                        return Ok(result);
                    }
                }
                EvalResult::new(false)
            }
            BooleanExpr::MatchProcessAsn { asn } => {
                EvalResult::new(Self::match_process_asn_eval(*asn, env)?)
            }
            BooleanExpr::MatchPrefix { ranges } => {
                EvalResult::new(ranges.iter().any(|r| r.matches(&route.network)))
            }
            BooleanExpr::MatchProtocol { protocol } => EvalResult::new(route.protocol() == *protocol),
            BooleanExpr::MatchMetric { cmp, metric } => EvalResult::new(cmp.apply(route.metric, *metric)),
            BooleanExpr::MatchTag { cmp, tag } => {
                EvalResult::new(route.tag.is_some_and(|value| cmp.apply(value, *tag)))
            }
            BooleanExpr::MatchCommunity { community } => EvalResult::new(
                route
                    .bgp_attributes()
                    .is_some_and(|attrs| attrs.communities.contains(community)),
            ),
            BooleanExpr::MatchAsPath { asn } => EvalResult::new(
                route
                    .bgp_attributes()
                    .is_some_and(|attrs| attrs.as_path.contains(asn)),
            ),
            BooleanExpr::CallPolicy { policy } => {
                let Some(callee) = env.policies().get(policy) else {
                    error!("Call to undefined routing policy {policy}");
                    return Err(PolicyError::UndefinedRoutingPolicy(policy.clone()));
                };
                callee.call(env)?
            }
        };
        trace!("{self}: {}", result.boolean);
        Ok(result)
    }

    /// EIGRP routes match on their own process. Connected routes match on the process
    /// that the EIGRP settings of their interface point to, which requires walking from
    /// the redistributing process to the configuration that owns its policy.
    fn match_process_asn_eval(asn: u32, env: &Environment) -> Result<bool, PolicyError> {
        let route = env.original_route();
        match route.kind() {
            RouteKind::Eigrp(attrs) => Ok(attrs.process_asn == asn),
            RouteKind::Connected => {
                let Some(process) = env.redistribution_process() else {
                    error!("No redistribution process to evaluate connected route {route}");
                    return Err(PolicyError::NoRedistributionContext(route.network));
                };
                let Some(name) = process.redistribution_policy.as_deref() else {
                    error!("EIGRP process {} has no redistribution policy", process.asn);
                    return Err(PolicyError::NoRedistributionPolicy(process.asn));
                };
                let Some(policy) = env.policies().get(name) else {
                    error!("Redistribution policy {name} of EIGRP process {} is not defined", process.asn);
                    return Err(PolicyError::UndefinedRoutingPolicy(name.to_owned()));
                };
                let owner = env.configuration();
                if policy.owner != owner.hostname {
                    error!("Redistribution policy {name} belongs to {} instead of {}", policy.owner, owner.hostname);
                    return Err(PolicyError::ForeignPolicyOwner {
                        policy: name.to_owned(),
                        owner: policy.owner.clone(),
                        hostname: owner.hostname.clone(),
                    });
                }
                let Some(ifname) = route.next_hop_interface.as_deref() else {
                    error!("Connected route {route} has no next-hop interface");
                    return Err(PolicyError::MissingNextHopInterface(route.network));
                };
                let Some(settings) = owner.eigrp_interface_settings(ifname) else {
                    error!("{}: no EIGRP settings for interface {ifname}", owner.hostname);
                    return Err(PolicyError::MissingEigrpInterfaceSettings {
                        interface: ifname.to_owned(),
                        hostname: owner.hostname.clone(),
                    });
                };
                debug!("{ifname} of {} is in EIGRP process {}", owner.hostname, settings.asn);
                Ok(settings.asn == asn)
            }
            RouteKind::Local
            | RouteKind::Static
            | RouteKind::Ospf(_)
            | RouteKind::Bgp(_)
            | RouteKind::Isis
            | RouteKind::Rip => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing_policy::{RoutingPolicy, RoutingPolicyTable};
    use crate::statement::Statement;
    use model::route::OspfRouteType;
    use model::{Configuration, EigrpInterfaceSettings, EigrpProcess, Interface, Route};
    use pretty_assertions::assert_eq;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use tracing_test::traced_test;

    fn hash_of(expr: &BooleanExpr) -> u64 {
        let mut hasher = DefaultHasher::new();
        expr.hash(&mut hasher);
        hasher.finish()
    }

    fn eval(expr: &BooleanExpr, route: Route) -> Result<bool, PolicyError> {
        let config = Configuration::new("r1");
        let policies = RoutingPolicyTable::new();
        let mut env = Environment::new(route, &config, &policies);
        expr.evaluate(&mut env).map(|r| r.boolean)
    }

    /// r1 runs EIGRP 100 on eth0 and redistributes with policy REDIST
    fn redistribution_setup() -> (Configuration, RoutingPolicyTable) {
        let mut config = Configuration::new("r1");
        config
            .add_interface(Interface::new("eth0").set_address(Prefix::expect_from("10.0.0.1/24")))
            .expect("Should succeed");
        config
            .add_interface(Interface::new("eth1").set_address(Prefix::expect_from("10.0.1.1/24")))
            .expect("Should succeed");
        config
            .add_eigrp_process(EigrpProcess::new(100).set_redistribution_policy("REDIST"))
            .expect("Should succeed");
        config
            .add_eigrp_interface_settings("eth0", EigrpInterfaceSettings::new(100))
            .expect("Should succeed");

        let mut policies = RoutingPolicyTable::new();
        policies
            .add(RoutingPolicy::new("REDIST", "r1").add_statement(Statement::ExitAccept))
            .expect("Should succeed");
        (config, policies)
    }

    #[test]
    fn test_match_process_asn_eigrp() {
        let route = Route::eigrp(Prefix::expect_from("10.0.0.0/24"), 100);
        assert_eq!(eval(&BooleanExpr::match_process_asn(100), route.clone()), Ok(true));
        assert_eq!(eval(&BooleanExpr::match_process_asn(200), route), Ok(false));
    }

    #[test]
    fn test_match_process_asn_other_kinds() {
        // no process, no policies, no interface settings: nothing gets looked up
        let net = Prefix::expect_from("10.0.0.0/24");
        let expr = BooleanExpr::match_process_asn(100);
        assert_eq!(eval(&expr, Route::ospf(net, 0, OspfRouteType::IntraArea)), Ok(false));
        assert_eq!(eval(&expr, Route::bgp(net, vec![100])), Ok(false));
        assert_eq!(
            eval(&expr, Route::static_route(net, "10.1.1.1".parse().expect("Bad address"))),
            Ok(false)
        );
    }

    #[test]
    fn test_match_process_asn_connected() {
        let (config, policies) = redistribution_setup();
        let process = config.eigrp_process(100).expect("Should exist");
        let route = Route::connected(Prefix::expect_from("10.0.0.0/24"), "eth0");

        let mut env =
            Environment::new(route, &config, &policies).set_redistribution_process(process);
        let yes = BooleanExpr::match_process_asn(100).evaluate(&mut env);
        let no = BooleanExpr::match_process_asn(200).evaluate(&mut env);
        assert_eq!(yes.map(|r| r.boolean), Ok(true));
        assert_eq!(no.map(|r| r.boolean), Ok(false));
    }

    #[traced_test]
    #[test]
    fn test_match_process_asn_connected_defects() {
        let (config, policies) = redistribution_setup();
        let process = config.eigrp_process(100).expect("Should exist");
        let expr = BooleanExpr::match_process_asn(100);

        // interface without generated settings
        let route = Route::connected(Prefix::expect_from("10.0.1.0/24"), "eth1");
        let mut env =
            Environment::new(route.clone(), &config, &policies).set_redistribution_process(process);
        assert_eq!(
            expr.evaluate(&mut env),
            Err(PolicyError::MissingEigrpInterfaceSettings {
                interface: "eth1".to_owned(),
                hostname: "r1".to_owned()
            })
        );
        assert!(logs_contain("no EIGRP settings for interface eth1"));

        // no redistribution context at all
        let mut env = Environment::new(route.clone(), &config, &policies);
        assert_eq!(
            expr.evaluate(&mut env),
            Err(PolicyError::NoRedistributionContext(route.network))
        );

        // redistribution policy that is not defined
        let process = EigrpProcess::new(100).set_redistribution_policy("MISSING");
        let mut env =
            Environment::new(route.clone(), &config, &policies).set_redistribution_process(&process);
        assert_eq!(
            expr.evaluate(&mut env),
            Err(PolicyError::UndefinedRoutingPolicy("MISSING".to_owned()))
        );

        // process without redistribution policy
        let process = EigrpProcess::new(100);
        let mut env =
            Environment::new(route.clone(), &config, &policies).set_redistribution_process(&process);
        assert_eq!(
            expr.evaluate(&mut env),
            Err(PolicyError::NoRedistributionPolicy(100))
        );

        // connected route without interface
        let process = config.eigrp_process(100).expect("Should exist");
        let route = Route::new(Prefix::expect_from("10.0.1.0/24"), RouteKind::Connected);
        let mut env =
            Environment::new(route.clone(), &config, &policies).set_redistribution_process(process);
        assert_eq!(
            expr.evaluate(&mut env),
            Err(PolicyError::MissingNextHopInterface(route.network))
        );
    }

    #[test]
    fn test_match_process_asn_foreign_owner() {
        let (config, _) = redistribution_setup();
        let mut policies = RoutingPolicyTable::new();
        policies
            .add(RoutingPolicy::new("REDIST", "r2"))
            .expect("Should succeed");
        let process = config.eigrp_process(100).expect("Should exist");
        let route = Route::connected(Prefix::expect_from("10.0.0.0/24"), "eth0");
        let mut env =
            Environment::new(route, &config, &policies).set_redistribution_process(process);
        assert_eq!(
            BooleanExpr::match_process_asn(100).evaluate(&mut env),
            Err(PolicyError::ForeignPolicyOwner {
                policy: "REDIST".to_owned(),
                owner: "r2".to_owned(),
                hostname: "r1".to_owned()
            })
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = BooleanExpr::match_process_asn(100);
        let b = BooleanExpr::match_process_asn(100);
        let c = BooleanExpr::match_process_asn(200);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        set.insert(b);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        bolero::check!()
            .with_type::<(u16, u16)>()
            .for_each(|&(route_asn, asn): &(u16, u16)| {
                let config = Configuration::new("r1");
                let policies = RoutingPolicyTable::new();
                let route = Route::eigrp(Prefix::root_v4(), u32::from(route_asn));
                let expr = BooleanExpr::match_process_asn(u32::from(asn));
                let mut env = Environment::new(route, &config, &policies);
                let first = expr.evaluate(&mut env);
                let second = expr.evaluate(&mut env);
                assert_eq!(first, second);
                assert_eq!(first.map(|r| r.boolean), Ok(route_asn == asn));
            });
    }

    #[test]
    fn test_boolean_operators() {
        let route = Route::eigrp(Prefix::expect_from("10.1.0.0/16"), 1).with_tag(5);
        let t = BooleanExpr::True;
        let f = BooleanExpr::False;
        assert_eq!(eval(&BooleanExpr::and(vec![]), route.clone()), Ok(true));
        assert_eq!(eval(&BooleanExpr::or(vec![]), route.clone()), Ok(false));
        assert_eq!(eval(&BooleanExpr::and(vec![t.clone(), f.clone()]), route.clone()), Ok(false));
        assert_eq!(eval(&BooleanExpr::or(vec![f.clone(), t.clone()]), route.clone()), Ok(true));
        assert_eq!(eval(&BooleanExpr::not(f), route.clone()), Ok(true));

        let tag = BooleanExpr::MatchTag {
            cmp: IntComparator::Ge,
            tag: 5,
        };
        assert_eq!(eval(&tag, route.clone()), Ok(true));
        let untagged = Route::eigrp(Prefix::expect_from("10.1.0.0/16"), 1);
        assert_eq!(eval(&tag, untagged), Ok(false));
    }

    #[test]
    fn test_match_prefix_and_protocol() {
        let ranges = vec![PrefixRange::new(Prefix::expect_from("10.0.0.0/8"), 16, 24)];
        let expr = BooleanExpr::match_prefix(ranges);
        let in_range = Route::eigrp(Prefix::expect_from("10.1.0.0/16"), 1);
        let too_long = Route::eigrp(Prefix::expect_from("10.1.1.0/25"), 1);
        let outside = Route::eigrp(Prefix::expect_from("11.1.0.0/16"), 1);
        assert_eq!(eval(&expr, in_range.clone()), Ok(true));
        assert_eq!(eval(&expr, too_long), Ok(false));
        assert_eq!(eval(&expr, outside), Ok(false));

        let exact = PrefixRange::exact(Prefix::expect_from("10.1.0.0/16"));
        assert!(exact.matches(&Prefix::expect_from("10.1.0.0/16")));
        assert!(!exact.matches(&Prefix::expect_from("10.1.1.0/24")));
        assert!(PrefixRange::orlonger(Prefix::root_v4()).matches(&Prefix::expect_from("1.2.3.4/32")));

        let eigrp = BooleanExpr::match_protocol(RoutingProtocol::Eigrp);
        assert_eq!(eval(&eigrp, in_range), Ok(true));
        let connected = Route::connected(Prefix::expect_from("10.1.0.0/16"), "eth0");
        assert_eq!(eval(&eigrp, connected), Ok(false));
    }

    #[test]
    fn test_match_bgp_attributes() {
        let mut route = Route::bgp(Prefix::expect_from("1.0.0.0/8"), vec![65001, 65002]);
        if let Some(attrs) = route.bgp_attributes_mut() {
            attrs.communities.insert(Community(42));
        }
        let community = BooleanExpr::MatchCommunity {
            community: Community(42),
        };
        let as_path = BooleanExpr::MatchAsPath { asn: 65002 };
        assert_eq!(eval(&community, route.clone()), Ok(true));
        assert_eq!(eval(&as_path, route), Ok(true));
        let eigrp = Route::eigrp(Prefix::expect_from("1.0.0.0/8"), 65002);
        assert_eq!(eval(&community, eigrp.clone()), Ok(false));
        assert_eq!(eval(&as_path, eigrp), Ok(false));
    }

    #[traced_test]
    #[test]
    fn test_call_undefined_policy() {
        let route = Route::eigrp(Prefix::expect_from("10.0.0.0/8"), 1);
        assert_eq!(
            eval(&BooleanExpr::call("NOPE"), route),
            Err(PolicyError::UndefinedRoutingPolicy("NOPE".to_owned()))
        );
        assert!(logs_contain("Call to undefined routing policy NOPE"));
    }

    #[test]
    fn test_deserialize_expression() {
        let yaml = "
class: Conjunction
conjuncts:
  - class: MatchProcessAsn
    asn: 100
  - class: Not
    expr:
      class: MatchPrefix
      ranges:
        - prefix: 10.0.0.0/8
          min_len: 8
          max_len: 32
";
        let expr: BooleanExpr = serde_yaml_ng::from_str(yaml).expect("Should parse");
        assert_eq!(
            expr,
            BooleanExpr::and(vec![
                BooleanExpr::match_process_asn(100),
                BooleanExpr::not(BooleanExpr::match_prefix(vec![PrefixRange::new(
                    Prefix::expect_from("10.0.0.0/8"),
                    8,
                    32
                )])),
            ])
        );
    }
}

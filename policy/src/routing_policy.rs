// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routing policies and the table of policies that a device defines

use crate::environment::Environment;
use crate::errors::PolicyError;
use crate::result::EvalResult;
use crate::statement::{Statement, execute_all};
use model::{Configuration, EigrpProcess, Route};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error};

/// A named, ordered list of statements, defined by the device with hostname `owner`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicyTable(BTreeMap<String, RoutingPolicy>);

/* Impl basic ops */
impl RoutingPolicy {
    #[must_use]
    pub fn new(name: &str, owner: &str) -> Self {
        Self {
            name: name.to_owned(),
            owner: owner.to_owned(),
            statements: vec![],
        }
    }
    #[must_use]
    pub fn add_statement(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Run the policy in the given environment. An exit ends the evaluation of every
    /// enclosing policy and is passed up as such. A return only ends this policy. A
    /// policy that runs out of statements yields the default action of the environment.
    pub fn call(&self, env: &mut Environment) -> Result<EvalResult, PolicyError> {
        env.enter(&self.name)?;
        let outcome = execute_all(&self.statements, env);
        env.leave();

        let result = match outcome? {
            Some(result) if result.exit => result,
            Some(result) => EvalResult {
                returned: false,
                ..result
            },
            None => EvalResult {
                boolean: env.default_action(),
                fall_through: true,
                ..Default::default()
            },
        };
        debug!(
            "Policy {} {} {}",
            self.name,
            if result.boolean { "accepts" } else { "rejects" },
            env.original_route()
        );
        Ok(result)
    }

    /// Evaluate a route with this policy, optionally on behalf of a redistributing
    /// EIGRP process. Returns the transformed route if accepted.
    pub fn process(
        &self,
        route: Route,
        configuration: &Configuration,
        policies: &RoutingPolicyTable,
        process: Option<&EigrpProcess>,
    ) -> Result<Option<Route>, PolicyError> {
        let mut env = Environment::new(route, configuration, policies);
        if let Some(process) = process {
            env = env.set_redistribution_process(process);
        }
        let result = self.call(&mut env)?;
        Ok(result.boolean.then(|| env.into_output_route()))
    }

    /// Names of the policies that this one calls directly
    #[must_use]
    pub fn called_policies(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.statements
            .iter()
            .for_each(|s| s.called_policies(&mut out));
        out
    }
}

impl RoutingPolicyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, policy: RoutingPolicy) -> Result<(), PolicyError> {
        if self.0.contains_key(&policy.name) {
            error!("Duplicate routing policy {}", policy.name);
            return Err(PolicyError::DuplicateRoutingPolicy(policy.name));
        }
        self.0.insert(policy.name.clone(), policy);
        Ok(())
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RoutingPolicy> {
        self.0.get(name)
    }
    pub fn values(&self) -> impl Iterator<Item = &RoutingPolicy> {
        self.0.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check, ahead of any evaluation, that the policies referenced by a configuration
    /// and by the policies themselves exist, and that redistribution policies belong to
    /// the configuration that uses them.
    pub fn validate_against(&self, configuration: &Configuration) -> Result<(), PolicyError> {
        for process in configuration.eigrp_processes() {
            let Some(name) = process.redistribution_policy.as_deref() else {
                continue;
            };
            let Some(policy) = self.get(name) else {
                error!(
                    "{}: EIGRP process {} uses undefined policy {name}",
                    configuration.hostname, process.asn
                );
                return Err(PolicyError::UndefinedRoutingPolicy(name.to_owned()));
            };
            if policy.owner != configuration.hostname {
                error!(
                    "{}: EIGRP process {} uses policy {name} of {}",
                    configuration.hostname, process.asn, policy.owner
                );
                return Err(PolicyError::ForeignPolicyOwner {
                    policy: name.to_owned(),
                    owner: policy.owner.clone(),
                    hostname: configuration.hostname.clone(),
                });
            }
        }
        for policy in self.values() {
            if let Some(missing) = policy
                .called_policies()
                .into_iter()
                .find(|callee| self.get(callee).is_none())
            {
                error!("Policy {} calls undefined policy {missing}", policy.name);
                return Err(PolicyError::UndefinedRoutingPolicy(missing.to_owned()));
            }
        }
        Ok(())
    }
}

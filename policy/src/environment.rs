// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The context threaded through the evaluation of a routing policy

use crate::errors::PolicyError;
use crate::routing_policy::RoutingPolicyTable;
use model::{Configuration, EigrpProcess, Route};
use tracing::error;

/// Evaluation context for a single route. It owns the route under test and a
/// scratch output route that set-statements modify, and borrows the device
/// configuration and the policies visible to the device, which must outlive it.
#[derive(Debug)]
pub struct Environment<'a> {
    original_route: Route,
    output_route: Route,
    configuration: &'a Configuration,
    policies: &'a RoutingPolicyTable,
    redistribution_process: Option<&'a EigrpProcess>,
    default_action: bool,
    call_stack: Vec<String>,
}

impl<'a> Environment<'a> {
    #[must_use]
    pub fn new(
        route: Route,
        configuration: &'a Configuration,
        policies: &'a RoutingPolicyTable,
    ) -> Self {
        Self {
            output_route: route.clone(),
            original_route: route,
            configuration,
            policies,
            redistribution_process: None,
            default_action: false,
            call_stack: Vec::new(),
        }
    }
    /// Evaluate on behalf of the EIGRP process that redistributes the route
    #[must_use]
    pub fn set_redistribution_process(mut self, process: &'a EigrpProcess) -> Self {
        self.redistribution_process = Some(process);
        self
    }
    /// Start from a given output route instead of a copy of the original route
    #[must_use]
    pub fn set_output_route(mut self, route: Route) -> Self {
        self.output_route = route;
        self
    }

    #[must_use]
    pub fn original_route(&self) -> &Route {
        &self.original_route
    }
    #[must_use]
    pub fn output_route(&self) -> &Route {
        &self.output_route
    }
    pub fn output_route_mut(&mut self) -> &mut Route {
        &mut self.output_route
    }
    #[must_use]
    pub fn into_output_route(self) -> Route {
        self.output_route
    }
    #[must_use]
    pub fn configuration(&self) -> &'a Configuration {
        self.configuration
    }
    #[must_use]
    pub fn policies(&self) -> &'a RoutingPolicyTable {
        self.policies
    }
    #[must_use]
    pub fn redistribution_process(&self) -> Option<&'a EigrpProcess> {
        self.redistribution_process
    }
    #[must_use]
    pub fn default_action(&self) -> bool {
        self.default_action
    }
    pub fn set_default_action(&mut self, accept: bool) {
        self.default_action = accept;
    }

    /// Record that we enter the policy with the given name
    pub(crate) fn enter(&mut self, policy: &str) -> Result<(), PolicyError> {
        if self.call_stack.iter().any(|name| name == policy) {
            error!(
                "Circular reference to routing policy {policy}: {} -> {policy}",
                self.call_stack.join(" -> ")
            );
            return Err(PolicyError::CircularReference(policy.to_owned()));
        }
        self.call_stack.push(policy.to_owned());
        Ok(())
    }
    pub(crate) fn leave(&mut self) {
        self.call_stack.pop();
    }
    /// Depth of nested policy calls
    #[must_use]
    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }
}

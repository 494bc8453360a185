// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Redistribution of routes into an EIGRP process

use crate::environment::Environment;
use crate::errors::PolicyError;
use crate::routing_policy::RoutingPolicyTable;
use model::route::{EigrpAttributes, EigrpRouteType, RouteKind};
use model::{Configuration, EigrpProcess, Route};
use tracing::{debug, error, trace};

/// Run the redistribution policy of an EIGRP process on each of the candidate routes.
/// Accepted routes are returned as external routes of the process, with the changes
/// that the policy made to them.
pub fn redistribute_into_eigrp(
    configuration: &Configuration,
    policies: &RoutingPolicyTable,
    process: &EigrpProcess,
    candidates: &[Route],
) -> Result<Vec<Route>, PolicyError> {
    let Some(name) = process.redistribution_policy.as_deref() else {
        error!(
            "{}: EIGRP process {} has no redistribution policy",
            configuration.hostname, process.asn
        );
        return Err(PolicyError::NoRedistributionPolicy(process.asn));
    };
    let Some(policy) = policies.get(name) else {
        error!(
            "{}: redistribution policy {name} is not defined",
            configuration.hostname
        );
        return Err(PolicyError::UndefinedRoutingPolicy(name.to_owned()));
    };

    let external = RouteKind::Eigrp(EigrpAttributes {
        process_asn: process.asn,
        route_type: EigrpRouteType::External,
    });
    let mut accepted = Vec::new();
    for route in candidates {
        let mut env = Environment::new(route.clone(), configuration, policies)
            .set_redistribution_process(process)
            .set_output_route(route.redistributed(external.clone()));
        if policy.call(&mut env)?.boolean {
            let output = env.into_output_route();
            debug!("Redistributing {route} into EIGRP {} as {output}", process.asn);
            accepted.push(output);
        } else {
            trace!("Not redistributing {route} into EIGRP {}", process.asn);
        }
    }
    Ok(accepted)
}

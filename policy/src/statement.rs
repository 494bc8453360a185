// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Statements of the routing policy language

use crate::environment::Environment;
use crate::errors::PolicyError;
use crate::expr::BooleanExpr;
use crate::result::EvalResult;
use model::Community;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum Statement {
    If {
        guard: BooleanExpr,
        #[serde(default)]
        true_statements: Vec<Statement>,
        #[serde(default)]
        false_statements: Vec<Statement>,
    },
    ExitAccept,
    ExitReject,
    ReturnTrue,
    ReturnFalse,
    ReturnLocalDefaultAction,
    FallThrough,
    SetDefaultActionAccept,
    SetDefaultActionReject,
    SetMetric {
        metric: u32,
    },
    SetTag {
        tag: u32,
    },
    SetAdministrativeCost {
        admin: u8,
    },
    /// Only applies to BGP routes
    AddCommunity {
        community: Community,
    },
}

impl Statement {
    #[must_use]
    pub fn if_then(guard: BooleanExpr, true_statements: Vec<Statement>) -> Self {
        Statement::If {
            guard,
            true_statements,
            false_statements: vec![],
        }
    }
    #[must_use]
    pub fn if_then_else(
        guard: BooleanExpr,
        true_statements: Vec<Statement>,
        false_statements: Vec<Statement>,
    ) -> Self {
        Statement::If {
            guard,
            true_statements,
            false_statements,
        }
    }

    pub fn called_policies<'s>(&'s self, out: &mut BTreeSet<&'s str>) {
        if let Statement::If {
            guard,
            true_statements,
            false_statements,
        } = self
        {
            guard.called_policies(out);
            true_statements
                .iter()
                .chain(false_statements)
                .for_each(|s| s.called_policies(out));
        }
    }

    /// Execute the statement. A result that is neither an exit nor a return lets the
    /// caller go on with the next statement.
    pub fn execute(&self, env: &mut Environment) -> Result<EvalResult, PolicyError> {
        let result = match self {
            Statement::If {
                guard,
                true_statements,
                false_statements,
            } => {
                let verdict = guard.evaluate(env)?;
                if verdict.exit {
                    return Ok(verdict);
                }
                let branch = if verdict.boolean {
                    true_statements
                } else {
                    false_statements
                };
                execute_all(branch, env)?.unwrap_or_default()
            }
            Statement::ExitAccept => EvalResult::exit(true),
            Statement::ExitReject => EvalResult::exit(false),
            Statement::ReturnTrue => EvalResult::returned(true),
            Statement::ReturnFalse => EvalResult::returned(false),
            Statement::ReturnLocalDefaultAction => EvalResult::returned(env.default_action()),
            Statement::FallThrough => EvalResult::fall_through(env.default_action()),
            Statement::SetDefaultActionAccept => {
                env.set_default_action(true);
                EvalResult::default()
            }
            Statement::SetDefaultActionReject => {
                env.set_default_action(false);
                EvalResult::default()
            }
            Statement::SetMetric { metric } => {
                env.output_route_mut().metric = *metric;
                EvalResult::default()
            }
            Statement::SetTag { tag } => {
                env.output_route_mut().tag = Some(*tag);
                EvalResult::default()
            }
            Statement::SetAdministrativeCost { admin } => {
                env.output_route_mut().admin = *admin;
                EvalResult::default()
            }
            Statement::AddCommunity { community } => {
                let output = env.output_route_mut();
                if let Some(attrs) = output.bgp_attributes_mut() {
                    attrs.communities.insert(*community);
                } else {
                    debug!("Not adding community {community} to non-BGP route {output}");
                }
                EvalResult::default()
            }
        };
        Ok(result)
    }
}

/// Execute statements in order up to the first one that ends the policy, whose
/// result is returned. `None` if none does.
pub(crate) fn execute_all(
    statements: &[Statement],
    env: &mut Environment,
) -> Result<Option<EvalResult>, PolicyError> {
    for statement in statements {
        let result = statement.execute(env)?;
        if result.is_terminal() {
            return Ok(Some(result));
        }
    }
    Ok(None)
}

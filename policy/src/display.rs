// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display implementations for policy objects

use crate::expr::{BooleanExpr, IntComparator, PrefixRange};
use crate::routing_policy::{RoutingPolicy, RoutingPolicyTable};
use crate::statement::Statement;
use std::fmt::{Display, Formatter, Result};

fn fmt_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> Result {
    for (n, item) in items.iter().enumerate() {
        if n > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Display for IntComparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let op = match self {
            IntComparator::Eq => "==",
            IntComparator::Ge => ">=",
            IntComparator::Gt => ">",
            IntComparator::Le => "<=",
            IntComparator::Lt => "<",
        };
        write!(f, "{op}")
    }
}

impl Display for PrefixRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} [{}..{}]", self.prefix, self.min_len, self.max_len)
    }
}

impl Display for BooleanExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            BooleanExpr::True => write!(f, "True"),
            BooleanExpr::False => write!(f, "False"),
            BooleanExpr::Not { expr } => write!(f, "Not({expr})"),
            BooleanExpr::Conjunction { conjuncts } => {
                write!(f, "Conjunction[")?;
                fmt_list(f, conjuncts)?;
                write!(f, "]")
            }
            BooleanExpr::Disjunction { disjuncts } => {
                write!(f, "Disjunction[")?;
                fmt_list(f, disjuncts)?;
                write!(f, "]")
            }
            BooleanExpr::MatchProcessAsn { asn } => write!(f, "MatchProcessAsn<{asn}>"),
            BooleanExpr::MatchPrefix { ranges } => {
                write!(f, "MatchPrefix<")?;
                fmt_list(f, ranges)?;
                write!(f, ">")
            }
            BooleanExpr::MatchProtocol { protocol } => write!(f, "MatchProtocol<{protocol}>"),
            BooleanExpr::MatchMetric { cmp, metric } => write!(f, "MatchMetric<{cmp} {metric}>"),
            BooleanExpr::MatchTag { cmp, tag } => write!(f, "MatchTag<{cmp} {tag}>"),
            BooleanExpr::MatchCommunity { community } => write!(f, "MatchCommunity<{community}>"),
            BooleanExpr::MatchAsPath { asn } => write!(f, "MatchAsPath<{asn}>"),
            BooleanExpr::CallPolicy { policy } => write!(f, "CallPolicy<{policy}>"),
        }
    }
}

impl Statement {
    fn fmt_indented(&self, f: &mut Formatter<'_>, depth: usize) -> Result {
        let pad = "  ".repeat(depth);
        match self {
            Statement::If {
                guard,
                true_statements,
                false_statements,
            } => {
                writeln!(f, "{pad}If {guard}")?;
                for s in true_statements {
                    s.fmt_indented(f, depth + 1)?;
                }
                if !false_statements.is_empty() {
                    writeln!(f, "{pad}Else")?;
                    for s in false_statements {
                        s.fmt_indented(f, depth + 1)?;
                    }
                }
                Ok(())
            }
            Statement::SetMetric { metric } => writeln!(f, "{pad}SetMetric {metric}"),
            Statement::SetTag { tag } => writeln!(f, "{pad}SetTag {tag}"),
            Statement::SetAdministrativeCost { admin } => {
                writeln!(f, "{pad}SetAdministrativeCost {admin}")
            }
            Statement::AddCommunity { community } => writeln!(f, "{pad}AddCommunity {community}"),
            Statement::ExitAccept => writeln!(f, "{pad}ExitAccept"),
            Statement::ExitReject => writeln!(f, "{pad}ExitReject"),
            Statement::ReturnTrue => writeln!(f, "{pad}ReturnTrue"),
            Statement::ReturnFalse => writeln!(f, "{pad}ReturnFalse"),
            Statement::ReturnLocalDefaultAction => writeln!(f, "{pad}ReturnLocalDefaultAction"),
            Statement::FallThrough => writeln!(f, "{pad}FallThrough"),
            Statement::SetDefaultActionAccept => writeln!(f, "{pad}SetDefaultActionAccept"),
            Statement::SetDefaultActionReject => writeln!(f, "{pad}SetDefaultActionReject"),
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        self.fmt_indented(f, 0)
    }
}

impl Display for RoutingPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "routing-policy {} ({})", self.name, self.owner)?;
        for s in &self.statements {
            s.fmt_indented(f, 1)?;
        }
        Ok(())
    }
}

impl Display for RoutingPolicyTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for policy in self.values() {
            write!(f, "{policy}")?;
        }
        Ok(())
    }
}

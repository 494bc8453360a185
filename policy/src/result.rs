// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Outcome of evaluating an expression or executing a statement

/// A boolean verdict together with the control-flow flags that statements raise.
/// `exit` stops the evaluation of every enclosing policy, `returned` stops only the
/// current one and `fall_through` tells that the verdict comes from the default
/// action rather than from an explicit decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EvalResult {
    pub boolean: bool,
    pub exit: bool,
    pub returned: bool,
    pub fall_through: bool,
}

impl EvalResult {
    #[must_use]
    pub fn new(boolean: bool) -> Self {
        Self {
            boolean,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn exit(boolean: bool) -> Self {
        Self {
            boolean,
            exit: true,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn returned(boolean: bool) -> Self {
        Self {
            boolean,
            returned: true,
            ..Default::default()
        }
    }
    #[must_use]
    pub fn fall_through(boolean: bool) -> Self {
        Self {
            boolean,
            returned: true,
            fall_through: true,
            ..Default::default()
        }
    }
    /// Tell if the result ends the evaluation of the current policy
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.exit || self.returned
    }
    #[must_use]
    pub fn negate(self) -> Self {
        Self {
            boolean: !self.boolean,
            ..self
        }
    }
}

impl From<bool> for EvalResult {
    fn from(boolean: bool) -> Self {
        Self::new(boolean)
    }
}

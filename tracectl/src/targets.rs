// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link-time registry of the tracing targets declared by the crates of the workspace

use crate::LevelFilter;
use linkme::distributed_slice;

/// A tracing target as declared by some crate or module
pub struct TargetDecl {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: &'static [&'static str],
    pub(crate) custom: bool,
}
impl TargetDecl {
    pub const fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
        custom: bool,
    ) -> Self {
        Self {
            target,
            name,
            level,
            tags,
            custom,
        }
    }
}

#[distributed_slice]
pub static TRACE_TARGETS: [TargetDecl];

#[macro_export]
macro_rules! trace_target_deps {
    () => {
        use linkme::distributed_slice;
        use $crate::LevelFilter;
        use $crate::targets::{TRACE_TARGETS, TargetDecl};
    };
}

#[macro_export]
/// Declare the tracing target of the calling module with a name, a default level
/// and a set of tags. Callers need `linkme` among their dependencies.
macro_rules! trace_target {
    // The expansion lives in an anonymous const scope so that the imports do not leak
    // into the caller and so that several declarations do not clash at link time.
    ($name:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use $crate::trace_target_deps;
            trace_target_deps!();

            #[distributed_slice(TRACE_TARGETS)]
            static TRACE_TGT: TargetDecl =
                TargetDecl::new(module_path!(), $name, $level, $tags, false);
        };
    };
}

#[macro_export]
/// Declare a tracing target that is not a module path
macro_rules! custom_target {
    ($target:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use $crate::trace_target_deps;
            trace_target_deps!();

            #[distributed_slice(TRACE_TARGETS)]
            static TRACE_TGT: TargetDecl = TargetDecl::new($target, $target, $level, $tags, true);
        };
    };
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Crate to declare tracing targets across the workspace and to control their log
//! levels at runtime.

pub mod control;
pub mod display;
pub mod targets;

// re-exports
pub use control::TraceCtlError;
pub use control::TracingControl;
pub use control::get_trace_ctl;
pub use tracing::level_filters::LevelFilter;

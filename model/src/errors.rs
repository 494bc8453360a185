// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Type for device configuration failures.
//! Any result returned by the builder or validation methods of the configuration model
//! is a `ConfigError`.

use thiserror::Error;

/// The reasons why we may reject a device configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Configuration has no hostname")]
    MissingHostname,
    #[error("An interface with name '{0}' already exists")]
    DuplicateInterface(String),
    #[error("An EIGRP process with ASN {0} already exists")]
    DuplicateEigrpProcess(u32),
    #[error("EIGRP settings for interface '{0}' already exist")]
    DuplicateEigrpInterfaceSettings(String),
    #[error("'{0}' is not a valid EIGRP autonomous system number")]
    InvalidEigrpAsn(u32),
    #[error("EIGRP settings refer to non-existent interface '{0}'")]
    NoSuchInterface(String),
    #[error("EIGRP settings for interface '{0}' refer to non-existent process {1}")]
    NoSuchEigrpProcess(String, u32),
}

/// Result-like type for configurations
pub type ConfigResult = Result<(), ConfigError>;

#[must_use]
pub fn stringify(conf_result: &ConfigResult) -> String {
    match conf_result {
        Ok(()) => "Ok".to_string(),
        Err(e) => format!("FAILED: {e}"),
    }
}

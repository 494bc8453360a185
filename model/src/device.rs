// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Device configuration model: the parts of a vendor-neutral device configuration that
//! routing-policy evaluation needs to consult. A configuration is built once by the
//! ingestion layer and is read-only afterwards.

use crate::errors::{ConfigError, ConfigResult};
use crate::prefix::{Ipv4Addr, Prefix};
use crate::route::Route;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub address: Option<Prefix>,
    pub active: bool,
}

impl Interface {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            address: None,
            active: true,
        }
    }
    #[must_use]
    pub fn set_address(mut self, address: Prefix) -> Self {
        self.address = Some(address);
        self
    }
    #[must_use]
    pub fn set_active(mut self, value: bool) -> Self {
        self.active = value;
        self
    }
}

/// An EIGRP routing process
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EigrpProcess {
    pub asn: u32,
    pub router_id: Option<Ipv4Addr>,
    /// Name of the routing policy that governs which routes get redistributed
    /// into this process
    pub redistribution_policy: Option<String>,
}

impl EigrpProcess {
    pub const MAX_ASN: u32 = 65535;

    #[must_use]
    pub fn new(asn: u32) -> Self {
        Self {
            asn,
            router_id: None,
            redistribution_policy: None,
        }
    }
    #[must_use]
    pub fn set_router_id(mut self, router_id: Ipv4Addr) -> Self {
        self.router_id = Some(router_id);
        self
    }
    #[must_use]
    pub fn set_redistribution_policy(mut self, policy: &str) -> Self {
        self.redistribution_policy = Some(policy.to_owned());
        self
    }
}

/// EIGRP settings generated for an interface when the interface gets attached to an
/// EIGRP process
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EigrpInterfaceSettings {
    pub asn: u32,
    pub passive: bool,
    pub delay: Option<u64>,
    pub bandwidth: Option<u64>,
}

impl EigrpInterfaceSettings {
    #[must_use]
    pub fn new(asn: u32) -> Self {
        Self {
            asn,
            passive: false,
            delay: None,
            bandwidth: None,
        }
    }
    #[must_use]
    pub fn set_passive(mut self, value: bool) -> Self {
        self.passive = value;
        self
    }
    #[must_use]
    pub fn set_delay(mut self, delay: u64) -> Self {
        self.delay = Some(delay);
        self
    }
    #[must_use]
    pub fn set_bandwidth(mut self, bandwidth: u64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub hostname: String,
    interfaces: BTreeMap<String, Interface>,
    eigrp_processes: BTreeMap<u32, EigrpProcess>,
    generated_eigrp_interface_settings: BTreeMap<String, EigrpInterfaceSettings>,
}

/* Impl basic ops */
impl Configuration {
    #[must_use]
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_owned(),
            ..Default::default()
        }
    }
    pub fn add_interface(&mut self, interface: Interface) -> ConfigResult {
        if self.interfaces.contains_key(&interface.name) {
            return Err(ConfigError::DuplicateInterface(interface.name));
        }
        self.interfaces.insert(interface.name.clone(), interface);
        Ok(())
    }
    pub fn add_eigrp_process(&mut self, process: EigrpProcess) -> ConfigResult {
        if process.asn == 0 || process.asn > EigrpProcess::MAX_ASN {
            return Err(ConfigError::InvalidEigrpAsn(process.asn));
        }
        if self.eigrp_processes.contains_key(&process.asn) {
            return Err(ConfigError::DuplicateEigrpProcess(process.asn));
        }
        self.eigrp_processes.insert(process.asn, process);
        Ok(())
    }
    pub fn add_eigrp_interface_settings(
        &mut self,
        ifname: &str,
        settings: EigrpInterfaceSettings,
    ) -> ConfigResult {
        if self.generated_eigrp_interface_settings.contains_key(ifname) {
            return Err(ConfigError::DuplicateEigrpInterfaceSettings(
                ifname.to_owned(),
            ));
        }
        self.generated_eigrp_interface_settings
            .insert(ifname.to_owned(), settings);
        Ok(())
    }

    #[must_use]
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.values()
    }
    #[must_use]
    pub fn eigrp_process(&self, asn: u32) -> Option<&EigrpProcess> {
        self.eigrp_processes.get(&asn)
    }
    pub fn eigrp_processes(&self) -> impl Iterator<Item = &EigrpProcess> {
        self.eigrp_processes.values()
    }
    /// Look up the generated EIGRP settings of the interface with the given name
    #[must_use]
    pub fn eigrp_interface_settings(&self, ifname: &str) -> Option<&EigrpInterfaceSettings> {
        self.generated_eigrp_interface_settings.get(ifname)
    }
    #[must_use]
    pub fn generated_eigrp_interface_settings(&self) -> &BTreeMap<String, EigrpInterfaceSettings> {
        &self.generated_eigrp_interface_settings
    }

    /// The connected routes implied by the addresses of the active interfaces
    #[must_use]
    pub fn connected_routes(&self) -> Vec<Route> {
        self.interfaces
            .values()
            .filter(|iface| iface.active)
            .filter_map(|iface| {
                iface
                    .address
                    .map(|address| Route::connected(address, &iface.name))
            })
            .collect()
    }

    /// Check the internal consistency of the configuration: generated EIGRP settings
    /// must refer to known interfaces and processes.
    pub fn validate(&self) -> ConfigResult {
        debug!("Validating configuration of {}", self.hostname);
        if self.hostname.is_empty() {
            error!("Found configuration without hostname");
            return Err(ConfigError::MissingHostname);
        }
        for (ifname, settings) in &self.generated_eigrp_interface_settings {
            if !self.interfaces.contains_key(ifname) {
                error!("{}: EIGRP settings for unknown interface {ifname}", self.hostname);
                return Err(ConfigError::NoSuchInterface(ifname.clone()));
            }
            if !self.eigrp_processes.contains_key(&settings.asn) {
                error!(
                    "{}: EIGRP settings of {ifname} refer to unknown process {}",
                    self.hostname, settings.asn
                );
                return Err(ConfigError::NoSuchEigrpProcess(
                    ifname.clone(),
                    settings.asn,
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::stringify;
    use crate::route::RoutingProtocol;
    use pretty_assertions::assert_eq;

    fn sample_config() -> Configuration {
        let mut config = Configuration::new("router1");
        config
            .add_interface(Interface::new("eth0").set_address(Prefix::expect_from("10.0.0.1/24")))
            .expect("Should succeed");
        config
            .add_interface(
                Interface::new("eth1")
                    .set_address(Prefix::expect_from("10.0.1.1/24"))
                    .set_active(false),
            )
            .expect("Should succeed");
        config
            .add_interface(Interface::new("lo"))
            .expect("Should succeed");
        config
            .add_eigrp_process(EigrpProcess::new(100).set_redistribution_policy("REDIST"))
            .expect("Should succeed");
        config
            .add_eigrp_interface_settings("eth0", EigrpInterfaceSettings::new(100))
            .expect("Should succeed");
        config
    }

    #[test]
    fn test_config_build() {
        let config = sample_config();
        assert_eq!(config.interfaces().count(), 3);
        assert_eq!(
            config.eigrp_interface_settings("eth0").map(|s| s.asn),
            Some(100)
        );
        assert!(config.eigrp_interface_settings("eth1").is_none());
        assert_eq!(
            config
                .eigrp_process(100)
                .and_then(|p| p.redistribution_policy.as_deref()),
            Some("REDIST")
        );
        assert_eq!(stringify(&config.validate()), "Ok");
    }

    #[test]
    fn test_config_duplicates() {
        let mut config = sample_config();
        assert_eq!(
            config.add_interface(Interface::new("eth0")),
            Err(ConfigError::DuplicateInterface("eth0".to_owned()))
        );
        assert_eq!(
            config.add_eigrp_process(EigrpProcess::new(100)),
            Err(ConfigError::DuplicateEigrpProcess(100))
        );
        assert_eq!(
            config.add_eigrp_process(EigrpProcess::new(0)),
            Err(ConfigError::InvalidEigrpAsn(0))
        );
        assert_eq!(
            config.add_eigrp_interface_settings("eth0", EigrpInterfaceSettings::new(100)),
            Err(ConfigError::DuplicateEigrpInterfaceSettings("eth0".to_owned()))
        );
    }

    #[test]
    fn test_config_validate_failures() {
        let mut config = sample_config();
        config
            .add_eigrp_interface_settings("eth9", EigrpInterfaceSettings::new(100))
            .expect("Should succeed");
        assert_eq!(
            config.validate(),
            Err(ConfigError::NoSuchInterface("eth9".to_owned()))
        );

        let mut config = sample_config();
        config
            .add_eigrp_interface_settings("lo", EigrpInterfaceSettings::new(200))
            .expect("Should succeed");
        assert_eq!(
            config.validate(),
            Err(ConfigError::NoSuchEigrpProcess("lo".to_owned(), 200))
        );

        assert_eq!(
            Configuration::default().validate(),
            Err(ConfigError::MissingHostname)
        );
    }

    #[test]
    fn test_connected_routes() {
        let config = sample_config();
        let routes = config.connected_routes();
        // eth1 is down and lo has no address
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].protocol(), RoutingProtocol::Connected);
        assert_eq!(routes[0].network, Prefix::expect_from("10.0.0.0/24"));
        assert_eq!(routes[0].next_hop_interface.as_deref(), Some("eth0"));
    }
}

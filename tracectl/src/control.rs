// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Runtime control of log levels, per target or per tag.

use ordermap::OrderMap;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Registry, prelude::*, reload};

use crate::LevelFilter;
use crate::display::TargetDbByTag;
use crate::targets::TRACE_TARGETS;
use crate::trace_target;

trace_target!("tracectl", LevelFilter::INFO, &[]);

#[derive(Debug, Error, PartialEq)]
pub enum TraceCtlError {
    #[error("Invalid syntax '{0}': expected tag=level")]
    BadSyntax(String),
    #[error("Invalid level '{0}' for tag '{1}'")]
    BadLevel(String, String),
}

#[derive(Debug, Clone)]
pub struct TargetCfg {
    pub target: &'static str,
    pub name: &'static str,
    pub level: LevelFilter,
    pub tags: Vec<&'static str>,
    pub custom: bool,
}
impl TargetCfg {
    fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
        custom: bool,
    ) -> Self {
        // a target is always reachable through its own name
        let mut tags = tags.to_vec();
        if !tags.contains(&name) {
            tags.push(name);
        }
        Self {
            target,
            name,
            level,
            tags,
            custom,
        }
    }
}

#[derive(Debug)]
pub(crate) struct TargetDb {
    pub(crate) level: LevelFilter,
    pub(crate) targets: OrderMap<&'static str, TargetCfg>,
    pub(crate) tags: OrderMap<&'static str, BTreeSet<&'static str>>,
}

impl TargetDb {
    fn new(level: LevelFilter) -> Self {
        let mut db = Self {
            level,
            targets: OrderMap::new(),
            tags: OrderMap::new(),
        };
        for decl in TRACE_TARGETS {
            db.register(TargetCfg::new(
                decl.target,
                decl.name,
                decl.level,
                decl.tags,
                decl.custom,
            ));
        }
        db
    }
    fn register(&mut self, tcfg: TargetCfg) {
        for tag in &tcfg.tags {
            self.tags.entry(*tag).or_default().insert(tcfg.target);
        }
        if let Some(prior) = self.targets.insert(tcfg.target, tcfg) {
            warn!("Target {} has been declared more than once", prior.target);
        }
    }
    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::new(self.level.to_string());
        for tcfg in self.targets.values() {
            match format!("{}={}", tcfg.target, tcfg.level).parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => error!("Unable to build filter for target {}: {e}", tcfg.target),
            }
        }
        filter
    }
    pub(crate) fn tagged(&self, tag: &str) -> impl Iterator<Item = &TargetCfg> {
        let members = self.tags.get(tag);
        self.targets
            .values()
            .filter(move |tcfg| members.is_some_and(|m| m.contains(&tcfg.target)))
    }
    fn set_tag_level(&mut self, tag: &str, level: LevelFilter) -> usize {
        let Some(members) = self.tags.get(tag) else {
            return 0;
        };
        let mut changed = 0;
        for target in members {
            if let Some(tcfg) = self.targets.get_mut(target)
                && tcfg.level != level
            {
                tcfg.level = level;
                changed += 1;
            }
        }
        changed
    }
    /// A config string that would reproduce the current levels
    fn as_config_string(&self) -> String {
        let mut out = format!("default={}", self.level);
        for tcfg in self.targets.values() {
            out += format!(",{}={}", tcfg.name, tcfg.level).as_str();
        }
        out
    }
}

pub struct TracingControl {
    db: Mutex<TargetDb>,
    reload_filter: reload::Handle<EnvFilter, Registry>,
}

static TRACING_CTL: OnceLock<TracingControl> = OnceLock::new();

/// Get a reference to the process-wide [`TracingControl`], installing the tracing
/// subscriber on first use
pub fn get_trace_ctl() -> &'static TracingControl {
    TRACING_CTL.get_or_init(TracingControl::new)
}

impl TracingControl {
    fn new() -> Self {
        let db = TargetDb::new(LevelFilter::INFO);
        let (filter, reload_filter) = reload::Layer::new(db.env_filter());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_line_number(true)
            .with_target(true)
            .with_thread_names(true)
            .with_level(true);

        if tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_err()
        {
            warn!("A global tracing subscriber was already installed");
        }
        Self {
            db: Mutex::new(db),
            reload_filter,
        }
    }
    fn lock(&self) -> MutexGuard<'_, TargetDb> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
    fn reload(&self, db: &TargetDb) {
        if let Err(e) = self.reload_filter.reload(db.env_filter()) {
            error!("Failed to reload tracing filter: {e}");
        }
    }
}

// public methods for TracingControl
impl TracingControl {
    pub fn init() {
        get_trace_ctl();
    }
    pub fn set_tag_level(&self, tag: &str, level: LevelFilter) {
        let mut db = self.lock();
        let changed = db.set_tag_level(tag, level);
        if changed > 0 {
            self.reload(&db);
        }
        info!("Changed log level for tag '{tag}' to {level}. Targets changed: {changed}");
    }
    pub fn set_level_all(&self, level: LevelFilter) {
        let mut db = self.lock();
        db.targets.values_mut().for_each(|t| t.level = level);
        self.reload(&db);
    }
    pub fn set_default_level(&self, level: LevelFilter) {
        let mut db = self.lock();
        if db.level != level {
            db.level = level;
            info!("Set default log level to {level}");
            self.reload(&db);
        }
    }
    #[must_use]
    pub fn default_level(&self) -> LevelFilter {
        self.lock().level
    }

    /// Parse comma-separated `tag=level` items, where level is one of
    /// off, error, warn, info, debug, trace
    fn parse_config(input: &str) -> Result<OrderMap<String, LevelFilter>, TraceCtlError> {
        let mut result = OrderMap::new();
        for item in input.split(',').map(str::trim) {
            let Some((tag, level)) = item.split_once('=') else {
                return Err(TraceCtlError::BadSyntax(item.to_owned()));
            };
            let (tag, level) = (tag.trim(), level.trim());
            let level = LevelFilter::from_str(level)
                .map_err(|_| TraceCtlError::BadLevel(level.to_owned(), tag.to_owned()))?;
            result.insert(tag.to_owned(), level);
        }
        Ok(result)
    }

    /// Apply a log configuration like `default=warn,all=info,acl=debug`.
    /// `default` sets the level of undeclared targets, `all` that of every declared
    /// target. Any other key is a tag. Tags are applied last so they override `all`.
    pub fn setup_from_string(&self, input: &str) -> Result<(), TraceCtlError> {
        let config = Self::parse_config(input)?;
        if let Some(level) = config.get("default") {
            self.set_default_level(*level);
        }
        if let Some(level) = config.get("all") {
            self.set_level_all(*level);
        }
        config
            .iter()
            .filter(|(tag, _)| *tag != "default" && *tag != "all")
            .for_each(|(tag, level)| self.set_tag_level(tag, *level));
        Ok(())
    }

    #[must_use]
    pub fn target(&self, target: &str) -> Option<TargetCfg> {
        self.lock().targets.get(target).cloned()
    }
    #[must_use]
    pub fn targets_by_tag(&self, tag: &str) -> Vec<TargetCfg> {
        self.lock().tagged(tag).cloned().collect()
    }
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        self.lock().tags.keys().copied().collect()
    }
    #[must_use]
    pub fn as_config_string(&self) -> String {
        self.lock().as_config_string()
    }
    pub fn dump(&self) {
        let db = self.lock();
        info!("{db}");
    }
    pub fn dump_targets_by_tag(&self) {
        let db = self.lock();
        info!("{}", TargetDbByTag(&db));
    }
}

#[cfg(test)]
mod tests {
    use crate::control::{TraceCtlError, get_trace_ctl};
    use crate::targets::TRACE_TARGETS;
    use crate::{LevelFilter, custom_target};
    use serial_test::serial;

    const TAG: &str = "test-tag";
    custom_target!("test-t1", LevelFilter::DEBUG, &[TAG]);
    custom_target!("test-t2", LevelFilter::ERROR, &[TAG]);
    custom_target!("test-t3", LevelFilter::WARN, &[]);

    #[test]
    #[serial]
    fn test_targets_collected_at_link_time() {
        let declared: Vec<&str> = TRACE_TARGETS.iter().map(|t| t.target).collect();
        assert!(declared.contains(&"test-t1"));
        assert!(declared.contains(&"test-t2"));
        assert!(declared.contains(&"test-t3"));
        // the module-level declaration of the control module itself
        assert!(declared.contains(&"netcfg_tracectl::control"));

        let tctl = get_trace_ctl();
        assert!(tctl.target("test-t1").is_some());
        assert!(tctl.tags().contains(&TAG));
        tctl.dump();
        tctl.dump_targets_by_tag();
    }

    #[test]
    #[serial]
    fn test_change_tag_level() {
        let tctl = get_trace_ctl();
        tctl.set_tag_level("test-t1", LevelFilter::DEBUG);
        tctl.set_tag_level("test-t2", LevelFilter::ERROR);

        let names: Vec<_> = tctl.targets_by_tag(TAG).iter().map(|t| t.target).collect();
        assert_eq!(names.len(), 2);

        tctl.set_tag_level(TAG, LevelFilter::OFF);
        for tcfg in tctl.targets_by_tag(TAG) {
            assert_eq!(tcfg.level, LevelFilter::OFF);
        }
        // untouched, not tagged
        assert_eq!(
            tctl.target("test-t3").map(|t| t.level),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    #[serial]
    fn test_setup_from_string() {
        let tctl = get_trace_ctl();
        tctl.setup_from_string("default=warn, test-tag=info, test-t3=error")
            .expect("Should succeed");
        assert_eq!(tctl.default_level(), LevelFilter::WARN);
        for tcfg in tctl.targets_by_tag(TAG) {
            assert_eq!(tcfg.level, LevelFilter::INFO);
        }
        assert_eq!(
            tctl.target("test-t3").map(|t| t.level),
            Some(LevelFilter::ERROR)
        );
        assert!(
            tctl.as_config_string()
                .to_lowercase()
                .starts_with("default=warn")
        );

        assert_eq!(
            tctl.setup_from_string("test-tag=loud"),
            Err(TraceCtlError::BadLevel("loud".to_owned(), "test-tag".to_owned()))
        );
        assert_eq!(
            tctl.setup_from_string("test-tag=error, foo"),
            Err(TraceCtlError::BadSyntax("foo".to_owned()))
        );
        tctl.set_default_level(LevelFilter::INFO);
    }
}

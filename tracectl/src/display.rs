// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Display implementations

use crate::control::{TargetCfg, TargetDb};
use std::fmt::Display;

macro_rules! TARGET_FMT {
    () => {
        "{:>48} │ {:>8} │ {}"
    };
}

impl Display for TargetCfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            format_args!(TARGET_FMT!(), self.target, self.level, self.tags.join(","))
        )
    }
}

impl Display for TargetDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{:>56}", "──────── Tracing targets ────────")?;
        writeln!(f, "{}", format_args!(TARGET_FMT!(), "TARGET", "LEVEL", "TAGS"))?;
        for tcfg in self.targets.values() {
            writeln!(f, "{tcfg}")?;
        }
        write!(f, "{}", format_args!(TARGET_FMT!(), "(default)", self.level, "--"))
    }
}

pub(crate) struct TargetDbByTag<'a>(pub(crate) &'a TargetDb);

impl Display for TargetDbByTag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let db = self.0;
        writeln!(f)?;
        writeln!(f, "{:>56}", "──────── Tracing targets by tag ────────")?;
        for tag in db.tags.keys() {
            writeln!(f, " {tag}:")?;
            for tcfg in db.tagged(tag) {
                writeln!(f, "      {:<48} : {}", tcfg.target, tcfg.level)?;
            }
        }
        Ok(())
    }
}

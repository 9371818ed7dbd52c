// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-session report context.
//!
//! A session owns one loaded model and the last table built from it. The
//! table is rebuilt only when the report options change.

use wwr_lite_core::Model;

use crate::error::Result;
use crate::report::{build_report, ReportOptions};
use crate::source::ModelSource;
use crate::table::ReportTable;

#[derive(Debug, Clone)]
pub struct ReportSession {
    model: Model,
    source: String,
    options: ReportOptions,
    table: Option<ReportTable>,
}

impl ReportSession {
    /// Loads a model from `source` and starts a session with default options.
    pub fn open(source: ModelSource) -> Result<Self> {
        let label = source.label();
        let model = source.load()?;
        Ok(Self::with_source(model, label))
    }

    pub fn new(model: Model) -> Self {
        Self::with_source(model, "memory".to_string())
    }

    fn with_source(model: Model, source: String) -> Self {
        Self {
            model,
            source,
            options: ReportOptions::default(),
            table: None,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Where the model was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Replaces the options, dropping the cached table if they differ.
    pub fn set_options(&mut self, options: ReportOptions) {
        if options != self.options {
            self.options = options;
            self.table = None;
        }
    }

    /// Table for the current options, built on first use.
    pub fn table(&mut self) -> Result<&ReportTable> {
        let table = match self.table.take() {
            Some(table) => table,
            None => build_report(&self.model, &self.options)?,
        };
        Ok(self.table.insert(table))
    }

    /// Applies `options` and returns the matching table.
    pub fn report(&mut self, options: ReportOptions) -> Result<&ReportTable> {
        self.set_options(options);
        self.table()
    }

    /// Whether a table for the current options is already cached.
    pub fn is_cached(&self) -> bool {
        self.table.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::WwrMode;
    use wwr_lite_core::UnitSystem;

    fn session() -> ReportSession {
        ReportSession::new(Model::new("m", UnitSystem::Meters, Vec::new()))
    }

    #[test]
    fn table_is_cached_until_options_change() {
        let mut session = session();
        assert!(!session.is_cached());

        session.table().unwrap();
        assert!(session.is_cached());

        // same options keep the cache
        session.set_options(ReportOptions::default());
        assert!(session.is_cached());

        session.set_options(ReportOptions {
            mode: WwrMode::PerFaceRatio,
            ..ReportOptions::default()
        });
        assert!(!session.is_cached());
    }

    #[test]
    fn failed_build_leaves_no_table() {
        let mut session = session();
        let bad = ReportOptions {
            north_angle: f64::INFINITY,
            ..ReportOptions::default()
        };
        assert!(session.report(bad).is_err());
        assert!(!session.is_cached());
    }

    #[test]
    fn report_switches_units() {
        let mut session = session();
        let table = session
            .report(ReportOptions {
                units: Some(UnitSystem::Inches),
                ..ReportOptions::default()
            })
            .unwrap();
        assert_eq!(table.units(), UnitSystem::Inches);
        assert_eq!(session.model().units, UnitSystem::Meters);
    }
}

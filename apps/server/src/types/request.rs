// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;
use wwr_lite_core::UnitSystem;
use wwr_lite_processing::{FaceScope, ReportOptions, WwrMode};

use crate::error::ApiError;

/// Report options as sent by clients, either in the query string or as
/// multipart text fields. Values stay raw until [`ReportQuery::resolve`]
/// so that bad input is reported as `INVALID_OPTIONS`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub north_angle: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub faces: Option<String>,
}

impl ReportQuery {
    /// Stores a multipart text field. Returns false for unknown names.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "north_angle" => &mut self.north_angle,
            "units" => &mut self.units,
            "mode" => &mut self.mode,
            "faces" => &mut self.faces,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Fills unset values from `other`.
    pub fn or(self, other: ReportQuery) -> ReportQuery {
        ReportQuery {
            north_angle: self.north_angle.or(other.north_angle),
            units: self.units.or(other.units),
            mode: self.mode.or(other.mode),
            faces: self.faces.or(other.faces),
        }
    }

    /// Parses and validates the options. Unset or blank values keep the
    /// value from `base`.
    pub fn resolve(&self, base: ReportOptions) -> Result<ReportOptions, ApiError> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        let north_angle = match present(&self.north_angle) {
            Some(raw) => raw.parse::<f64>().map_err(|_| {
                ApiError::InvalidOptions(format!("north_angle '{}' is not a number", raw))
            })?,
            None => base.north_angle,
        };

        let options = ReportOptions {
            north_angle,
            units: match present(&self.units) {
                Some(raw) => Some(raw.parse::<UnitSystem>()?),
                None => base.units,
            },
            mode: match present(&self.mode) {
                Some(raw) => raw.parse::<WwrMode>()?,
                None => base.mode,
            },
            faces: match present(&self.faces) {
                Some(raw) => raw.parse::<FaceScope>()?,
                None => base.faces,
            },
        };

        // reject out-of-range angles before any work is done
        options.north()?;
        Ok(options)
    }
}

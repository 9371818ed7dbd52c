// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wwr_lite_core::{Model, UnitSystem};
use wwr_lite_processing::{ReportOptions, ReportTable};

/// One-shot report response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    /// Cache key for this result (SHA-256 of file content and options).
    pub cache_key: String,
    /// Options the table was built with.
    pub options: ReportOptions,
    /// `{units, columns, rows}` as produced by [`ReportTable`]'s serializer.
    pub table: serde_json::Value,
    pub stats: ReportStats,
}

/// Report statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportStats {
    pub room_count: usize,
    pub face_count: usize,
    pub units: UnitSystem,
    /// Time spent loading the model (ms).
    pub load_time_ms: u64,
    /// Time spent building the table (ms).
    pub report_time_ms: u64,
    /// Whether result was from cache.
    pub from_cache: bool,
}

/// Identity and size of a loaded model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub identifier: String,
    pub display_name: String,
    pub units: UnitSystem,
    pub room_count: usize,
    pub face_count: usize,
}

impl From<&Model> for ModelSummary {
    fn from(model: &Model) -> Self {
        Self {
            identifier: model.identifier.clone(),
            display_name: model.display_name.clone(),
            units: model.units,
            room_count: model.rooms.len(),
            face_count: model.face_count(),
        }
    }
}

/// State of a report session and its current table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    /// Where the model came from, e.g. `upload:office.hbjson` or `host:rhino`.
    pub source: String,
    pub model: ModelSummary,
    pub options: ReportOptions,
    pub table: serde_json::Value,
}

/// Serializes a table into the JSON shape used in responses.
pub fn table_value(table: &ReportTable) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(table)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # WWR-Lite Processing
//!
//! Window-to-wall ratio reports for HBJSON building models.
//!
//! For each room the pipeline keeps the faces exposed to outside air,
//! classifies them into nine orientation buckets (roof plus eight compass
//! octants, floors excluded), aggregates a glazing ratio per bucket and
//! appends one row to a [`ReportTable`]. The table renders to JSON or to
//! comma-separated text with two-decimal numbers.
//!
//! ```rust,ignore
//! use wwr_lite_processing::{ModelSource, ReportOptions, ReportSession, WwrMode};
//!
//! let mut session = ReportSession::open(ModelSource::upload("office.hbjson", bytes))?;
//! let table = session.report(ReportOptions {
//!     north_angle: 15.0,
//!     mode: WwrMode::AreaRatio,
//!     ..ReportOptions::default()
//! })?;
//! std::fs::write("file.csv", table.to_csv())?;
//! ```

pub mod aggregate;
pub mod csv;
pub mod error;
pub mod orientation;
pub mod report;
pub mod session;
pub mod source;
pub mod table;

pub use aggregate::{aggregate, OrientationGroups, OrientationRatios, WwrMode};
pub use error::{Error, Result};
pub use orientation::{classify, classify_normal, FaceScope, NorthReference, Orientation};
pub use report::{build_report, room_record, ReportOptions};
pub use session::ReportSession;
pub use source::{HostKind, ModelSource};
pub use table::{room_scalars, scalar_columns, ReportTable, RoomRecord, RoomScalars};

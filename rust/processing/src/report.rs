// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Report pipeline: classify, aggregate and tabulate every room of a model.

use std::borrow::Cow;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use wwr_lite_core::{Model, Room, UnitSystem};

use crate::aggregate::{aggregate, OrientationGroups, WwrMode};
use crate::error::Result;
use crate::orientation::{FaceScope, NorthReference};
use crate::table::{room_scalars, ReportTable, RoomRecord};

/// User-facing knobs of a report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Counter-clockwise rotation of north from +Y, in degrees.
    pub north_angle: f64,
    /// Unit system of the report; the model's own when unset.
    pub units: Option<UnitSystem>,
    pub mode: WwrMode,
    pub faces: FaceScope,
}

impl ReportOptions {
    /// Validates the options and builds the north reference they describe.
    pub fn north(&self) -> Result<NorthReference> {
        NorthReference::new(self.north_angle)
    }
}

/// Builds the record of a single room.
pub fn room_record(room: &Room, north: &NorthReference, options: &ReportOptions) -> RoomRecord {
    let groups = OrientationGroups::from_room(room, north, options.faces);
    tracing::trace!(
        room = %room.identifier,
        faces = room.faces.len(),
        classified = groups.len(),
        "Classified room faces"
    );

    RoomRecord {
        display_name: room.display_name.clone(),
        scalars: room_scalars(room),
        wwr: aggregate(&groups, options.mode),
    }
}

/// Builds the report table of a model, one row per room in model order.
///
/// When a report unit differs from the model's, a converted copy is used;
/// the caller's model is never modified.
pub fn build_report(model: &Model, options: &ReportOptions) -> Result<ReportTable> {
    let start = Instant::now();
    let north = options.north()?;

    let model: Cow<'_, Model> = match options.units {
        Some(units) if units != model.units => {
            let mut converted = model.clone();
            converted.convert_to_units(units)?;
            tracing::debug!(from = %model.units, to = %units, "Converted model units");
            Cow::Owned(converted)
        }
        _ => Cow::Borrowed(model),
    };

    let mut table = ReportTable::with_capacity(model.units, model.rooms.len());
    for room in &model.rooms {
        table.push(room_record(room, &north, options));
    }

    tracing::info!(
        model = %model.identifier,
        rooms = table.len(),
        faces = model.face_count(),
        units = %model.units,
        mode = %options.mode,
        scope = %options.faces,
        north_angle = options.north_angle,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Report built"
    );

    Ok(table)
}

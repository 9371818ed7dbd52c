// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-room report records and the table they form.

use std::io::{self, Write};

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use wwr_lite_core::{Room, UnitSystem};

use crate::aggregate::OrientationRatios;
use crate::csv;
use crate::orientation::Orientation;

/// Whole-room quantities, passed through from the model unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RoomScalars {
    pub volume: f64,
    pub floor_area: f64,
    pub exterior_wall_area: f64,
    pub exterior_aperture_area: f64,
    pub exterior_skylight_aperture_area: f64,
}

impl RoomScalars {
    /// Values in report column order.
    pub fn values(&self) -> [f64; 5] {
        [
            self.volume,
            self.floor_area,
            self.exterior_wall_area,
            self.exterior_aperture_area,
            self.exterior_skylight_aperture_area,
        ]
    }
}

/// Reads the five scalar quantities of a room.
pub fn room_scalars(room: &Room) -> RoomScalars {
    RoomScalars {
        volume: room.volume(),
        floor_area: room.floor_area(),
        exterior_wall_area: room.exterior_wall_area(),
        exterior_aperture_area: room.exterior_aperture_area(),
        exterior_skylight_aperture_area: room.exterior_skylight_aperture_area(),
    }
}

/// One report row.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRecord {
    pub display_name: String,
    pub scalars: RoomScalars,
    pub wwr: OrientationRatios,
}

impl RoomRecord {
    /// All numeric cells in column order: scalars, then ratios.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.scalars
            .values()
            .into_iter()
            .chain(self.wwr.iter().map(|(_, v)| v))
    }
}

/// Labels of the five scalar columns for a unit system.
pub fn scalar_columns(units: UnitSystem) -> [String; 5] {
    let u = units.abbreviation();
    [
        format!("volume ({}3)", u),
        format!("floor_area ({}2)", u),
        format!("exterior-wall-area ({}2)", u),
        format!("exterior-aperture-area ({}2)", u),
        format!("exterior-skylight-aperture-area ({}2)", u),
    ]
}

/// Rows of room records sharing one unit system.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    units: UnitSystem,
    rows: Vec<RoomRecord>,
}

impl ReportTable {
    pub fn new(units: UnitSystem) -> Self {
        Self {
            units,
            rows: Vec::new(),
        }
    }

    pub fn with_capacity(units: UnitSystem, capacity: usize) -> Self {
        Self {
            units,
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: RoomRecord) {
        self.rows.push(record);
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn rows(&self) -> &[RoomRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header names, in order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(1 + 5 + Orientation::COUNT);
        columns.push("display_name".to_string());
        columns.extend(scalar_columns(self.units));
        columns.extend(
            Orientation::REPORT_ORDER
                .iter()
                .map(|o| o.column().to_string()),
        );
        columns
    }

    /// Header line followed by one line per room, numbers with two decimals.
    pub fn csv_lines(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(csv::format_row(self.columns())).chain(self.rows.iter().map(|row| {
            let cells = std::iter::once(row.display_name.clone())
                .chain(row.numbers().map(|v| format!("{:.2}", v)));
            csv::format_row(cells)
        }))
    }

    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in self.csv_lines() {
            writer.write_all(line.as_bytes())?;
        }
        writer.flush()
    }

    pub fn to_csv(&self) -> String {
        self.csv_lines().collect()
    }
}

/// One row serialized as an object keyed by column name.
struct RowView<'a> {
    columns: &'a [String],
    record: &'a RoomRecord,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        map.serialize_entry(&self.columns[0], &self.record.display_name)?;
        for (column, value) in self.columns[1..].iter().zip(self.record.numbers()) {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

impl Serialize for ReportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.columns();
        let rows: Vec<RowView<'_>> = self
            .rows
            .iter()
            .map(|record| RowView {
                columns: &columns,
                record,
            })
            .collect();

        let mut state = serializer.serialize_struct("ReportTable", 3)?;
        state.serialize_field("units", &self.units)?;
        state.serialize_field("columns", &columns)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

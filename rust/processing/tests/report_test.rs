// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end reports on a two-room HBJSON model.
//!
//! `Office A` has glazing on its south and east walls plus a 1 m² skylight.
//! `Lobby, North` has one window on its north wall. The rooms share an
//! interior wall with a `Surface` boundary condition.

use approx::assert_relative_eq;
use serde_json::json;
use std::path::Path;
use wwr_lite_core::{Model, UnitSystem};
use wwr_lite_processing::csv;
use wwr_lite_processing::{
    build_report, FaceScope, HostKind, ModelSource, Orientation, ReportOptions, ReportSession,
    ReportTable, WwrMode,
};

const MODEL_PATH: &str = "tests/models/two_rooms.hbjson";

fn load_model() -> Model {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(MODEL_PATH);
    Model::from_hbjson_file(&path).expect("fixture model should load")
}

fn report(options: ReportOptions) -> ReportTable {
    build_report(&load_model(), &options).expect("report should build")
}

fn with_north(angle: f64) -> ReportOptions {
    ReportOptions {
        north_angle: angle,
        ..ReportOptions::default()
    }
}

#[test]
fn one_row_per_room_in_model_order() {
    let table = report(ReportOptions::default());
    assert_eq!(table.len(), 2);
    assert_eq!(table.units(), UnitSystem::Meters);
    assert_eq!(table.rows()[0].display_name, "Office A");
    assert_eq!(table.rows()[1].display_name, "Lobby, North");
}

#[test]
fn room_scalars_match_geometry() {
    let table = report(ReportOptions::default());

    let office = &table.rows()[0].scalars;
    assert_relative_eq!(office.volume, 60.0, epsilon = 1e-9);
    assert_relative_eq!(office.floor_area, 20.0, epsilon = 1e-9);
    assert_relative_eq!(office.exterior_wall_area, 39.0, epsilon = 1e-9);
    assert_relative_eq!(office.exterior_aperture_area, 5.0, epsilon = 1e-9);
    assert_relative_eq!(office.exterior_skylight_aperture_area, 1.0, epsilon = 1e-9);

    let lobby = &table.rows()[1].scalars;
    assert_relative_eq!(lobby.exterior_wall_area, 27.0, epsilon = 1e-9);
    assert_relative_eq!(lobby.exterior_aperture_area, 6.0, epsilon = 1e-9);
    assert_eq!(lobby.exterior_skylight_aperture_area, 0.0);
}

#[test]
fn area_ratio_by_orientation() {
    let table = report(ReportOptions::default());

    let office = &table.rows()[0].wwr;
    assert_relative_eq!(office.get(Orientation::Roof), 5.0, epsilon = 1e-9);
    assert_relative_eq!(office.get(Orientation::South), 20.0, epsilon = 1e-9);
    assert_relative_eq!(office.get(Orientation::East), 100.0 * 2.0 / 12.0, epsilon = 1e-9);
    // opaque exterior wall
    assert_eq!(office.get(Orientation::West), 0.0);
    // the shared wall is interior
    assert_eq!(office.get(Orientation::North), 0.0);

    let lobby = &table.rows()[1].wwr;
    assert_relative_eq!(lobby.get(Orientation::North), 40.0, epsilon = 1e-9);
    assert_eq!(lobby.get(Orientation::Roof), 0.0);
    assert_eq!(lobby.get(Orientation::West), 0.0);

    for row in table.rows() {
        for orientation in [
            Orientation::NorthEast,
            Orientation::SouthEast,
            Orientation::SouthWest,
            Orientation::NorthWest,
        ] {
            assert_eq!(row.wwr.get(orientation), 0.0);
        }
    }
}

#[test]
fn rotating_north_moves_buckets() {
    let table = report(with_north(90.0));
    let office = &table.rows()[0].wwr;

    assert_relative_eq!(office.get(Orientation::West), 20.0, epsilon = 1e-9);
    assert_relative_eq!(office.get(Orientation::South), 100.0 * 2.0 / 12.0, epsilon = 1e-9);
    assert_eq!(office.get(Orientation::North), 0.0);
    assert_eq!(office.get(Orientation::East), 0.0);
    // roofs ignore north
    assert_relative_eq!(office.get(Orientation::Roof), 5.0, epsilon = 1e-9);

    let lobby = &table.rows()[1].wwr;
    assert_relative_eq!(lobby.get(Orientation::East), 40.0, epsilon = 1e-9);
    assert_eq!(lobby.get(Orientation::North), 0.0);
}

#[test]
fn north_angle_is_periodic() {
    assert_eq!(report(with_north(0.0)), report(with_north(360.0)));
    assert_eq!(report(with_north(0.0)), report(with_north(-360.0)));

    let a = report(with_north(45.0));
    let b = report(with_north(-315.0));
    for (x, y) in a.rows().iter().zip(b.rows()) {
        for ((_, u), (_, v)) in x.wwr.iter().zip(y.wwr.iter()) {
            assert_relative_eq!(u, v, epsilon = 1e-9);
        }
    }
}

#[test]
fn all_faces_scope_counts_shared_walls() {
    let options = ReportOptions {
        faces: FaceScope::All,
        ..ReportOptions::default()
    };
    let table = report(options);
    let office = &table.rows()[0].wwr;
    // shared north wall is opaque, so the bucket exists but stays at zero
    assert_eq!(office.get(Orientation::North), 0.0);
    assert_relative_eq!(office.get(Orientation::South), 20.0, epsilon = 1e-9);

    // adiabatic west wall of the lobby joins the west bucket
    let lobby = &table.rows()[1].wwr;
    assert_eq!(lobby.get(Orientation::West), 0.0);
    assert_relative_eq!(lobby.get(Orientation::North), 40.0, epsilon = 1e-9);
}

#[test]
fn per_face_ratio_sums_fractions() {
    let options = ReportOptions {
        mode: WwrMode::PerFaceRatio,
        ..ReportOptions::default()
    };
    let table = report(options);
    let office = &table.rows()[0].wwr;
    assert_relative_eq!(office.get(Orientation::South), 0.2, epsilon = 1e-9);
    assert_relative_eq!(office.get(Orientation::East), 2.0 / 12.0, epsilon = 1e-9);
    assert_relative_eq!(office.get(Orientation::Roof), 0.05, epsilon = 1e-9);
}

#[test]
fn csv_export_round_trips() {
    let table = report(ReportOptions::default());
    let text = table.to_csv();
    let records = csv::parse(&text);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0], table.columns());
    assert_eq!(records[0][1], "volume (m3)");
    assert_eq!(records[2][0], "Lobby, North");

    let column = |name: &str| records[0].iter().position(|c| c == name).unwrap();
    assert_eq!(records[1][column("south-wwr")], "20.00");
    assert_eq!(records[1][column("east-wwr")], "16.67");
    assert_eq!(records[2][column("north-wwr")], "40.00");
    assert_eq!(records[1][column("exterior-wall-area (m2)")], "39.00");
}

#[test]
fn report_in_feet_relabels_columns() {
    let options = ReportOptions {
        units: Some(UnitSystem::Feet),
        ..ReportOptions::default()
    };
    let table = report(options);
    assert_eq!(table.columns()[2], "floor_area (ft2)");
    assert_relative_eq!(
        table.rows()[0].scalars.floor_area,
        20.0 / (0.3048 * 0.3048),
        max_relative = 1e-9
    );
    assert_relative_eq!(table.rows()[1].wwr.get(Orientation::North), 40.0, epsilon = 1e-9);
}

#[test]
fn host_session_matches_upload_session() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(MODEL_PATH);
    let bytes = std::fs::read(&path).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let mut upload = ReportSession::open(ModelSource::upload("two_rooms.hbjson", bytes)).unwrap();
    let mut host =
        ReportSession::open(ModelSource::host(HostKind::Rhino, json!({ "hbjson": value })))
            .unwrap();

    assert_eq!(host.source(), "host:rhino");
    assert_eq!(upload.table().unwrap(), host.table().unwrap());

    let rotated = host.report(with_north(90.0)).unwrap().clone();
    assert_ne!(&rotated, upload.table().unwrap());
}

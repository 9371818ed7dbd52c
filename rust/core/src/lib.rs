// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # WWR-Lite Core
//!
//! Building model loading for WWR-Lite.
//!
//! ## Overview
//!
//! This crate reads Honeybee JSON (HBJSON) models and exposes them as
//! read-only rooms, faces and apertures:
//!
//! - **Loading**: [`Model::from_hbjson_str`] and friends validate every face
//!   and aperture boundary while deserializing
//! - **Geometry**: areas, outward normals and enclosed volumes are derived
//!   from vertices with [nalgebra](https://docs.rs/nalgebra)
//! - **Room totals**: volume, floor area, exterior wall/aperture/skylight areas
//! - **Units**: [`UnitSystem`] labels and [`Model::convert_to_units`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wwr_lite_core::{Model, UnitSystem};
//!
//! let mut model = Model::from_hbjson_file("office.hbjson")?;
//! model.convert_to_units(UnitSystem::Feet)?;
//!
//! for room in &model.rooms {
//!     println!("{}: {:.2} {}2", room.display_name, room.floor_area(), model.units.abbreviation());
//! }
//! ```

pub mod error;
pub mod geometry;
mod hbjson;
pub mod model;
pub mod units;

pub use error::{Error, Result};
pub use geometry::{enclosed_volume, polygon_area, polygon_normal, Face3D};
pub use model::{Aperture, BoundaryCondition, Face, FaceType, Model, Room};
pub use units::UnitSystem;

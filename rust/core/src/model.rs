// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rooms, faces and apertures of a loaded model.
//!
//! All derived quantities (areas, normals, room totals) are computed from
//! vertex geometry and never mutate the model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{enclosed_volume, Face3D};
use crate::hbjson::RawModel;
use crate::units::UnitSystem;

/// Type of a room face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceType {
    Wall,
    Floor,
    RoofCeiling,
    AirBoundary,
}

/// Boundary condition of a face
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryCondition {
    /// Exposed to outside air
    Outdoors,
    Ground,
    Adiabatic,
    /// Shared with another room; holds the identifiers of the adjacent objects
    Surface { adjacent: Vec<String> },
    OtherSideTemperature,
    /// Any boundary condition type this crate does not know about
    Other(String),
}

impl BoundaryCondition {
    pub fn is_outdoors(&self) -> bool {
        matches!(self, BoundaryCondition::Outdoors)
    }

    /// HBJSON type name.
    pub fn name(&self) -> &str {
        match self {
            BoundaryCondition::Outdoors => "Outdoors",
            BoundaryCondition::Ground => "Ground",
            BoundaryCondition::Adiabatic => "Adiabatic",
            BoundaryCondition::Surface { .. } => "Surface",
            BoundaryCondition::OtherSideTemperature => "OtherSideTemperature",
            BoundaryCondition::Other(name) => name,
        }
    }
}

/// A glazed opening hosted by a face
#[derive(Debug, Clone, PartialEq)]
pub struct Aperture {
    pub identifier: String,
    pub display_name: String,
    pub geometry: Face3D,
    pub is_operable: bool,
}

impl Aperture {
    pub fn new(identifier: impl Into<String>, geometry: Face3D) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: identifier.clone(),
            identifier,
            geometry,
            is_operable: false,
        }
    }

    pub fn area(&self) -> f64 {
        self.geometry.area()
    }
}

/// A planar boundary surface of a room
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub identifier: String,
    pub display_name: String,
    pub face_type: FaceType,
    pub geometry: Face3D,
    pub boundary_condition: BoundaryCondition,
    pub apertures: Vec<Aperture>,
}

impl Face {
    pub fn new(
        identifier: impl Into<String>,
        face_type: FaceType,
        geometry: Face3D,
        boundary_condition: BoundaryCondition,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: identifier.clone(),
            identifier,
            face_type,
            geometry,
            boundary_condition,
            apertures: Vec::new(),
        }
    }

    pub fn with_apertures(mut self, apertures: Vec<Aperture>) -> Self {
        self.apertures = apertures;
        self
    }

    pub fn area(&self) -> f64 {
        self.geometry.area()
    }

    /// Outward unit normal, zero for a face enclosing no area.
    pub fn normal(&self) -> nalgebra::Vector3<f64> {
        self.geometry.normal()
    }

    pub fn is_outdoors(&self) -> bool {
        self.boundary_condition.is_outdoors()
    }

    /// Combined area of all hosted apertures.
    pub fn aperture_area(&self) -> f64 {
        self.apertures.iter().map(Aperture::area).sum()
    }

    /// Aperture area divided by face area; zero for a face without area.
    pub fn aperture_ratio(&self) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        self.aperture_area() / area
    }
}

/// A closed volume bounded by faces
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub identifier: String,
    pub display_name: String,
    pub faces: Vec<Face>,
}

impl Room {
    pub fn new(identifier: impl Into<String>, faces: Vec<Face>) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: identifier.clone(),
            identifier,
            faces,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Enclosed volume, zero for a room without faces.
    pub fn volume(&self) -> f64 {
        enclosed_volume(self.faces.iter().map(|f| &f.geometry))
    }

    /// Combined area of all floor faces.
    pub fn floor_area(&self) -> f64 {
        self.faces
            .iter()
            .filter(|f| f.face_type == FaceType::Floor)
            .map(Face::area)
            .sum()
    }

    /// Combined area of walls exposed to outside air.
    pub fn exterior_wall_area(&self) -> f64 {
        self.exterior_faces_of(FaceType::Wall).map(Face::area).sum()
    }

    /// Combined area of apertures in walls exposed to outside air.
    pub fn exterior_aperture_area(&self) -> f64 {
        self.exterior_faces_of(FaceType::Wall)
            .map(Face::aperture_area)
            .sum()
    }

    /// Combined area of apertures in roofs exposed to outside air.
    pub fn exterior_skylight_aperture_area(&self) -> f64 {
        self.exterior_faces_of(FaceType::RoofCeiling)
            .map(Face::aperture_area)
            .sum()
    }

    fn exterior_faces_of(&self, face_type: FaceType) -> impl Iterator<Item = &Face> + '_ {
        self.faces
            .iter()
            .filter(move |f| f.face_type == face_type && f.is_outdoors())
    }
}

/// A building model made of rooms
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub identifier: String,
    pub display_name: String,
    pub units: UnitSystem,
    pub tolerance: f64,
    pub angle_tolerance: f64,
    pub rooms: Vec<Room>,
}

impl Model {
    pub fn new(identifier: impl Into<String>, units: UnitSystem, rooms: Vec<Room>) -> Self {
        let identifier = identifier.into();
        Self {
            display_name: identifier.clone(),
            identifier,
            units,
            tolerance: 0.01,
            angle_tolerance: 1.0,
            rooms,
        }
    }

    /// Load a model from HBJSON text.
    pub fn from_hbjson_str(content: &str) -> Result<Self> {
        let raw: RawModel = serde_json::from_str(content)?;
        raw.into_model()
    }

    /// Load a model from HBJSON bytes.
    pub fn from_hbjson_slice(content: &[u8]) -> Result<Self> {
        let raw: RawModel = serde_json::from_slice(content)?;
        raw.into_model()
    }

    /// Load a model from an already parsed JSON value.
    pub fn from_hbjson_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawModel = serde_json::from_value(value)?;
        raw.into_model()
    }

    /// Load a model from an HBJSON file on disk.
    pub fn from_hbjson_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read(path)?;
        Self::from_hbjson_slice(&content)
    }

    /// Rescale every coordinate into `target` units.
    ///
    /// Lengths scale linearly, so areas scale with the square of the factor
    /// and volumes with its cube. Converting to the current units is a no-op.
    pub fn convert_to_units(&mut self, target: UnitSystem) -> Result<()> {
        if self.units == target {
            return Ok(());
        }
        let factor = self.units.length_factor_to(target);

        for room in &mut self.rooms {
            for face in &mut room.faces {
                face.geometry = scale_geometry(&face.geometry, factor, &face.identifier)?;
                for aperture in &mut face.apertures {
                    aperture.geometry =
                        scale_geometry(&aperture.geometry, factor, &aperture.identifier)?;
                }
            }
        }

        self.tolerance *= factor;
        self.units = target;
        Ok(())
    }

    /// Total number of faces over all rooms.
    pub fn face_count(&self) -> usize {
        self.rooms.iter().map(|r| r.faces.len()).sum()
    }
}

fn scale_geometry(geometry: &Face3D, factor: f64, identifier: &str) -> Result<Face3D> {
    geometry
        .scaled(factor)
        .ok_or_else(|| Error::DegenerateGeometry {
            identifier: identifier.to_string(),
            reason: format!("collapsed when scaled by {}", factor),
        })
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire-level HBJSON documents.
//!
//! These mirror the subset of the Honeybee schema the report needs. Keys not
//! listed here (energy/radiance properties, shades, doors, user data) are
//! ignored. Conversion into [`crate::model`] types validates geometry.

use nalgebra::Point3;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::geometry::Face3D;
use crate::model::{Aperture, BoundaryCondition, Face, FaceType, Model, Room};
use crate::units::UnitSystem;

#[derive(Debug, Deserialize)]
pub(crate) struct RawModel {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub identifier: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub angle_tolerance: Option<f64>,
    #[serde(default)]
    pub rooms: Vec<RawRoom>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRoom {
    pub identifier: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub faces: Vec<RawFace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFace {
    pub identifier: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub face_type: FaceType,
    pub geometry: RawFace3D,
    pub boundary_condition: RawBoundaryCondition,
    #[serde(default)]
    pub apertures: Vec<RawAperture>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAperture {
    pub identifier: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub geometry: RawFace3D,
    #[serde(default)]
    pub is_operable: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFace3D {
    pub boundary: Vec<[f64; 3]>,
    #[serde(default)]
    pub holes: Vec<Vec<[f64; 3]>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBoundaryCondition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub boundary_condition_objects: Vec<String>,
}

fn to_points(coords: &[[f64; 3]]) -> Vec<Point3<f64>> {
    coords.iter().map(|c| Point3::new(c[0], c[1], c[2])).collect()
}

impl RawFace3D {
    fn into_face3d(self, identifier: &str) -> Result<Face3D> {
        let boundary = to_points(&self.boundary);
        let holes = self.holes.iter().map(|h| to_points(h)).collect();
        Face3D::new(boundary, holes).ok_or_else(|| Error::DegenerateGeometry {
            identifier: identifier.to_string(),
            reason: format!(
                "boundary has {} vertices, at least 3 are required",
                self.boundary.len()
            ),
        })
    }
}

impl From<RawBoundaryCondition> for BoundaryCondition {
    fn from(raw: RawBoundaryCondition) -> Self {
        match raw.kind.as_str() {
            "Outdoors" => BoundaryCondition::Outdoors,
            "Ground" => BoundaryCondition::Ground,
            "Adiabatic" => BoundaryCondition::Adiabatic,
            "Surface" => BoundaryCondition::Surface {
                adjacent: raw.boundary_condition_objects,
            },
            "OtherSideTemperature" => BoundaryCondition::OtherSideTemperature,
            _ => BoundaryCondition::Other(raw.kind),
        }
    }
}

impl RawAperture {
    fn into_aperture(self) -> Result<Aperture> {
        let geometry = self.geometry.into_face3d(&self.identifier)?;
        Ok(Aperture {
            display_name: self.display_name.unwrap_or_else(|| self.identifier.clone()),
            identifier: self.identifier,
            geometry,
            is_operable: self.is_operable,
        })
    }
}

impl RawFace {
    fn into_face(self) -> Result<Face> {
        let geometry = self.geometry.into_face3d(&self.identifier)?;
        let apertures = self
            .apertures
            .into_iter()
            .map(RawAperture::into_aperture)
            .collect::<Result<Vec<_>>>()?;
        Ok(Face {
            display_name: self.display_name.unwrap_or_else(|| self.identifier.clone()),
            identifier: self.identifier,
            face_type: self.face_type,
            geometry,
            boundary_condition: self.boundary_condition.into(),
            apertures,
        })
    }
}

impl RawRoom {
    fn into_room(self) -> Result<Room> {
        let faces = self
            .faces
            .into_iter()
            .map(RawFace::into_face)
            .collect::<Result<Vec<_>>>()?;
        Ok(Room {
            display_name: self.display_name.unwrap_or_else(|| self.identifier.clone()),
            identifier: self.identifier,
            faces,
        })
    }
}

impl RawModel {
    pub(crate) fn into_model(self) -> Result<Model> {
        if let Some(kind) = &self.kind {
            if kind != "Model" {
                return Err(Error::NotAModel(kind.clone()));
            }
        }

        let rooms = self
            .rooms
            .into_iter()
            .map(RawRoom::into_room)
            .collect::<Result<Vec<_>>>()?;

        Ok(Model {
            display_name: self.display_name.unwrap_or_else(|| self.identifier.clone()),
            identifier: self.identifier,
            units: self.units,
            tolerance: self.tolerance.unwrap_or(0.01),
            angle_tolerance: self.angle_tolerance.unwrap_or(1.0),
            rooms,
        })
    }
}

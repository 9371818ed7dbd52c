// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orientation classification of room faces.
//!
//! A face is assigned to the roof when its normal points straight up, is
//! dropped when it points straight down, and otherwise falls into one of
//! eight 45° compass windows measured clockwise from north.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use wwr_lite_core::Face;

use crate::error::{Error, Result};

/// Orientation bucket of an exterior face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Roof,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Orientation {
    pub const COUNT: usize = 9;

    /// Buckets in report column order.
    pub const REPORT_ORDER: [Orientation; Orientation::COUNT] = [
        Orientation::Roof,
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
        Orientation::NorthEast,
        Orientation::SouthEast,
        Orientation::SouthWest,
        Orientation::NorthWest,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Orientation::Roof => "roof",
            Orientation::North => "north",
            Orientation::NorthEast => "north-east",
            Orientation::East => "east",
            Orientation::SouthEast => "south-east",
            Orientation::South => "south",
            Orientation::SouthWest => "south-west",
            Orientation::West => "west",
            Orientation::NorthWest => "north-west",
        }
    }

    /// Report column holding this bucket's ratio.
    pub fn column(&self) -> &'static str {
        match self {
            Orientation::Roof => "roof-wwr",
            Orientation::North => "north-wwr",
            Orientation::NorthEast => "north-east-wwr",
            Orientation::East => "east-wwr",
            Orientation::SouthEast => "south-east-wwr",
            Orientation::South => "south-wwr",
            Orientation::SouthWest => "south-west-wwr",
            Orientation::West => "west-wwr",
            Orientation::NorthWest => "north-west-wwr",
        }
    }

    /// Position of this bucket in [`Orientation::REPORT_ORDER`].
    pub fn index(&self) -> usize {
        match self {
            Orientation::Roof => 0,
            Orientation::North => 1,
            Orientation::East => 2,
            Orientation::South => 3,
            Orientation::West => 4,
            Orientation::NorthEast => 5,
            Orientation::SouthEast => 6,
            Orientation::SouthWest => 7,
            Orientation::NorthWest => 8,
        }
    }

    /// Compass bucket for a clockwise angle from north, in degrees within [0, 360).
    ///
    /// Each window includes its upper bound, and north wraps across 0°.
    pub fn from_clockwise_angle(theta: f64) -> Orientation {
        if theta <= 22.5 || theta >= 337.5 {
            Orientation::North
        } else if theta <= 67.5 {
            Orientation::NorthEast
        } else if theta <= 112.5 {
            Orientation::East
        } else if theta <= 157.5 {
            Orientation::SouthEast
        } else if theta <= 202.5 {
            Orientation::South
        } else if theta <= 247.5 {
            Orientation::SouthWest
        } else if theta <= 292.5 {
            Orientation::West
        } else {
            Orientation::NorthWest
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction the report calls north, as a horizontal unit vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NorthReference {
    angle: f64,
    vector: Vector2<f64>,
}

impl NorthReference {
    /// Rotate the +Y axis counter-clockwise by `angle_degrees`.
    ///
    /// The angle must lie within [-360, 360]. It is reduced modulo 360 first,
    /// so full turns give exactly the same vector as no rotation.
    pub fn new(angle_degrees: f64) -> Result<Self> {
        if !angle_degrees.is_finite() || !(-360.0..=360.0).contains(&angle_degrees) {
            return Err(Error::InvalidNorthAngle(angle_degrees));
        }

        let turn = angle_degrees.rem_euclid(360.0);
        let vector = if turn == 0.0 || turn == 360.0 {
            Vector2::new(0.0, 1.0)
        } else {
            let (sin, cos) = turn.to_radians().sin_cos();
            Vector2::new(-sin, cos)
        };

        Ok(Self {
            angle: angle_degrees,
            vector,
        })
    }

    /// Rotation supplied by the user, in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn vector(&self) -> Vector2<f64> {
        self.vector
    }

    /// Clockwise angle in degrees from north to `direction`, within [0, 360).
    ///
    /// Sector edges in [`Orientation::from_clockwise_angle`] are exact for
    /// the returned angle, not for the direction. A normal built from trig,
    /// such as `(sin 22.5°, cos 22.5°)`, comes back as `22.500000000000004`
    /// and lands in the north-east sector.
    pub fn clockwise_angle_to(&self, direction: Vector2<f64>) -> f64 {
        let n = self.vector;
        let sin = n.y * direction.x - n.x * direction.y;
        let cos = n.dot(&direction);
        let theta = sin.atan2(cos).to_degrees().rem_euclid(360.0);
        // rem_euclid can round a tiny negative angle up to 360
        if theta >= 360.0 {
            0.0
        } else {
            theta
        }
    }
}

impl Default for NorthReference {
    fn default() -> Self {
        Self {
            angle: 0.0,
            vector: Vector2::new(0.0, 1.0),
        }
    }
}

/// Which faces take part in orientation buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaceScope {
    /// Only faces with an Outdoors boundary condition.
    #[default]
    Exterior,
    /// Every face, including interior partitions and ground contact.
    All,
}

impl FaceScope {
    pub fn name(&self) -> &'static str {
        match self {
            FaceScope::Exterior => "exterior",
            FaceScope::All => "all",
        }
    }
}

impl fmt::Display for FaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FaceScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exterior" | "exterior-only" => Ok(FaceScope::Exterior),
            "all" | "all-faces" => Ok(FaceScope::All),
            _ => Err(Error::UnknownFaceScope(s.to_string())),
        }
    }
}

/// Bucket for an outward unit normal, or `None` for a downward normal.
///
/// Only exact vertical components are recognised: `z == 1` is roof and
/// `z == -1` is excluded. Callers provide normalized normals. A normal with
/// no horizontal component left (the zero normal of a degenerate face) has
/// no bearing and is excluded as well.
pub fn classify_normal(normal: &Vector3<f64>, north: &NorthReference) -> Option<Orientation> {
    if normal.z == 1.0 {
        return Some(Orientation::Roof);
    }
    if normal.z == -1.0 {
        return None;
    }
    if normal.x == 0.0 && normal.y == 0.0 {
        return None;
    }
    let theta = north.clockwise_angle_to(Vector2::new(normal.x, normal.y));
    Some(Orientation::from_clockwise_angle(theta))
}

/// Bucket for a face, or `None` when the face is excluded.
///
/// With [`FaceScope::Exterior`] any face that is not exposed to outside air
/// is excluded before its normal is looked at.
pub fn classify(face: &Face, north: &NorthReference, scope: FaceScope) -> Option<Orientation> {
    if scope == FaceScope::Exterior && !face.is_outdoors() {
        return None;
    }
    classify_normal(&face.normal(), north)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use wwr_lite_core::{BoundaryCondition, Face3D, FaceType};

    fn wall_facing_north(bc: BoundaryCondition) -> Face {
        let geometry = Face3D::from_boundary(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(4.0, 0.0, 3.0),
            Point3::new(4.0, 0.0, 0.0),
        ])
        .unwrap();
        Face::new("wall", FaceType::Wall, geometry, bc)
    }

    fn horizontal(angle_degrees: f64) -> Vector3<f64> {
        let (sin, cos) = angle_degrees.to_radians().sin_cos();
        // clockwise from +Y
        Vector3::new(sin, cos, 0.0)
    }

    #[test]
    fn boundary_angles_fall_in_lower_bucket() {
        let cases = [
            (22.5, Orientation::North),
            (67.5, Orientation::NorthEast),
            (112.5, Orientation::East),
            (157.5, Orientation::SouthEast),
            (202.5, Orientation::South),
            (247.5, Orientation::SouthWest),
            (292.5, Orientation::West),
            (337.5, Orientation::North),
        ];
        for (theta, expected) in cases {
            assert_eq!(Orientation::from_clockwise_angle(theta), expected, "theta = {}", theta);
        }
    }

    #[test]
    fn just_past_boundary_moves_to_next_bucket() {
        let eps = 1e-9;
        assert_eq!(Orientation::from_clockwise_angle(22.5 + eps), Orientation::NorthEast);
        assert_eq!(Orientation::from_clockwise_angle(67.5 + eps), Orientation::East);
        assert_eq!(Orientation::from_clockwise_angle(112.5 + eps), Orientation::SouthEast);
        assert_eq!(Orientation::from_clockwise_angle(157.5 + eps), Orientation::South);
        assert_eq!(Orientation::from_clockwise_angle(202.5 + eps), Orientation::SouthWest);
        assert_eq!(Orientation::from_clockwise_angle(247.5 + eps), Orientation::West);
        assert_eq!(Orientation::from_clockwise_angle(292.5 + eps), Orientation::NorthWest);
        assert_eq!(Orientation::from_clockwise_angle(337.5 - eps), Orientation::NorthWest);
        assert_eq!(Orientation::from_clockwise_angle(0.0), Orientation::North);
        assert_eq!(Orientation::from_clockwise_angle(359.9), Orientation::North);
    }

    #[test]
    fn cardinal_normals() {
        let north = NorthReference::default();
        let cases = [
            (Vector3::new(0.0, 1.0, 0.0), Orientation::North),
            (Vector3::new(1.0, 0.0, 0.0), Orientation::East),
            (Vector3::new(0.0, -1.0, 0.0), Orientation::South),
            (Vector3::new(-1.0, 0.0, 0.0), Orientation::West),
        ];
        for (normal, expected) in cases {
            assert_eq!(classify_normal(&normal, &north), Some(expected));
        }
    }

    #[test]
    fn diagonal_normals() {
        let north = NorthReference::default();
        let cases = [
            (45.0, Orientation::NorthEast),
            (135.0, Orientation::SouthEast),
            (225.0, Orientation::SouthWest),
            (315.0, Orientation::NorthWest),
        ];
        for (angle, expected) in cases {
            assert_eq!(classify_normal(&horizontal(angle), &north), Some(expected));
        }
    }

    #[test]
    fn roof_and_floor() {
        let north = NorthReference::default();
        assert_eq!(
            classify_normal(&Vector3::new(0.0, 0.0, 1.0), &north),
            Some(Orientation::Roof)
        );
        assert_eq!(classify_normal(&Vector3::new(0.0, 0.0, -1.0), &north), None);
        // tilted roofs are classified by their horizontal projection
        let tilted = Vector3::new(0.0, 0.6, 0.8);
        assert_eq!(classify_normal(&tilted, &north), Some(Orientation::North));
    }

    #[test]
    fn zero_normal_has_no_bucket() {
        let north = NorthReference::default();
        assert_eq!(classify_normal(&Vector3::zeros(), &north), None);

        let sliver = Face3D::from_boundary(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        let face = Face::new("sliver", FaceType::Wall, sliver, BoundaryCondition::Outdoors);
        assert_eq!(classify(&face, &north, FaceScope::Exterior), None);
        assert_eq!(classify(&face, &north, FaceScope::All), None);
    }

    #[test]
    fn trig_normal_on_sector_edge_rounds_past_it() {
        let north = NorthReference::default();
        let theta = north.clockwise_angle_to(Vector2::new(0.0, 1.0));
        assert_eq!(theta, 0.0);

        let normal = horizontal(22.5);
        let theta = north.clockwise_angle_to(Vector2::new(normal.x, normal.y));
        assert!(theta > 22.5, "theta = {}", theta);
        assert_eq!(classify_normal(&normal, &north), Some(Orientation::NorthEast));
        assert_eq!(Orientation::from_clockwise_angle(22.5), Orientation::North);
    }

    #[test]
    fn non_outdoor_faces_excluded_in_exterior_scope() {
        let north = NorthReference::default();
        for bc in [
            BoundaryCondition::Ground,
            BoundaryCondition::Adiabatic,
            BoundaryCondition::Surface {
                adjacent: vec!["other".to_string()],
            },
            BoundaryCondition::Other("Custom".to_string()),
        ] {
            let face = wall_facing_north(bc);
            assert_eq!(classify(&face, &north, FaceScope::Exterior), None);
            assert_eq!(
                classify(&face, &north, FaceScope::All),
                Some(Orientation::North)
            );
        }

        let outdoor = wall_facing_north(BoundaryCondition::Outdoors);
        assert_eq!(
            classify(&outdoor, &north, FaceScope::Exterior),
            Some(Orientation::North)
        );
    }

    #[test]
    fn zero_rotation_matches_default() {
        let rotated = NorthReference::new(0.0).unwrap();
        let default = NorthReference::default();
        assert_eq!(rotated.vector(), default.vector());

        for step in 0..72 {
            let normal = horizontal(step as f64 * 5.0 + 1.0);
            assert_eq!(
                classify_normal(&normal, &rotated),
                classify_normal(&normal, &default)
            );
        }
    }

    #[test]
    fn full_turns_match_zero_rotation() {
        let zero = NorthReference::new(0.0).unwrap();
        for turn in [360.0, -360.0] {
            let reference = NorthReference::new(turn).unwrap();
            assert_eq!(reference.vector(), zero.vector());
            for step in 0..72 {
                let normal = horizontal(step as f64 * 5.0 + 2.5);
                assert_eq!(
                    classify_normal(&normal, &reference),
                    classify_normal(&normal, &zero)
                );
            }
        }
    }

    #[test]
    fn rotated_north_shifts_buckets() {
        // north rotated 90° counter-clockwise points along -X
        let reference = NorthReference::new(90.0).unwrap();
        assert_eq!(
            classify_normal(&Vector3::new(-1.0, 0.0, 0.0), &reference),
            Some(Orientation::North)
        );
        assert_eq!(
            classify_normal(&Vector3::new(0.0, 1.0, 0.0), &reference),
            Some(Orientation::East)
        );
        assert_eq!(
            classify_normal(&Vector3::new(1.0, 0.0, 0.0), &reference),
            Some(Orientation::South)
        );
        let reference = NorthReference::new(-90.0).unwrap();
        assert_eq!(
            classify_normal(&Vector3::new(1.0, 0.0, 0.0), &reference),
            Some(Orientation::North)
        );
    }

    #[test]
    fn rejects_out_of_range_angles() {
        assert!(matches!(
            NorthReference::new(360.5),
            Err(Error::InvalidNorthAngle(_))
        ));
        assert!(NorthReference::new(f64::NAN).is_err());
        assert!(NorthReference::new(-720.0).is_err());
    }

    #[test]
    fn clockwise_angle_range() {
        let north = NorthReference::default();
        for step in 0..360 {
            let theta = north.clockwise_angle_to(Vector2::new(
                (step as f64).to_radians().sin(),
                (step as f64).to_radians().cos(),
            ));
            assert!((0.0..360.0).contains(&theta));
        }
    }

    #[test]
    fn face_scope_parsing() {
        assert_eq!("exterior".parse::<FaceScope>().unwrap(), FaceScope::Exterior);
        assert_eq!("ALL".parse::<FaceScope>().unwrap(), FaceScope::All);
        assert!("interior".parse::<FaceScope>().is_err());
    }

    #[test]
    fn report_order_indices() {
        for (i, orientation) in Orientation::REPORT_ORDER.iter().enumerate() {
            assert_eq!(orientation.index(), i);
        }
    }
}

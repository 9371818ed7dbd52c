// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon geometry.
//!
//! Computes areas, normals and enclosed volumes with plain vector algebra
//! over nalgebra points. Derived quantities are computed once when a
//! [`Face3D`] is built and cached alongside the vertices.

use nalgebra::{Point3, Vector3};

/// Twice the signed vector area of a polygon.
///
/// Sums the cross products of a triangle fan anchored at the first vertex.
/// Edge vectors are measured from that vertex, so a polygon lying in an
/// axis-aligned plane yields a vector with exactly zero off-axis components.
pub fn vector_area(points: &[Point3<f64>]) -> Vector3<f64> {
    let mut total = Vector3::zeros();
    if points.len() < 3 {
        return total;
    }

    let p0 = points[0];
    for window in points[1..].windows(2) {
        let v1 = window[0] - p0;
        let v2 = window[1] - p0;
        total += v1.cross(&v2);
    }
    total
}

/// Unsigned area of a planar polygon.
pub fn polygon_area(points: &[Point3<f64>]) -> f64 {
    vector_area(points).norm() / 2.0
}

/// Unit normal of a planar polygon following the right-hand rule of its
/// winding, or `None` when the polygon is degenerate.
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let total = vector_area(points);
    let len = total.norm();
    if len < 1e-15 {
        return None;
    }
    Some(total / len)
}

/// A planar face with an outer boundary and optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Face3D {
    boundary: Vec<Point3<f64>>,
    holes: Vec<Vec<Point3<f64>>>,
    normal: Vector3<f64>,
    area: f64,
}

impl Face3D {
    /// Builds a face from its boundary and holes.
    ///
    /// Returns `None` if the boundary has fewer than three vertices. A
    /// boundary that encloses no area (collinear or repeated vertices) gives
    /// a face with a zero normal and zero area.
    pub fn new(boundary: Vec<Point3<f64>>, holes: Vec<Vec<Point3<f64>>>) -> Option<Self> {
        if boundary.len() < 3 {
            return None;
        }
        let normal = polygon_normal(&boundary).unwrap_or_else(Vector3::zeros);

        let hole_area: f64 = holes.iter().map(|h| polygon_area(h)).sum();
        let area = if normal == Vector3::zeros() {
            0.0
        } else {
            (polygon_area(&boundary) - hole_area).max(0.0)
        };

        Some(Self {
            boundary,
            holes,
            normal,
            area,
        })
    }

    /// Whether the boundary encloses no area, leaving the face without a normal.
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vector3::zeros()
    }

    /// Builds a face without holes.
    pub fn from_boundary(boundary: Vec<Point3<f64>>) -> Option<Self> {
        Self::new(boundary, Vec::new())
    }

    pub fn boundary(&self) -> &[Point3<f64>] {
        &self.boundary
    }

    pub fn holes(&self) -> &[Vec<Point3<f64>>] {
        &self.holes
    }

    /// Outward unit normal, zero for a degenerate face.
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// Area of the boundary minus the area of its holes.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Signed distance of the face plane from the origin along the normal.
    pub fn plane_offset(&self) -> f64 {
        self.normal.dot(&self.boundary[0].coords)
    }

    /// Returns a copy uniformly scaled about the origin.
    pub fn scaled(&self, factor: f64) -> Option<Self> {
        let scale = |pts: &[Point3<f64>]| -> Vec<Point3<f64>> {
            pts.iter().map(|p| Point3::from(p.coords * factor)).collect()
        };
        Self::new(
            scale(self.boundary.as_slice()),
            self.holes.iter().map(|h| scale(h.as_slice())).collect(),
        )
    }
}

/// Volume enclosed by a closed set of outward-facing planar faces.
///
/// Applies the divergence theorem: each face contributes its plane offset
/// times its area, over three.
pub fn enclosed_volume<'a>(faces: impl IntoIterator<Item = &'a Face3D>) -> f64 {
    let signed: f64 = faces
        .into_iter()
        .map(|f| f.plane_offset() * f.area())
        .sum();
    (signed / 3.0).abs()
}

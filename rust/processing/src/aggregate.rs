// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window-to-wall ratio aggregation per orientation bucket.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use wwr_lite_core::{Face, Room};

use crate::error::{Error, Result};
use crate::orientation::{classify, FaceScope, NorthReference, Orientation};

/// Formula used to turn a bucket of faces into a single ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WwrMode {
    /// `100 * Σ aperture area / Σ face area`, a percentage.
    #[default]
    AreaRatio,
    /// `Σ face aperture ratio`, a plain sum of per-face fractions.
    ///
    /// Faces are not weighted by area, so a bucket of several faces can add
    /// up to more than one.
    PerFaceRatio,
}

impl WwrMode {
    pub fn name(&self) -> &'static str {
        match self {
            WwrMode::AreaRatio => "area-ratio",
            WwrMode::PerFaceRatio => "per-face-ratio",
        }
    }

    /// Ratio for one bucket of faces. Empty or fully opaque buckets give 0.
    pub fn ratio(&self, faces: &[&Face]) -> f64 {
        match self {
            WwrMode::AreaRatio => area_ratio(faces),
            WwrMode::PerFaceRatio => faces.iter().map(|f| f.aperture_ratio()).sum(),
        }
    }
}

fn area_ratio(faces: &[&Face]) -> f64 {
    let (face_area, aperture_area) = faces.iter().fold((0.0, 0.0), |(fa, aa), f| {
        (fa + f.area(), aa + f.aperture_area())
    });
    if aperture_area <= 0.0 || face_area <= 0.0 {
        return 0.0;
    }
    aperture_area * 100.0 / face_area
}

impl fmt::Display for WwrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WwrMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "area-ratio" | "ratio" => Ok(WwrMode::AreaRatio),
            "per-face-ratio" | "per-face" => Ok(WwrMode::PerFaceRatio),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Faces of a room grouped by orientation.
#[derive(Debug, Clone, Default)]
pub struct OrientationGroups<'a> {
    groups: [Vec<&'a Face>; Orientation::COUNT],
}

impl<'a> OrientationGroups<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies every face of `room`, dropping excluded ones.
    pub fn from_room(room: &'a Room, north: &NorthReference, scope: FaceScope) -> Self {
        let mut groups = Self::new();
        for face in &room.faces {
            if let Some(orientation) = classify(face, north, scope) {
                groups.push(orientation, face);
            }
        }
        groups
    }

    pub fn push(&mut self, orientation: Orientation, face: &'a Face) {
        self.groups[orientation.index()].push(face);
    }

    pub fn faces(&self, orientation: Orientation) -> &[&'a Face] {
        &self.groups[orientation.index()]
    }

    /// Number of classified faces across all buckets.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One ratio per orientation bucket, zero unless set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrientationRatios([f64; Orientation::COUNT]);

impl OrientationRatios {
    pub fn get(&self, orientation: Orientation) -> f64 {
        self.0[orientation.index()]
    }

    pub fn set(&mut self, orientation: Orientation, value: f64) {
        self.0[orientation.index()] = value;
    }

    /// Ratios in report column order.
    pub fn iter(&self) -> impl Iterator<Item = (Orientation, f64)> + '_ {
        Orientation::REPORT_ORDER
            .iter()
            .map(move |o| (*o, self.get(*o)))
    }
}

impl Serialize for OrientationRatios {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Orientation::COUNT))?;
        for (orientation, value) in self.iter() {
            map.serialize_entry(orientation.column(), &value)?;
        }
        map.end()
    }
}

/// Ratio of every bucket under `mode`.
pub fn aggregate(groups: &OrientationGroups<'_>, mode: WwrMode) -> OrientationRatios {
    let mut ratios = OrientationRatios::default();
    for orientation in Orientation::REPORT_ORDER {
        let faces = groups.faces(orientation);
        if faces.is_empty() {
            continue;
        }
        ratios.set(orientation, mode.ratio(faces));
    }
    ratios
}

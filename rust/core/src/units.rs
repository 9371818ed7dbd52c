// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit systems for HBJSON models
//!
//! Honeybee models carry a `units` key naming the length unit of every
//! coordinate. Reports label their area and volume columns with the unit
//! abbreviation, and models can be rescaled into another unit on request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Length unit of a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Meters,
    Millimeters,
    Feet,
    Inches,
    Centimeters,
}

impl UnitSystem {
    /// All supported unit systems, in the order HBJSON documents them
    pub const ALL: [UnitSystem; 5] = [
        UnitSystem::Meters,
        UnitSystem::Millimeters,
        UnitSystem::Feet,
        UnitSystem::Inches,
        UnitSystem::Centimeters,
    ];

    /// HBJSON name of the unit (e.g. "Meters")
    pub fn name(&self) -> &'static str {
        match self {
            UnitSystem::Meters => "Meters",
            UnitSystem::Millimeters => "Millimeters",
            UnitSystem::Feet => "Feet",
            UnitSystem::Inches => "Inches",
            UnitSystem::Centimeters => "Centimeters",
        }
    }

    /// Standard abbreviation used in column labels
    pub fn abbreviation(&self) -> &'static str {
        match self {
            UnitSystem::Meters => "m",
            UnitSystem::Millimeters => "mm",
            UnitSystem::Feet => "ft",
            UnitSystem::Inches => "in",
            UnitSystem::Centimeters => "cm",
        }
    }

    /// Length of one unit in meters
    #[inline]
    pub fn meters(&self) -> f64 {
        match self {
            UnitSystem::Meters => 1.0,
            UnitSystem::Millimeters => 1e-3,
            UnitSystem::Feet => 0.3048,
            UnitSystem::Inches => 0.0254,
            UnitSystem::Centimeters => 1e-2,
        }
    }

    /// Multiplier converting a length in `self` into a length in `target`
    #[inline]
    pub fn length_factor_to(&self, target: UnitSystem) -> f64 {
        if *self == target {
            return 1.0;
        }
        self.meters() / target.meters()
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitSystem {
    type Err = Error;

    /// Accepts the HBJSON name or the abbreviation, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        UnitSystem::ALL
            .into_iter()
            .find(|u| {
                u.name().eq_ignore_ascii_case(needle) || u.abbreviation().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| Error::UnknownUnits(s.to_string()))
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for report generation.

use crate::source::HostKind;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading a model or configuring a report.
///
/// Degenerate geometry inside a loaded model is never an error here: empty
/// buckets and opaque faces resolve to a ratio of zero.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model could not be loaded.
    #[error("model error: {0}")]
    Model(#[from] wwr_lite_core::Error),

    /// North angle outside [-360, 360] or not a number.
    #[error("north angle must be a finite number of degrees within [-360, 360], got {0}")]
    InvalidNorthAngle(f64),

    /// A host plugin sent a payload without an `hbjson` entry.
    #[error("{0} payload does not contain an 'hbjson' model")]
    MissingHostPayload(HostKind),

    #[error("unknown host '{0}': expected 'rhino' or 'revit'")]
    UnknownHost(String),

    #[error("unknown WWR mode '{0}': expected 'area-ratio' or 'per-face-ratio'")]
    UnknownMode(String),

    #[error("unknown face scope '{0}': expected 'exterior' or 'all'")]
    UnknownFaceScope(String),
}

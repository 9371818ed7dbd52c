// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model loading and geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a model
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid HBJSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected a Model document, found type '{0}'")]
    NotAModel(String),

    #[error("Degenerate geometry in '{identifier}': {reason}")]
    DegenerateGeometry { identifier: String, reason: String },

    #[error("Unknown unit system: {0}")]
    UnknownUnits(String),
}

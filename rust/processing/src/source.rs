// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Where a model comes from: a file upload or a CAD/BIM host plugin.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wwr_lite_core::Model;

use crate::error::{Error, Result};

/// CAD/BIM application pushing a model through its plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostKind {
    Rhino,
    Revit,
}

impl HostKind {
    pub fn name(&self) -> &'static str {
        match self {
            HostKind::Rhino => "rhino",
            HostKind::Revit => "revit",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HostKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rhino" => Ok(HostKind::Rhino),
            "revit" => Ok(HostKind::Revit),
            _ => Err(Error::UnknownHost(s.to_string())),
        }
    }
}

/// A model waiting to be loaded.
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// HBJSON bytes uploaded by the user.
    FileUpload { file_name: String, bytes: Vec<u8> },
    /// Message from a host plugin; the model sits under its `hbjson` key,
    /// either inline or as a JSON-encoded string.
    HostPlugin { kind: HostKind, payload: Value },
}

impl ModelSource {
    pub fn upload(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        ModelSource::FileUpload {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn host(kind: HostKind, payload: Value) -> Self {
        ModelSource::HostPlugin { kind, payload }
    }

    /// Short description for logs, e.g. `upload:office.hbjson` or `host:rhino`.
    pub fn label(&self) -> String {
        match self {
            ModelSource::FileUpload { file_name, .. } => format!("upload:{}", file_name),
            ModelSource::HostPlugin { kind, .. } => format!("host:{}", kind),
        }
    }

    /// Parses the model.
    pub fn load(self) -> Result<Model> {
        let label = self.label();
        let model = match self {
            ModelSource::FileUpload { bytes, .. } => Model::from_hbjson_slice(&bytes)?,
            ModelSource::HostPlugin { kind, mut payload } => {
                let hbjson = payload
                    .get_mut("hbjson")
                    .map(Value::take)
                    .filter(|v| !v.is_null())
                    .ok_or(Error::MissingHostPayload(kind))?;
                match hbjson {
                    Value::String(text) => Model::from_hbjson_str(&text)?,
                    other => Model::from_hbjson_value(other)?,
                }
            }
        };

        tracing::debug!(
            source = %label,
            model = %model.identifier,
            rooms = model.rooms.len(),
            "Loaded model"
        );
        Ok(model)
    }
}

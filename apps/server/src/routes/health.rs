// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub sessions: usize,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/api/v1/health", "Health check endpoint"),
    ("POST", "/api/v1/report", "Upload an HBJSON model and get the WWR table as JSON"),
    ("POST", "/api/v1/report/csv", "Upload an HBJSON model and download the WWR table as CSV"),
    ("GET", "/api/v1/report/:key", "Retrieve a cached report"),
    ("POST", "/api/v1/sessions", "Open a report session from an uploaded model"),
    ("POST", "/api/v1/host/:kind/sessions", "Open a report session from a Rhino or Revit plugin"),
    ("GET", "/api/v1/sessions/:id", "Session table under the given options"),
    ("GET", "/api/v1/sessions/:id/csv", "Session table as CSV"),
    ("DELETE", "/api/v1/sessions/:id", "Close a session"),
];

/// GET /api/v1/health - Health check endpoint.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "wwr-lite-server",
        sessions: state.sessions.len().await,
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "wwr-lite-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "Window-to-wall ratio by orientation for HBJSON building models",
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description)| EndpointInfo {
                method,
                path,
                description,
            })
            .collect(),
    })
}

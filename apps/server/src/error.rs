// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid report options: {0}")]
    InvalidOptions(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session limit reached: at most {max} sessions")]
    SessionLimit { max: usize },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::InvalidModel(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_MODEL"),
            ApiError::InvalidOptions(_) => (StatusCode::BAD_REQUEST, "INVALID_OPTIONS"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::SessionLimit { .. } => (StatusCode::SERVICE_UNAVAILABLE, "SESSION_LIMIT"),
            ApiError::Cache(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<wwr_lite_core::Error> for ApiError {
    fn from(err: wwr_lite_core::Error) -> Self {
        match err {
            wwr_lite_core::Error::UnknownUnits(_) => ApiError::InvalidOptions(err.to_string()),
            _ => ApiError::InvalidModel(err.to_string()),
        }
    }
}

impl From<wwr_lite_processing::Error> for ApiError {
    fn from(err: wwr_lite_processing::Error) -> Self {
        use wwr_lite_processing::Error;
        match err {
            Error::Model(inner) => inner.into(),
            Error::MissingHostPayload(_) => ApiError::InvalidModel(err.to_string()),
            Error::UnknownHost(_) => ApiError::NotFound(err.to_string()),
            Error::InvalidNorthAngle(_) | Error::UnknownMode(_) | Error::UnknownFaceScope(_) => {
                ApiError::InvalidOptions(err.to_string())
            }
        }
    }
}

impl From<cacache::Error> for ApiError {
    fn from(err: cacache::Error) -> Self {
        ApiError::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Report session endpoints.
//!
//! A session keeps a loaded model on the server so that clients can change
//! north angle, units, mode or face scope without uploading it again.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::Value;
use uuid::Uuid;
use wwr_lite_processing::{HostKind, ModelSource, ReportOptions, ReportSession};

use crate::error::ApiError;
use crate::routes::report::{csv_response, extract_upload};
use crate::services::with_session;
use crate::types::{table_value, ModelSummary, ReportQuery, SessionResponse};
use crate::AppState;

fn snapshot(id: Uuid, session: &mut ReportSession) -> Result<SessionResponse, ApiError> {
    let table = table_value(session.table()?)?;
    Ok(SessionResponse {
        session_id: id,
        source: session.source().to_string(),
        model: ModelSummary::from(session.model()),
        options: *session.options(),
        table,
    })
}

/// Loads `source`, builds the first table and registers the session.
async fn open_session(
    state: &AppState,
    source: ModelSource,
    options: ReportOptions,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let label = source.label();
    let session = tokio::task::spawn_blocking(move || -> Result<ReportSession, ApiError> {
        let mut session = ReportSession::open(source)?;
        session.report(options)?;
        Ok(session)
    })
    .await??;

    let (id, handle) = state.sessions.insert(session).await?;
    tracing::debug!(session_id = %id, source = %label, "Initial report built");

    let response = with_session(handle, move |session| snapshot(id, session)).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/sessions - Open a session from an uploaded model.
pub async fn create_upload_session(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let mut upload = extract_upload(&mut multipart, &state.config).await?;
    let fields = std::mem::take(&mut upload.fields);
    let options = fields.or(query).resolve(state.config.base_options())?;
    open_session(&state, upload.into_source(), options).await
}

/// POST /api/v1/host/:kind/sessions - Open a session from a host plugin.
///
/// The body is the plugin message; its `hbjson` key holds the model.
pub async fn create_host_session(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let kind: HostKind = kind.parse()?;
    let options = query.resolve(state.config.base_options())?;
    open_session(&state, ModelSource::host(kind, payload), options).await
}

/// GET /api/v1/sessions/:id - Session table under the given options.
///
/// Options missing from the query keep the session's current values.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state.sessions.get(&id).await?;
    let response = with_session(handle, move |session| {
        let options = query.resolve(*session.options())?;
        session.set_options(options);
        snapshot(id, session)
    })
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/csv - Session table as a CSV attachment.
pub async fn get_session_csv(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    let handle = state.sessions.get(&id).await?;
    let csv = with_session(handle, move |session| {
        let options = query.resolve(*session.options())?;
        Ok(session.report(options)?.to_csv().into_bytes())
    })
    .await?;
    csv_response(csv)
}

/// DELETE /api/v1/sessions/:id - Close a session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

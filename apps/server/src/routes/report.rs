// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot report endpoints: upload a model, get its table back.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use wwr_lite_processing::{build_report, ModelSource, ReportOptions};

use crate::config::Config;
use crate::error::ApiError;
use crate::services::DiskCache;
use crate::types::{table_value, ReportQuery, ReportResponse, ReportStats};
use crate::AppState;

/// Name of the CSV attachment.
pub const CSV_FILE_NAME: &str = "file.csv";

/// Model file and option fields of a multipart request.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub fields: ReportQuery,
}

impl Upload {
    pub fn into_source(self) -> ModelSource {
        ModelSource::upload(self.file_name, self.bytes)
    }
}

/// Extract the `file` field and any option fields from a multipart request.
pub async fn extract_upload(
    multipart: &mut Multipart,
    config: &Config,
) -> Result<Upload, ApiError> {
    let mut file = None;
    let mut fields = ReportQuery::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let file_name = field.file_name().unwrap_or("model.hbjson").to_string();
            let bytes = field.bytes().await?;
            tracing::debug!(size = bytes.len(), file_name = %file_name, "Extracted file from multipart");
            file = Some((file_name, bytes.to_vec()));
        } else {
            let value = field.text().await?;
            if !fields.set_field(&field_name, value) {
                tracing::debug!(field_name = %field_name, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((file_name, bytes)) = file else {
        tracing::warn!("No 'file' field found in multipart request");
        return Err(ApiError::MissingFile);
    };

    if bytes.len() > config.max_file_size_bytes() {
        return Err(ApiError::FileTooLarge {
            max_mb: config.max_file_size_mb,
        });
    }

    Ok(Upload {
        file_name,
        bytes,
        fields,
    })
}

/// Reads the upload and resolves its options: multipart fields win over the
/// query string, which wins over the server defaults.
async fn read_request(
    state: &AppState,
    query: ReportQuery,
    multipart: &mut Multipart,
) -> Result<(Upload, ReportOptions), ApiError> {
    let mut upload = extract_upload(multipart, &state.config).await?;
    let fields = std::mem::take(&mut upload.fields);
    let options = fields.or(query).resolve(state.config.base_options())?;
    Ok((upload, options))
}

/// Loads the model and builds its table on the blocking pool.
async fn run_report(
    upload: Upload,
    options: ReportOptions,
    cache_key: String,
) -> Result<ReportResponse, ApiError> {
    tokio::task::spawn_blocking(move || -> Result<ReportResponse, ApiError> {
        let start = Instant::now();
        let model = upload.into_source().load()?;
        let load_time_ms = start.elapsed().as_millis() as u64;

        let report_start = Instant::now();
        let table = build_report(&model, &options)?;
        let report_time_ms = report_start.elapsed().as_millis() as u64;

        Ok(ReportResponse {
            cache_key,
            options,
            table: table_value(&table)?,
            stats: ReportStats {
                room_count: table.len(),
                face_count: model.face_count(),
                units: table.units(),
                load_time_ms,
                report_time_ms,
                from_cache: false,
            },
        })
    })
    .await?
}

/// Builds a `text/csv` attachment response.
pub fn csv_response(csv: Vec<u8>) -> Result<Response, ApiError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
        )
        .header(header::CONTENT_LENGTH, csv.len())
        .body(Body::from(csv))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// POST /api/v1/report - Upload a model and get its table as JSON.
pub async fn report_json(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    mut multipart: Multipart,
) -> Result<Json<ReportResponse>, ApiError> {
    let (upload, options) = read_request(&state, query, &mut multipart).await?;
    let cache_key = DiskCache::report_key(&upload.bytes, &options)?;

    if let Some(mut cached) = state.cache.get::<ReportResponse>(&cache_key).await? {
        tracing::info!(cache_key = %cache_key, "Cache HIT");
        cached.stats.from_cache = true;
        return Ok(Json(cached));
    }

    tracing::info!(
        cache_key = %cache_key,
        file_name = %upload.file_name,
        size = upload.bytes.len(),
        "Cache MISS - building report"
    );

    let response = run_report(upload, options, cache_key.clone()).await?;
    state.cache.set_in_background(cache_key, response.clone());

    Ok(Json(response))
}

/// POST /api/v1/report/csv - Upload a model and download its table as CSV.
pub async fn report_csv(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let (upload, options) = read_request(&state, query, &mut multipart).await?;
    let cache_key = format!("csv:{}", DiskCache::report_key(&upload.bytes, &options)?);

    if let Some(csv) = state.cache.get_bytes(&cache_key).await? {
        tracing::info!(cache_key = %cache_key, "Cache HIT");
        return csv_response(csv);
    }

    let csv = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let model = upload.into_source().load()?;
        let table = build_report(&model, &options)?;
        Ok(table.to_csv().into_bytes())
    })
    .await??;

    let cache = state.cache.clone();
    let cached = csv.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set_bytes(&cache_key, &cached).await {
            tracing::error!(error = %e, "Failed to cache CSV");
        }
    });

    csv_response(csv)
}

/// GET /api/v1/report/:key - Retrieve a cached report.
pub async fn get_cached(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    tracing::debug!(key = %key, "Cache lookup");

    // Only report digests are served here; other entries hold other formats
    if !DiskCache::is_report_key(&key) {
        return Err(ApiError::NotFound(format!("Cache key not found: {}", key)));
    }

    match state.cache.get::<ReportResponse>(&key).await? {
        Some(mut response) => {
            response.stats.from_cache = true;
            tracing::info!(key = %key, "Cache HIT");
            Ok(Json(response))
        }
        None => {
            tracing::debug!(key = %key, "Cache MISS");
            Err(ApiError::NotFound(format!("Cache key not found: {}", key)))
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WWR-Lite Server - window-to-wall ratio reports over HTTP.
//!
//! Clients upload an HBJSON model (or a Rhino/Revit plugin pushes one) and
//! receive one row per room with glazing ratios for the roof and eight
//! compass orientations, as JSON or as a `file.csv` download.
//!
//! # Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/report` - Upload a model, get the table as JSON
//! - `POST /api/v1/report/csv` - Upload a model, get the table as CSV
//! - `GET /api/v1/report/:key` - Retrieve a cached report
//! - `POST /api/v1/sessions` - Open a session from an upload
//! - `POST /api/v1/host/:kind/sessions` - Open a session from a host plugin
//! - `GET /api/v1/sessions/:id` - Session table (options via query string)
//! - `GET /api/v1/sessions/:id/csv` - Session table as CSV
//! - `DELETE /api/v1/sessions/:id` - Close a session

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;


use config::Config;
use services::{DiskCache, SessionStore};

/// Room left in the body limit for multipart framing and option fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<DiskCache>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub async fn new(config: Config) -> Self {
        let cache = Arc::new(DiskCache::new(&config.cache_dir).await);
        let sessions = Arc::new(SessionStore::new(
            config.max_sessions,
            config.session_ttl(),
        ));
        Self {
            cache,
            config: Arc::new(config),
            sessions,
        }
    }
}

/// Builds the router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_file_size_bytes() + MULTIPART_OVERHEAD;
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        // One-shot reports
        .route("/api/v1/report", post(routes::report::report_json))
        .route("/api/v1/report/csv", post(routes::report::report_csv))
        .route("/api/v1/report/:key", get(routes::report::get_cached))
        // Sessions
        .route("/api/v1/sessions", post(routes::sessions::create_upload_session))
        .route(
            "/api/v1/host/:kind/sessions",
            post(routes::sessions::create_host_session),
        )
        .route(
            "/api/v1/sessions/:id",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route("/api/v1/sessions/:id/csv", get(routes::sessions::get_session_csv))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Periodically drops idle sessions nobody comes back for.
fn spawn_session_sweeper(sessions: Arc<SessionStore>, ttl: Duration) {
    let period = ttl.clamp(Duration::from_secs(1), Duration::from_secs(60));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sessions.purge_expired().await;
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,tower_http=debug,wwr_lite_server=debug".into()),
        )
        .pretty()
        .init();

    let config = Config::from_env();

    tracing::info!(
        port = config.port,
        cache_dir = %config.cache_dir,
        max_file_size_mb = config.max_file_size_mb,
        max_sessions = config.max_sessions,
        session_ttl_secs = config.session_ttl_secs,
        default_north_angle = config.default_north_angle,
        "Starting WWR-Lite Server"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config).await;
    spawn_session_sweeper(state.sessions.clone(), state.config.session_ttl());
    let app = app(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use wwr_lite_processing::ReportOptions;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory for cache storage.
    pub cache_dir: String,
    /// Maximum upload size in MB.
    pub max_file_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum number of live report sessions.
    pub max_sessions: usize,
    /// Idle seconds after which a session is dropped.
    pub session_ttl_secs: u64,
    /// North angle used when a request does not give one.
    pub default_north_angle: f64,
}

/// Reads `key` from the environment, falling back to `default` when unset
/// or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: env_or("PORT", 8080),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| {
                // Docker images create /app/cache; local runs use ./.cache
                if std::path::Path::new("/.dockerenv").exists() {
                    "/app/cache".into()
                } else {
                    std::env::current_dir()
                        .ok()
                        .and_then(|dir| dir.join(".cache").to_str().map(|s| s.to_string()))
                        .unwrap_or_else(|| "./.cache".into())
                }
            }),
            max_file_size_mb: env_or("MAX_FILE_SIZE_MB", 100),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 60),
            max_sessions: env_or("MAX_SESSIONS", 256),
            session_ttl_secs: env_or("SESSION_TTL_SECS", 3600),
            default_north_angle: env_or("DEFAULT_NORTH_ANGLE", 0.0),
        }
    }

    /// Upload limit in bytes.
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Options a request starts from before its own fields apply.
    pub fn base_options(&self) -> ReportOptions {
        ReportOptions {
            north_angle: self.default_north_angle,
            ..ReportOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Disk-based report cache using cacache.

use crate::error::ApiError;
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use wwr_lite_processing::ReportOptions;

/// Content-addressable disk cache.
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Create a new cache in the specified directory.
    pub async fn new(cache_dir: &str) -> Self {
        let path = PathBuf::from(cache_dir);

        if let Err(e) = tokio::fs::create_dir_all(&path).await {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Failed to create cache directory"
            );
        }

        Self { cache_dir: path }
    }

    /// Cache key of a report: SHA-256 over the model bytes and the options
    /// that shape the table.
    pub fn report_key(data: &[u8], options: &ReportOptions) -> Result<String, ApiError> {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.update(serde_json::to_vec(options)?);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Whether `key` has the shape of a [`report_key`](Self::report_key):
    /// 64 lowercase or uppercase hex digits, nothing else.
    pub fn is_report_key(key: &str) -> bool {
        key.len() == 64 && key.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Get a cached value by key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match self.get_bytes(key).await? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Set a cached value.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ApiError> {
        let data = serde_json::to_vec(value)?;
        self.set_bytes(key, &data).await
    }

    /// Get raw bytes from cache (CSV exports).
    pub async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApiError> {
        match cacache::read(&self.cache_dir, key).await {
            Ok(data) => Ok(Some(data)),
            Err(cacache::Error::EntryNotFound(_, _)) => Ok(None),
            Err(e) => Err(ApiError::Cache(e.to_string())),
        }
    }

    /// Set raw bytes in cache.
    pub async fn set_bytes(&self, key: &str, data: &[u8]) -> Result<(), ApiError> {
        cacache::write(&self.cache_dir, key, data).await?;
        tracing::debug!(key = %key, size = data.len(), "Cached entry");
        Ok(())
    }

    /// Writes `value` in a background task; failures are only logged.
    pub fn set_in_background<T>(&self, key: String, value: T)
    where
        T: Serialize + Send + Sync + 'static,
    {
        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set(&key, &value).await {
                tracing::error!(error = %e, key = %key, "Failed to cache report");
            }
        });
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory store of live report sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;
use wwr_lite_processing::ReportSession;

use crate::error::ApiError;

/// Shared handle to one session. Report building is CPU work, so handlers
/// lock it inside `spawn_blocking`.
pub type SessionHandle = Arc<Mutex<ReportSession>>;

#[derive(Debug)]
struct Entry {
    handle: SessionHandle,
    last_access: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_access) >= ttl
    }
}

/// Sessions keyed by id, bounded by `max_sessions`.
///
/// A session idle for longer than `ttl` is dropped the next time the store
/// is written to or the session is looked up.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    max_sessions: usize,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            ttl,
        }
    }

    /// Registers a session and returns its id.
    pub async fn insert(&self, session: ReportSession) -> Result<(Uuid, SessionHandle), ApiError> {
        let mut sessions = self.sessions.write().await;
        self.evict_expired(&mut sessions);
        if sessions.len() >= self.max_sessions {
            return Err(ApiError::SessionLimit {
                max: self.max_sessions,
            });
        }

        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_access: Instant::now(),
            },
        );
        tracing::info!(session_id = %id, live = sessions.len(), "Session opened");
        Ok((id, handle))
    }

    /// Looks up a live session and marks it as used.
    pub async fn get(&self, id: &Uuid) -> Result<SessionHandle, ApiError> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let not_found = || ApiError::NotFound(format!("Session not found: {}", id));

        let entry = sessions.get_mut(id).ok_or_else(not_found)?;
        if !entry.is_expired(now, self.ttl) {
            entry.last_access = now;
            return Ok(entry.handle.clone());
        }

        sessions.remove(id);
        tracing::info!(session_id = %id, live = sessions.len(), "Session expired");
        Err(not_found())
    }

    /// Drops every session idle for longer than the TTL, returning how many.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_expired(&mut sessions)
    }

    fn evict_expired(&self, sessions: &mut HashMap<Uuid, Entry>) -> usize {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now, self.ttl));
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, live = sessions.len(), "Expired sessions dropped");
        }
        evicted
    }

    pub async fn remove(&self, id: &Uuid) -> Result<(), ApiError> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(id) {
            Some(_) => {
                tracing::info!(session_id = %id, live = sessions.len(), "Session closed");
                Ok(())
            }
            None => Err(ApiError::NotFound(format!("Session not found: {}", id))),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Runs `f` against the locked session on the blocking pool.
pub async fn with_session<T, F>(handle: SessionHandle, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut ReportSession) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut session = handle
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".to_string()))?;
        f(&mut session)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use wwr_lite_core::{Model, UnitSystem};

    fn empty_session() -> ReportSession {
        ReportSession::new(Model::new("m", UnitSystem::Meters, Vec::new()))
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn insert_get_remove() {
        let store = SessionStore::new(4, HOUR);
        let (id, _) = store.insert(empty_session()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.get(&id).await.is_ok());

        store.remove(&id).await.unwrap();
        assert!(matches!(store.get(&id).await, Err(ApiError::NotFound(_))));
        assert!(matches!(store.remove(&id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn limit_is_enforced() {
        let store = SessionStore::new(1, HOUR);
        store.insert(empty_session()).await.unwrap();
        let err = store.insert(empty_session()).await.unwrap_err();
        assert!(matches!(err, ApiError::SessionLimit { max: 1 }));
    }

    #[tokio::test]
    async fn expired_session_frees_its_slot() {
        let store = SessionStore::new(2, Duration::from_millis(400));
        let (stale, _) = store.insert(empty_session()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        let (fresh, _) = store.insert(empty_session()).await.unwrap();
        assert!(matches!(
            store.insert(empty_session()).await,
            Err(ApiError::SessionLimit { max: 2 })
        ));

        // only the first session has passed its TTL
        tokio::time::sleep(Duration::from_millis(300)).await;
        let (replacement, _) = store.insert(empty_session()).await.unwrap();
        assert_eq!(store.len().await, 2);
        assert!(matches!(store.get(&stale).await, Err(ApiError::NotFound(_))));
        assert!(store.get(&fresh).await.is_ok());
        assert!(store.get(&replacement).await.is_ok());
    }

    #[tokio::test]
    async fn get_refreshes_last_access() {
        let store = SessionStore::new(1, Duration::from_millis(300));
        let (id, _) = store.insert(empty_session()).await.unwrap();
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(150)).await;
            assert!(store.get(&id).await.is_ok());
        }

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(matches!(store.get(&id).await, Err(ApiError::NotFound(_))));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn purge_drops_only_idle_sessions() {
        let store = SessionStore::new(4, Duration::from_millis(200));
        store.insert(empty_session()).await.unwrap();
        store.insert(empty_session()).await.unwrap();
        assert_eq!(store.purge_expired().await, 0);

        tokio::time::sleep(Duration::from_millis(250)).await;
        let (live, _) = store.insert(empty_session()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.purge_expired().await, 0);
        assert!(store.get(&live).await.is_ok());
    }

    #[tokio::test]
    async fn with_session_builds_table() {
        let store = SessionStore::new(1, HOUR);
        let (_, handle) = store.insert(empty_session()).await.unwrap();
        let rows = with_session(handle.clone(), |s| Ok(s.table()?.len())).await.unwrap();
        assert_eq!(rows, 0);
        assert!(handle.lock().unwrap().is_cached());
    }
}

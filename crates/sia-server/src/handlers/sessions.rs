//! Session handlers and the in-memory session store
//!
//! A session holds one client's analysis context and chat history. Sessions
//! are keyed by an opaque id and dropped after 30 minutes of inactivity.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{AppError, AppState, SuccessResponse};
use sia_core::{AnalysisContext, ChatMessage, Section, Session};

/// Session timeout (30 minutes of inactivity)
const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Maximum messages kept in a session's history
pub const MAX_HISTORY_MESSAGES: usize = 50;

#[derive(Debug)]
struct StoredSession {
    session: Session,
    created_at: Instant,
    last_activity: Instant,
}

impl StoredSession {
    fn new() -> Self {
        Self {
            session: Session::new(),
            created_at: Instant::now(),
            last_activity: Instant::now(),
        }
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// In-memory session store
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, StoredSession>>,
    counter: AtomicU64,
    timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_timeout(SESSION_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
            timeout,
        }
    }

    /// Create a new session and return its ID
    pub async fn create(&self) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let nonce: [u8; 16] = rand::random();

        let mut hasher = Sha256::new();
        hasher.update(timestamp.to_le_bytes());
        hasher.update(sequence.to_le_bytes());
        hasher.update(nonce);
        let digest = hex::encode(hasher.finalize());
        let session_id = format!("sia_{}", &digest[..20]);

        let mut sessions = self.sessions.write().await;

        // Clean up expired sessions while we're here
        sessions.retain(|_, s| !s.is_expired(self.timeout));

        sessions.insert(session_id.clone(), StoredSession::new());
        session_id
    }

    /// Copy of a live session
    pub async fn snapshot(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|s| !s.is_expired(self.timeout))
            .map(|s| s.session.clone())
    }

    /// Apply `f` to a live session, then trim its history
    ///
    /// Returns None when the session does not exist or has expired.
    pub async fn update<T>(&self, session_id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().await;

        if sessions
            .get(session_id)
            .is_some_and(|s| s.is_expired(self.timeout))
        {
            sessions.remove(session_id);
            return None;
        }

        let stored = sessions.get_mut(session_id)?;
        let result = f(&mut stored.session);
        stored.session.trim_history(MAX_HISTORY_MESSAGES);
        stored.touch();
        Some(result)
    }

    /// Delete a session
    pub async fn delete(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).is_some()
    }

    /// Number of live sessions
    pub async fn count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions
            .values()
            .filter(|s| !s.is_expired(self.timeout))
            .count()
    }

    async fn info(&self, session_id: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .filter(|s| !s.is_expired(self.timeout))
            .map(|s| SessionInfo {
                session_id: session_id.to_string(),
                message_count: s.session.history.len(),
                available_sections: s.session.context.available_sections(),
                created_at_secs_ago: s.created_at.elapsed().as_secs(),
                last_activity_secs_ago: s.last_activity.elapsed().as_secs(),
            })
    }
}

/// Session info response
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub message_count: usize,
    pub available_sections: Vec<Section>,
    pub created_at_secs_ago: u64,
    pub last_activity_secs_ago: u64,
}

/// Full session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub context: AnalysisContext,
    pub available_sections: Vec<Section>,
    pub history: Vec<ChatMessage>,
}

pub(crate) fn session_not_found() -> AppError {
    AppError::not_found("Session not found or expired")
}

/// POST /api/sessions - Create a new session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionInfo>), AppError> {
    let session_id = state.sessions.create().await;
    info!(session_id = %session_id, "Created session");

    let info = state
        .sessions
        .info(&session_id)
        .await
        .ok_or_else(session_not_found)?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// GET /api/sessions/:id - Context and chat history
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state
        .sessions
        .snapshot(&id)
        .await
        .ok_or_else(session_not_found)?;

    Ok(Json(SessionResponse {
        session_id: id,
        available_sections: session.context.available_sections(),
        context: session.context,
        history: session.history,
    }))
}

/// DELETE /api/sessions/:id - Delete a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.sessions.delete(&id).await {
        return Err(session_not_found());
    }
    debug!(session_id = %id, "Deleted session");
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/sessions/:id/history - Clear the chat history, keep analyses
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .update(&id, Session::clear_history)
        .await
        .ok_or_else(session_not_found)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /api/sessions/:id/context - Drop every analysis section
pub async fn clear_context(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .sessions
        .update(&id, |session| session.context.clear())
        .await
        .ok_or_else(session_not_found)?;
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sia_core::Role;

    #[tokio::test]
    async fn test_create_unique_ids() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;

        assert_ne!(a, b);
        assert!(a.starts_with("sia_"));
        assert_eq!(a.len(), 24);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_ids_differ_across_stores() {
        // Two fresh stores share the same sequence number, so only the
        // random component keeps their ids apart.
        let first = SessionStore::new().create().await;
        let second = SessionStore::new().create().await;

        assert_ne!(first, second);
        assert!(second.starts_with("sia_"));
        assert!(second[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_update_trims_history() {
        let store = SessionStore::new();
        let id = store.create().await;

        for i in 0..(MAX_HISTORY_MESSAGES + 10) {
            store
                .update(&id, |s| {
                    s.history.push(ChatMessage::new(Role::User, format!("q{}", i)));
                })
                .await
                .unwrap();
        }

        let session = store.snapshot(&id).await.unwrap();
        assert_eq!(session.history.len(), MAX_HISTORY_MESSAGES);
        assert_eq!(session.history[0].content, "q10");
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        assert!(store.snapshot("sia_missing").await.is_none());
        assert!(store.update("sia_missing", |_| ()).await.is_none());
        assert!(!store.delete("sia_missing").await);
    }

    #[tokio::test]
    async fn test_expired_session_is_dropped() {
        let store = SessionStore::with_timeout(Duration::from_millis(10));
        let id = store.create().await;

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(store.snapshot(&id).await.is_none());
        assert_eq!(store.count().await, 0);
        assert!(store.update(&id, |_| ()).await.is_none());
        assert!(store.sessions.read().await.is_empty());
    }
}

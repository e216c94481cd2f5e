//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use sia_core::AIBackend;

/// Language model status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// A credential is configured
    pub ai_configured: bool,
    /// The model server answered its health check
    pub ai_healthy: bool,
    pub model: Option<String>,
    pub host: Option<String>,
    pub active_sessions: usize,
}

/// GET /api/health - Server and language model status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (ai_healthy, model, host) = match state.assistant.ai() {
        Some(client) => (
            client.health_check().await,
            Some(client.model().to_string()),
            Some(client.host().to_string()),
        ),
        None => (false, None, None),
    };

    Json(HealthResponse {
        status: "ok",
        ai_configured: model.is_some(),
        ai_healthy,
        model,
        host,
        active_sessions: state.sessions.count().await,
    })
}

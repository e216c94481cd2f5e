//! Chat handler - questions answered from the session's analyses
//!
//! The assistant runs on a snapshot of the context, outside the session lock.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sessions::{session_not_found, MAX_HISTORY_MESSAGES};
use crate::{AppError, AppState};
use sia_core::{ChatMessage, Role};

/// Maximum question length (characters)
const MAX_QUESTION_CHARS: usize = 2000;

/// Request body for POST /api/sessions/:id/chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

/// Assistant reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub processing_time_ms: u64,
    /// History length after this exchange
    pub message_count: usize,
}

/// POST /api/sessions/:id/chat - Ask the assistant
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::bad_request("question is required"));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(AppError::bad_request("question is too long"));
    }

    let snapshot = state
        .sessions
        .snapshot(&id)
        .await
        .ok_or_else(session_not_found)?;

    let start = Instant::now();
    let reply = state
        .assistant
        .respond(question, Some(&snapshot.context))
        .await;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    let message_count = state
        .sessions
        .update(&id, |session| {
            session.history.push(ChatMessage::new(Role::User, question));
            session.push_reply(reply.clone());
            session.history.len().min(MAX_HISTORY_MESSAGES)
        })
        .await
        .ok_or_else(session_not_found)?;

    debug!(session_id = %id, processing_time_ms, "Answered chat question");

    Ok(Json(ChatResponse {
        reply,
        processing_time_ms,
        message_count,
    }))
}

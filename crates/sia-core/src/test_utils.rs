//! Test utilities for sia-core
//!
//! This module provides a mock OpenAI-compatible chat server that can be
//! used for development and integration tests.

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::sync::oneshot;

/// Mock chat completions server
///
/// Replies `"<model>: <last user message>"` to every completion, or HTTP 500
/// when started with `start_failing`.
pub struct MockChatServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Clone, Copy)]
struct ServerMode {
    failing: bool,
}

impl MockChatServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(ServerMode { failing: false }).await
    }

    /// Start a server that answers every request with HTTP 500
    pub async fn start_failing() -> Self {
        Self::start_with(ServerMode { failing: true }).await
    }

    async fn start_with(mode: ServerMode) -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_completion))
            .with_state(mode);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockChatServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models(State(mode): State<ServerMode>) -> Response {
    if mode.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model server down").into_response();
    }
    Json(serde_json::json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
    .into_response()
}

async fn handle_completion(
    State(mode): State<ServerMode>,
    Json(request): Json<CompletionRequest>,
) -> Response {
    if mode.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model server down").into_response();
    }

    let question = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    Json(CompletionResponse {
        choices: vec![Choice {
            message: Message {
                role: "assistant".to_string(),
                content: format!("{}: {}", request.model, question),
            },
        }],
    })
    .into_response()
}

#[derive(Deserialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Serialize)]
struct Choice {
    message: Message,
}

//! Test utilities for obra-core
//!
//! A mock chat server speaking both the OpenAI-compatible and the Ollama chat
//! APIs, for integration tests of the advisory backends.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

#[derive(Clone)]
struct ServerState {
    reply: Option<String>,
    fail: bool,
}

/// Mock chat server for testing
pub struct MockChatServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockChatServer {
    /// Start a server that answers with `Advice for: <first user line>`
    pub async fn start() -> Self {
        Self::start_with(ServerState {
            reply: None,
            fail: false,
        })
        .await
    }

    /// Start a server that always answers with `reply`
    pub async fn start_with_reply(reply: &str) -> Self {
        Self::start_with(ServerState {
            reply: Some(reply.to_string()),
            fail: false,
        })
        .await
    }

    /// Start a server whose chat endpoints return HTTP 500
    pub async fn start_failing() -> Self {
        Self::start_with(ServerState {
            reply: None,
            fail: true,
        })
        .await
    }

    async fn start_with(state: ServerState) -> Self {
        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route("/api/tags", get(handle_tags))
            .route("/api/chat", post(handle_ollama_chat))
            .with_state(Arc::new(state));

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

#[derive(Debug, Deserialize)]
struct ChatBody {
    model: String,
    messages: Vec<MessageBody>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    role: String,
    content: String,
}

fn reply_for(state: &ServerState, body: &ChatBody) -> String {
    if let Some(ref reply) = state.reply {
        return reply.clone();
    }
    let user = body
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or("");
    let first_line = user.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    format!("Advice for: {}", first_line.trim())
}

async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}

async fn handle_chat_completions(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<ChatBody>,
) -> (StatusCode, Json<Value>) {
    if state.fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "mock failure"}})),
        );
    }
    let content = reply_for(&state, &body);
    (
        StatusCode::OK,
        Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": body.model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })),
    )
}

async fn handle_tags() -> Json<Value> {
    Json(json!({
        "models": [{"name": "llama3.2:latest", "modified_at": "2024-01-01T00:00:00Z", "size": 4000000000u64}]
    }))
}

async fn handle_ollama_chat(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<ChatBody>,
) -> (StatusCode, Json<Value>) {
    if state.fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "mock failure"})),
        );
    }
    let content = reply_for(&state, &body);
    (
        StatusCode::OK,
        Json(json!({
            "model": body.model,
            "created_at": "2024-01-01T00:00:00Z",
            "message": {"role": "assistant", "content": content},
            "done": true
        })),
    )
}

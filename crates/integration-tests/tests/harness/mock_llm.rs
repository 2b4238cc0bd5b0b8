//! Mock inference backend for integration tests
//!
//! Serves the OpenAI-compatible chat completions API (under both `/v1` and
//! the OpenRouter-style `/api/v1`) and the Ollama `/api/chat` API, replaying
//! a fixed list of text chunks.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

/// How the mock answers chat requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Stream every chunk and end normally
    Succeed,
    /// Answer with HTTP 500
    Fail,
    /// Send the first chunk, then break the connection
    Abort,
}

/// Mock backend that returns predictable responses
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    mode: Mode,
    chunks: Vec<String>,
    openai_requests: Mutex<Vec<serde_json::Value>>,
    ollama_requests: Mutex<Vec<serde_json::Value>>,
}

impl MockLlm {
    /// Start a mock that streams "He", "llo"
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_chunks(&["He", "llo"]).await
    }

    /// Start a mock streaming the given chunks
    pub async fn start_with_chunks(chunks: &[&str]) -> anyhow::Result<Self> {
        Self::start_inner(Mode::Succeed, chunks).await
    }

    /// Start a mock that fails every request with 500
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Fail, &[]).await
    }

    /// Start a mock that breaks the connection after the first chunk
    pub async fn start_aborting() -> anyhow::Result<Self> {
        Self::start_inner(Mode::Abort, &["He", "llo"]).await
    }

    async fn start_inner(mode: Mode, chunks: &[&str]) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            mode,
            chunks: chunks.iter().map(|&c| c.to_owned()).collect(),
            openai_requests: Mutex::new(Vec::new()),
            ollama_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_openai_chat))
            .route("/api/v1/chat/completions", routing::post(handle_openai_chat))
            .route("/api/chat", routing::post(handle_ollama_chat))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Server root, used for custom and Ollama base URLs
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// OpenRouter-style API base
    pub fn openrouter_base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Bodies of OpenAI-compatible requests received
    pub fn openai_requests(&self) -> Vec<serde_json::Value> {
        self.state.openai_requests.lock().unwrap().clone()
    }

    /// Bodies of Ollama requests received
    pub fn ollama_requests(&self) -> Vec<serde_json::Value> {
        self.state.ollama_requests.lock().unwrap().clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Handlers --

async fn handle_openai_chat(State(state): State<Arc<MockLlmState>>, Json(req): Json<serde_json::Value>) -> Response {
    state.openai_requests.lock().unwrap().push(req.clone());

    if state.mode == Mode::Fail {
        return failure();
    }

    let lines: Vec<String> = state
        .chunks
        .iter()
        .map(|chunk| {
            let payload = serde_json::json!({
                "id": "chatcmpl-mock",
                "object": "chat.completion.chunk",
                "choices": [{"index": 0, "delta": {"content": chunk}, "finish_reason": null}]
            });
            format!("data: {payload}\n\n")
        })
        .collect();

    if req["stream"] != true {
        return Json(serde_json::json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": state.chunks.concat()}}]
        }))
        .into_response();
    }

    let mut body = vec![": keep-alive\n\n".to_owned()];
    body.extend(lines);
    body.push("data: [DONE]\n\n".to_owned());

    stream_response(state.mode, body, "text/event-stream")
}

async fn handle_ollama_chat(State(state): State<Arc<MockLlmState>>, Json(req): Json<serde_json::Value>) -> Response {
    state.ollama_requests.lock().unwrap().push(req.clone());

    if state.mode == Mode::Fail {
        return failure();
    }

    if req["stream"] == false {
        return Json(serde_json::json!({
            "message": {"role": "assistant", "content": state.chunks.concat()},
            "done": true
        }))
        .into_response();
    }

    let mut body: Vec<String> = state
        .chunks
        .iter()
        .map(|chunk| {
            let line = serde_json::json!({"message": {"role": "assistant", "content": chunk}, "done": false});
            format!("{line}\n")
        })
        .collect();
    body.push(format!(
        "{}\n",
        serde_json::json!({"message": {"role": "assistant", "content": ""}, "done": true})
    ));

    stream_response(state.mode, body, "application/x-ndjson")
}

fn failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": {
                "message": "mock server intentional failure",
                "type": "server_error"
            }
        })),
    )
        .into_response()
}

/// Send `parts` as separate body chunks; in abort mode the connection breaks
/// after the first one that carries content
fn stream_response(mode: Mode, mut parts: Vec<String>, content_type: &'static str) -> Response {
    let items: Vec<Result<Bytes, std::io::Error>> = if mode == Mode::Abort {
        let keep = parts.iter().position(|p| !p.starts_with(':')).map_or(0, |i| i + 1);
        parts.truncate(keep);
        parts
            .into_iter()
            .map(|p| Ok(Bytes::from(p)))
            .chain(std::iter::once(Err(std::io::Error::other("mock connection reset"))))
            .collect()
    } else {
        parts.into_iter().map(|p| Ok(Bytes::from(p))).collect()
    };

    let body = futures_util::stream::iter(items).then(|item| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        item
    });

    Response::builder()
        .header("content-type", content_type)
        .body(Body::from_stream(body))
        .expect("valid response")
}

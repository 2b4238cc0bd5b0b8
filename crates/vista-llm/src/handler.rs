//! Axum route handlers for the guidance endpoints

use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use crate::error::LlmError;
use crate::state::LlmState;
use crate::translate::EventStream;
use crate::types::Message;

/// Endpoints served under `/api/`; the name labels timing logs
pub const ENDPOINTS: &[&str] = &["step", "help", "check", "coordinates"];

/// Body accepted by every guidance endpoint
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Conversation, system messages included
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Build the LLM router
pub fn llm_router(state: LlmState) -> Router {
    Router::new()
        .route("/api/{endpoint}", routing::post(chat))
        .with_state(state)
}

/// Handle `POST /api/{endpoint}`
async fn chat(State(state): State<LlmState>, Path(endpoint): Path<String>, Json(body): Json<ChatBody>) -> Response {
    if !ENDPOINTS.contains(&endpoint.as_str()) {
        return error_response(&LlmError::InvalidRequest(format!("unknown endpoint '{endpoint}'")));
    }

    match state.stream_chat(&body.messages, &endpoint) {
        Ok(stream) => event_stream_response(stream).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Wrap framed events in an event-stream response
///
/// A failure after the stream started becomes a final `error` event.
fn event_stream_response(stream: EventStream) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let events = stream.map(|result| match result {
        Ok(event) => Ok(Event::default().data(event.data())),
        Err(e) => {
            tracing::error!(error = %e, "stream failed after start");
            let error_data = serde_json::json!({
                "type": "error",
                "errorText": e.client_message(),
            });
            Ok(Event::default().data(error_data.to_string()))
        }
    });

    Sse::new(events)
}

/// Convert an LLM error to a JSON error response
fn error_response(error: &LlmError) -> Response {
    let status = error.status_code();
    let body = serde_json::json!({
        "error": {
            "message": error.client_message(),
            "type": error.error_type(),
        }
    });

    (status, Json(body)).into_response()
}

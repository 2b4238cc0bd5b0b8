//! Ollama native `/api/chat` wire format

use serde::{Deserialize, Serialize};

/// Chat request
#[derive(Debug, Clone, Serialize)]
pub struct OllamaRequest {
    /// Model name
    pub model: String,
    /// Conversation messages, system first
    pub messages: Vec<OllamaMessage>,
    /// Whether to stream newline-delimited chunks
    pub stream: bool,
}

/// Message within a request
#[derive(Debug, Clone, Serialize)]
pub struct OllamaMessage {
    /// Message role
    pub role: &'static str,
    /// Text content
    pub content: String,
    /// Base64-encoded images, without data URL prefix
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

/// One line of a streamed response, or the whole non-streaming response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaChunk {
    /// Generated message fragment
    #[serde(default)]
    pub message: Option<OllamaChunkMessage>,
    /// Set on the final chunk
    #[serde(default)]
    pub done: bool,
    /// Error reported in-band
    #[serde(default)]
    pub error: Option<String>,
}

/// Message fragment within a chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaChunkMessage {
    /// Text fragment
    #[serde(default)]
    pub content: String,
}

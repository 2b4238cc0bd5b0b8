//! OpenAI-compatible chat completion wire format
//!
//! Shared by OpenRouter and any custom backend exposing `/v1/chat/completions`.

use serde::{Deserialize, Serialize};

// -- Request types --

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages, system first
    pub messages: Vec<OpenAiMessage>,
    /// Whether to stream the response
    pub stream: bool,
}

/// Message within a request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiMessage {
    /// Message role
    pub role: &'static str,
    /// Plain text, or parts when images are attached
    pub content: OpenAiContent,
}

/// Content can be a string or an array of parts
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OpenAiContent {
    /// Plain text content
    Text(String),
    /// Text and image parts
    Parts(Vec<OpenAiContentPart>),
}

/// Individual content part
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpenAiContentPart {
    /// Text content
    Text {
        /// The text string
        text: String,
    },
    /// Image content via data URL
    ImageUrl {
        /// Inline image
        image_url: OpenAiImageUrl,
    },
}

/// Image reference sent inline as a data URL
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiImageUrl {
    /// `data:<mime>;base64,<payload>` URL
    pub url: String,
}

// -- Response types --

/// Non-streaming chat completion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
}

/// Choice within a response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiChoice {
    /// Generated message
    #[serde(default)]
    pub message: OpenAiChoiceMessage,
}

/// Message within a response choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiChoiceMessage {
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
}

// -- Streaming types --

/// One `data: ` payload of a streamed response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamChunk {
    /// Streamed choices; only the first one is consumed
    #[serde(default)]
    pub choices: Vec<OpenAiStreamChoice>,
    /// In-band error reported after the stream started
    #[serde(default)]
    pub error: Option<OpenAiError>,
}

/// Choice within a stream chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamChoice {
    /// Incremental delta
    #[serde(default)]
    pub delta: OpenAiStreamDelta,
}

/// Incremental content in a stream chunk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiStreamDelta {
    /// Text fragment
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object reported by the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiError {
    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

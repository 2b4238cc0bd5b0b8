use http::StatusCode;
use thiserror::Error;

/// Errors that abort an LLM call
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider configuration could not be built for this call
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Upstream provider was unreachable, timed out, or returned non-2xx
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Upstream stream broke or reported an error after it started
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Client sent a malformed or invalid request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl LlmError {
    /// HTTP status code for this error
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Streaming(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error type (e.g. `upstream_error`)
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::Upstream(_) => "upstream_error",
            Self::Streaming(_) => "streaming_error",
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Message safe to expose to API consumers
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}

/// Recoverable decoding failure for a single image part or stream line
///
/// Never aborts a call: the offending item is logged and skipped.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Image reference is not a `data:image/...` URL
    #[error("unsupported image reference")]
    UnsupportedImageUrl,

    /// Data URL has no `,` separating header from payload
    #[error("malformed data URL")]
    MalformedDataUrl,

    /// Payload is not valid base64
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not a recognisable image
    #[error("payload is not a recognisable image")]
    NotAnImage,

    /// Stream line is not valid JSON for the expected chunk shape
    #[error("malformed stream payload: {0}")]
    Json(#[from] serde_json::Error),
}

//! Provider trait, selection, and shared HTTP plumbing

pub mod ollama;
pub mod openai;

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt, TryStreamExt, stream};
use reqwest::{Client, RequestBuilder, Response};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;
use vista_config::ProviderConfig;

use self::ollama::OllamaProvider;
use self::openai::OpenAiProvider;
use crate::error::LlmError;
use crate::types::{Increment, NormalizedRequest};

/// Longest upstream line accepted before it is discarded
const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Ordered stream of canonical increments from one provider call
pub type IncrementStream = Pin<Box<dyn Stream<Item = Result<Increment, LlmError>> + Send>>;

/// Trait implemented by each inference backend
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Send a non-streaming request and return the full reply text
    async fn complete(&self, request: &NormalizedRequest) -> Result<String, LlmError>;

    /// Send a streaming request
    ///
    /// Resolves once the upstream has answered with a success status; the
    /// returned stream then yields increments as they arrive.
    async fn complete_stream(&self, request: &NormalizedRequest) -> Result<IncrementStream, LlmError>;
}

/// Closed set of supported backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// OpenRouter, selected by an API key
    OpenRouter,
    /// Custom OpenAI-compatible backend, selected by a base URL
    Custom,
    /// Local Ollama server, the fallback
    Ollama,
}

impl ProviderKind {
    /// Pick the backend for a call
    ///
    /// OpenRouter wins when its key is set, then the custom backend when its
    /// base URL is set, otherwise local Ollama.
    pub const fn select(config: &ProviderConfig) -> Self {
        if config.openrouter.api_key.is_some() {
            Self::OpenRouter
        } else if config.custom.base_url.is_some() {
            Self::Custom
        } else {
            Self::Ollama
        }
    }

    /// Stable name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::Custom => "custom",
            Self::Ollama => "ollama",
        }
    }

    /// Model sent upstream for a call carrying `hint`
    pub fn resolve_model(self, config: &ProviderConfig, hint: Option<&str>) -> String {
        match self {
            Self::OpenRouter => config.openrouter.resolve_model(hint),
            Self::Custom => config.custom.resolve_model(hint),
            Self::Ollama => config.ollama.resolve_model(hint),
        }
    }

    /// System prompt used when the caller supplies none
    pub fn default_system_prompt(self, config: &ProviderConfig) -> Option<&str> {
        match self {
            Self::Ollama => Some(config.ollama.system_prompt.as_str()),
            Self::OpenRouter | Self::Custom => None,
        }
    }

    /// Construct the adapter for this backend
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the backend's settings are incomplete
    pub fn build(self, client: Client, config: &ProviderConfig) -> Result<Box<dyn Provider>, LlmError> {
        let provider: Box<dyn Provider> = match self {
            Self::OpenRouter => Box::new(OpenAiProvider::openrouter(client, &config.openrouter, config.timeout)),
            Self::Custom => Box::new(OpenAiProvider::custom(client, &config.custom, config.timeout)?),
            Self::Ollama => Box::new(OllamaProvider::new(client, &config.ollama, config.timeout)),
        };
        Ok(provider)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Send a request, bounding the wait for the response head by `timeout`
///
/// Connection failures, timeouts, and non-2xx statuses all map to
/// `LlmError::Upstream`.
pub(crate) async fn send_request(provider: &str, builder: RequestBuilder, timeout: Duration) -> Result<Response, LlmError> {
    let response = match tokio::time::timeout(timeout, builder.send()).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::error!(provider = %provider, error = %e, "upstream request failed");
            return Err(LlmError::Upstream(e.to_string()));
        }
        Err(_) => {
            tracing::error!(provider = %provider, timeout = ?timeout, "upstream request timed out");
            return Err(LlmError::Upstream(format!("no response within {timeout:?}")));
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(provider = %provider, status = %status, "upstream returned error");
        return Err(LlmError::Upstream(format!("provider returned {status}: {body}")));
    }

    Ok(response)
}

/// Split a streaming response body into lines and decode each one
pub(crate) fn decode_lines<F>(response: Response, decode: F) -> IncrementStream
where
    F: Fn(&str) -> Result<Vec<Increment>, LlmError> + Send + 'static,
{
    let increments = response_lines(response)
        .map(move |line| match line.and_then(|line| decode(&line)) {
            Ok(increments) => increments.into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        })
        .flat_map(stream::iter);

    Box::pin(increments)
}

fn response_lines(response: Response) -> impl Stream<Item = Result<String, LlmError>> + Send {
    let body = StreamReader::new(response.bytes_stream().map_err(std::io::Error::other));

    FramedRead::new(body, LinesCodec::new_with_max_length(MAX_LINE_LENGTH)).filter_map(|line| async move {
        match line {
            Ok(line) => Some(Ok(line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                tracing::debug!(max = MAX_LINE_LENGTH, "skipping oversized stream line");
                None
            }
            Err(LinesCodecError::Io(e)) => {
                tracing::error!(error = %e, "upstream stream broke");
                Some(Err(LlmError::Streaming(e.to_string())))
            }
        }
    })
}

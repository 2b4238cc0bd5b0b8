//! Local Ollama provider using the native `/api/chat` endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use vista_config::OllamaSettings;

use super::{IncrementStream, Provider, decode_lines, send_request};
use crate::convert::ollama::{build_request, ndjson_line_to_increments, response_text};
use crate::error::LlmError;
use crate::protocol::ollama::OllamaChunk;
use crate::types::NormalizedRequest;

/// Ollama chat provider
pub struct OllamaProvider {
    client: Client,
    chat_url: String,
    timeout: Duration,
}

impl OllamaProvider {
    /// Create from Ollama settings
    pub fn new(client: Client, settings: &OllamaSettings, timeout: Duration) -> Self {
        let base = settings.base_url.as_str().trim_end_matches('/');
        Self {
            client,
            chat_url: format!("{base}/api/chat"),
            timeout,
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &NormalizedRequest) -> Result<String, LlmError> {
        let builder = self
            .client
            .post(&self.chat_url)
            .json(&build_request(request, false))
            .timeout(self.timeout);

        let response = send_request(self.name(), builder, self.timeout).await?;

        let chunk: OllamaChunk = response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("failed to parse response: {e}")))?;

        response_text(chunk)
    }

    async fn complete_stream(&self, request: &NormalizedRequest) -> Result<IncrementStream, LlmError> {
        let builder = self.client.post(&self.chat_url).json(&build_request(request, true));

        let response = send_request(self.name(), builder, self.timeout).await?;

        Ok(decode_lines(response, ndjson_line_to_increments))
    }
}

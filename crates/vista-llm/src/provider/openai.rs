//! OpenAI-compatible provider, used for OpenRouter and custom backends

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use vista_config::{CustomSettings, OpenRouterSettings};

use super::{IncrementStream, Provider, decode_lines, send_request};
use crate::convert::openai::{build_request, response_text, sse_line_to_increments};
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse};
use crate::types::NormalizedRequest;

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    name: &'static str,
    client: Client,
    api_base: String,
    api_key: Option<SecretString>,
    headers: HeaderMap,
    timeout: Duration,
}

impl OpenAiProvider {
    /// OpenRouter, with its attribution headers
    pub fn openrouter(client: Client, settings: &OpenRouterSettings, timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "http-referer", settings.referer.as_deref());
        insert_header(&mut headers, "x-title", settings.title.as_deref());

        Self {
            name: "openrouter",
            client,
            api_base: settings.base_url.as_str().trim_end_matches('/').to_owned(),
            api_key: settings.api_key.clone(),
            headers,
            timeout,
        }
    }

    /// Custom backend at `<base>/v1`
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if no base URL is configured
    pub fn custom(client: Client, settings: &CustomSettings, timeout: Duration) -> Result<Self, LlmError> {
        let api_base = settings
            .api_base()
            .ok_or_else(|| LlmError::Configuration("custom backend has no base URL".to_owned()))?;

        Ok(Self {
            name: "custom",
            client,
            api_base,
            api_key: settings.api_key.clone(),
            headers: HeaderMap::new(),
            timeout,
        })
    }

    /// Build the chat completions URL
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn post(&self, body: &OpenAiRequest) -> RequestBuilder {
        let builder = self
            .client
            .post(self.completions_url())
            .headers(self.headers.clone())
            .json(body);

        match &self.api_key {
            Some(key) => builder.bearer_auth(key.expose_secret()),
            None => builder,
        }
    }
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: Option<&str>) {
    let Some(value) = value else { return };
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(name), value);
        }
        Err(e) => tracing::warn!(header = name, error = %e, "ignoring invalid attribution header"),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn complete(&self, request: &NormalizedRequest) -> Result<String, LlmError> {
        let wire_request = build_request(request, false);
        let builder = self.post(&wire_request).timeout(self.timeout);

        let response = send_request(self.name, builder, self.timeout).await?;

        let wire_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Upstream(format!("failed to parse response: {e}")))?;

        Ok(response_text(wire_response))
    }

    async fn complete_stream(&self, request: &NormalizedRequest) -> Result<IncrementStream, LlmError> {
        let wire_request = build_request(request, true);

        let response = send_request(self.name, self.post(&wire_request), self.timeout).await?;

        Ok(decode_lines(response, sse_line_to_increments))
    }
}

//! Shared gateway state and per-call orchestration

use std::sync::Arc;

use futures_util::{TryStreamExt, stream};
use reqwest::Client;
use vista_config::{LlmConfig, ProviderConfig};

use crate::error::LlmError;
use crate::normalize::normalize;
use crate::provider::{Provider, ProviderKind};
use crate::translate::{EventStream, translate};
use crate::types::{Message, NormalizedRequest};

/// Produces the provider configuration for a call
pub trait ProviderConfigSource: Send + Sync {
    /// Read the configuration; called once at the start of every call
    fn load(&self) -> anyhow::Result<ProviderConfig>;
}

/// Reads the process environment on top of file defaults
#[derive(Debug, Clone)]
pub struct EnvSource {
    defaults: LlmConfig,
}

impl EnvSource {
    /// Create from file defaults
    pub const fn new(defaults: LlmConfig) -> Self {
        Self { defaults }
    }
}

impl ProviderConfigSource for EnvSource {
    fn load(&self) -> anyhow::Result<ProviderConfig> {
        ProviderConfig::from_env(&self.defaults)
    }
}

impl ProviderConfigSource for ProviderConfig {
    fn load(&self) -> anyhow::Result<ProviderConfig> {
        Ok(self.clone())
    }
}

/// Shared state for LLM route handlers
#[derive(Clone)]
pub struct LlmState {
    inner: Arc<LlmStateInner>,
}

struct LlmStateInner {
    client: Client,
    source: Arc<dyn ProviderConfigSource>,
    model_hint: String,
}

/// A provider bound to a normalized request, ready to dispatch
struct PreparedCall {
    kind: ProviderKind,
    provider: Box<dyn Provider>,
    request: NormalizedRequest,
}

impl LlmState {
    /// State reading provider settings from the environment on every call
    pub fn new(config: &LlmConfig) -> Self {
        Self::with_source(config, Arc::new(EnvSource::new(config.clone())))
    }

    /// State with an explicit configuration source
    pub fn with_source(config: &LlmConfig, source: Arc<dyn ProviderConfigSource>) -> Self {
        Self {
            inner: Arc::new(LlmStateInner {
                client: Client::new(),
                source,
                model_hint: config.model_hint.clone(),
            }),
        }
    }

    /// Model hint attached to every call
    pub fn model_hint(&self) -> &str {
        &self.inner.model_hint
    }

    /// Provider the next call would be routed to
    pub fn selected_provider(&self) -> Result<ProviderKind, LlmError> {
        Ok(ProviderKind::select(&self.load_config()?))
    }

    fn load_config(&self) -> Result<ProviderConfig, LlmError> {
        self.inner.source.load().map_err(|e| {
            tracing::error!(error = %e, "failed to read provider configuration");
            LlmError::Configuration(e.to_string())
        })
    }

    fn prepare(&self, messages: &[Message]) -> Result<PreparedCall, LlmError> {
        let config = self.load_config()?;
        let kind = ProviderKind::select(&config);

        let model = kind.resolve_model(&config, Some(self.inner.model_hint.as_str()));
        let mut request = normalize(messages, model);
        if request.system_prompt.is_none() {
            request.system_prompt = kind.default_system_prompt(&config).map(str::to_owned);
        }

        let provider = kind.build(self.inner.client.clone(), &config)?;

        Ok(PreparedCall { kind, provider, request })
    }

    /// Stream a chat reply as framed events
    ///
    /// Only configuration errors are returned here. `start` is ready before
    /// the provider is contacted, so upstream failures arrive inside the
    /// stream as its last item.
    pub fn stream_chat(&self, messages: &[Message], endpoint: &str) -> Result<EventStream, LlmError> {
        let call = self.prepare(messages)?;

        tracing::info!(
            endpoint = %endpoint,
            provider = %call.kind,
            model = %call.request.model,
            turns = call.request.turns.len(),
            images = call.request.turns.iter().map(|turn| turn.images.len()).sum::<usize>(),
            "dispatching streaming chat"
        );

        let PreparedCall { provider, request, .. } = call;
        let increments = stream::once(async move { provider.complete_stream(&request).await }).try_flatten();

        Ok(translate(Box::pin(increments), endpoint))
    }

    /// Complete a chat without streaming
    pub async fn complete_chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        let call = self.prepare(messages)?;

        tracing::info!(
            provider = %call.kind,
            model = %call.request.model,
            "dispatching chat"
        );

        call.provider.complete(&call.request).await
    }
}

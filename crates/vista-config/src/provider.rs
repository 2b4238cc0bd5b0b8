//! Per-call provider configuration
//!
//! Built fresh at the start of every call so that environment changes take
//! effect on the next request without a restart.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::llm::LlmConfig;

/// Credential selecting OpenRouter
pub const OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";
/// Model override for OpenRouter
pub const OPENROUTER_MODEL: &str = "OPENROUTER_MODEL";
/// Base URL selecting the custom OpenAI-compatible backend
pub const CUSTOM_API_BASE_URL: &str = "CUSTOM_API_BASE_URL";
/// Optional bearer credential for the custom backend
pub const CUSTOM_API_KEY: &str = "CUSTOM_API_KEY";
/// Model override for the custom backend
pub const CUSTOM_MODEL: &str = "CUSTOM_MODEL";
/// Ollama server address override
pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
/// Ollama model override
pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";

/// Immutable provider configuration for a single call
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// OpenRouter settings
    pub openrouter: OpenRouterSettings,
    /// Custom OpenAI-compatible backend settings
    pub custom: CustomSettings,
    /// Local Ollama settings
    pub ollama: OllamaSettings,
    /// Bound on connecting and receiving the initial response
    pub timeout: Duration,
}

/// OpenRouter settings
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    /// API key; its presence selects OpenRouter
    pub api_key: Option<SecretString>,
    /// API base URL
    pub base_url: Url,
    /// Model name
    pub model: String,
    /// `HTTP-Referer` attribution header
    pub referer: Option<String>,
    /// `X-Title` attribution header
    pub title: Option<String>,
}

/// Custom OpenAI-compatible backend settings
#[derive(Debug, Clone)]
pub struct CustomSettings {
    /// Server base URL; its presence selects this backend
    pub base_url: Option<Url>,
    /// Optional bearer credential
    pub api_key: Option<SecretString>,
    /// Explicit model override
    pub model: Option<String>,
    /// Model used when neither override nor hint is present
    pub fallback_model: String,
}

/// Local Ollama settings
#[derive(Debug, Clone)]
pub struct OllamaSettings {
    /// Ollama server address
    pub base_url: Url,
    /// Model used when the call carries no hint
    pub model: String,
    /// Default system prompt
    pub system_prompt: String,
}

impl ProviderConfig {
    /// Build from the process environment on top of file defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a URL variable cannot be parsed or the configured
    /// timeout is invalid
    pub fn from_env(defaults: &LlmConfig) -> anyhow::Result<Self> {
        Self::from_lookup(defaults, |name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup on top of file defaults
    ///
    /// Empty or whitespace-only values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL variable cannot be parsed or the configured
    /// timeout is invalid
    pub fn from_lookup<F>(defaults: &LlmConfig, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let custom_base_url = var(CUSTOM_API_BASE_URL).map(|v| parse_url(CUSTOM_API_BASE_URL, &v)).transpose()?;
        let ollama_base_url = match var(OLLAMA_BASE_URL) {
            Some(value) => parse_url(OLLAMA_BASE_URL, &value)?,
            None => defaults.ollama.base_url.clone(),
        };

        Ok(Self {
            openrouter: OpenRouterSettings {
                api_key: var(OPENROUTER_API_KEY).map(SecretString::from),
                base_url: defaults.openrouter.base_url.clone(),
                model: var(OPENROUTER_MODEL).unwrap_or_else(|| defaults.openrouter.model.clone()),
                referer: defaults.openrouter.referer.clone(),
                title: defaults.openrouter.title.clone(),
            },
            custom: CustomSettings {
                base_url: custom_base_url,
                api_key: var(CUSTOM_API_KEY).map(SecretString::from),
                model: var(CUSTOM_MODEL),
                fallback_model: defaults.custom.model.clone(),
            },
            ollama: OllamaSettings {
                base_url: ollama_base_url,
                model: var(OLLAMA_MODEL).unwrap_or_else(|| defaults.ollama.model.clone()),
                system_prompt: defaults.ollama.system_prompt.clone(),
            },
            timeout: defaults.timeout_duration()?,
        })
    }
}

impl OpenRouterSettings {
    /// OpenRouter always uses its configured model; the call hint is ignored
    pub fn resolve_model(&self, _hint: Option<&str>) -> String {
        self.model.clone()
    }
}

impl CustomSettings {
    /// Explicit override, then the call hint, then the fallback
    pub fn resolve_model(&self, hint: Option<&str>) -> String {
        self.model
            .as_deref()
            .or(hint)
            .unwrap_or(&self.fallback_model)
            .to_owned()
    }

    /// API base with the `/v1` prefix the backend expects
    pub fn api_base(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|url| format!("{}/v1", url.as_str().trim_end_matches('/')))
    }
}

impl OllamaSettings {
    /// The call hint wins over the configured model
    pub fn resolve_model(&self, hint: Option<&str>) -> String {
        hint.unwrap_or(&self.model).to_owned()
    }
}

fn parse_url(name: &str, value: &str) -> anyhow::Result<Url> {
    Url::parse(value.trim()).map_err(|e| anyhow::anyhow!("invalid {name} '{value}': {e}"))
}

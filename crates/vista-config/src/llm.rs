use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// System prompt sent to the local provider when the caller supplies none
pub const DEFAULT_LOCAL_SYSTEM_PROMPT: &str = "You are a local screen-vision assistant. You can see the user's screen \
     image and read UI elements. Guide the user step by step based on what is visible.";

/// File-level defaults for inference providers
///
/// Environment variables read at call time take precedence over these
/// values (see [`crate::ProviderConfig`]).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Upper bound on connecting and receiving the initial response (e.g. "60s")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Model name passed along with every call as a hint
    #[serde(default = "default_model_hint")]
    pub model_hint: String,
    /// OpenRouter defaults
    #[serde(default)]
    pub openrouter: OpenRouterDefaults,
    /// Custom OpenAI-compatible backend defaults
    #[serde(default)]
    pub custom: CustomDefaults,
    /// Local Ollama defaults
    #[serde(default)]
    pub ollama: OllamaDefaults,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            model_hint: default_model_hint(),
            openrouter: OpenRouterDefaults::default(),
            custom: CustomDefaults::default(),
            ollama: OllamaDefaults::default(),
        }
    }
}

impl LlmConfig {
    /// Parsed provider timeout
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` is not a valid duration string
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.timeout).map_err(|e| anyhow::anyhow!("invalid llm.timeout '{}': {e}", self.timeout))
    }
}

/// OpenRouter defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenRouterDefaults {
    /// API base, `/chat/completions` is appended
    #[serde(default = "default_openrouter_base_url")]
    pub base_url: Url,
    /// Model used when `OPENROUTER_MODEL` is unset
    #[serde(default = "default_openrouter_model")]
    pub model: String,
    /// Value of the `HTTP-Referer` attribution header
    #[serde(default)]
    pub referer: Option<String>,
    /// Value of the `X-Title` attribution header
    #[serde(default = "default_openrouter_title")]
    pub title: Option<String>,
}

impl Default for OpenRouterDefaults {
    fn default() -> Self {
        Self {
            base_url: default_openrouter_base_url(),
            model: default_openrouter_model(),
            referer: None,
            title: default_openrouter_title(),
        }
    }
}

/// Custom backend defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomDefaults {
    /// Model used when neither `CUSTOM_MODEL` nor a hint is present
    #[serde(default = "default_model_hint")]
    pub model: String,
}

impl Default for CustomDefaults {
    fn default() -> Self {
        Self {
            model: default_model_hint(),
        }
    }
}

/// Local Ollama defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaDefaults {
    /// Ollama server address
    #[serde(default = "default_ollama_base_url")]
    pub base_url: Url,
    /// Model used when `OLLAMA_MODEL` is unset and no hint is given
    #[serde(default = "default_model_hint")]
    pub model: String,
    /// System prompt used when the caller sends none
    #[serde(default = "default_local_system_prompt")]
    pub system_prompt: String,
}

impl Default for OllamaDefaults {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_model_hint(),
            system_prompt: default_local_system_prompt(),
        }
    }
}

fn default_timeout() -> String {
    "60s".to_owned()
}

fn default_model_hint() -> String {
    "qwen3-vl".to_owned()
}

fn default_openrouter_base_url() -> Url {
    Url::parse("https://openrouter.ai/api/v1").expect("valid default URL")
}

fn default_openrouter_model() -> String {
    "qwen/qwen3-vl-30b-a3b-instruct".to_owned()
}

#[allow(clippy::unnecessary_wraps)]
fn default_openrouter_title() -> Option<String> {
    Some("Vista".to_owned())
}

fn default_ollama_base_url() -> Url {
    Url::parse("http://localhost:11434").expect("valid default URL")
}

fn default_local_system_prompt() -> String {
    DEFAULT_LOCAL_SYSTEM_PROMPT.to_owned()
}

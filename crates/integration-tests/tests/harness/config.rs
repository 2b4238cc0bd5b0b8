//! Programmatic configuration builder for integration tests

use std::collections::HashMap;
use std::net::SocketAddr;

use vista_config::{Config, CorsConfig, HealthConfig, ProviderConfig, ServerConfig};

use super::mock_llm::MockLlm;

/// Address nothing listens on, so unconfigured providers fail fast
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
    vars: HashMap<&'static str, String>,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        let mut config = Config {
            server: ServerConfig {
                listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                health: HealthConfig {
                    enabled: true,
                    ..HealthConfig::default()
                },
                ..ServerConfig::default()
            },
            ..Config::default()
        };
        config.llm.timeout = "5s".to_owned();
        config.llm.ollama.base_url = UNREACHABLE.parse().expect("valid URL");

        Self {
            config,
            vars: HashMap::new(),
        }
    }

    /// Route to OpenRouter, pointed at a mock backend
    pub fn with_openrouter(mut self, mock: &MockLlm) -> Self {
        self.config.llm.openrouter.base_url = mock.openrouter_base_url().parse().expect("valid URL");
        self.vars.insert("OPENROUTER_API_KEY", "sk-or-test".to_owned());
        self
    }

    /// Configure a custom OpenAI-compatible backend at a mock
    pub fn with_custom(mut self, mock: &MockLlm) -> Self {
        self.vars.insert("CUSTOM_API_BASE_URL", mock.base_url());
        self
    }

    /// Point the local provider at a mock
    pub fn with_ollama(mut self, mock: &MockLlm) -> Self {
        self.config.llm.ollama.base_url = mock.base_url().parse().expect("valid URL");
        self
    }

    /// Set an environment-style provider variable
    pub fn with_var(mut self, name: &'static str, value: &str) -> Self {
        self.vars.insert(name, value.to_owned());
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config and the provider settings every call will see
    pub fn build(self) -> (Config, ProviderConfig) {
        let vars = self.vars;
        let providers = ProviderConfig::from_lookup(&self.config.llm, |name| vars.get(name).cloned())
            .expect("valid provider settings");
        (self.config, providers)
    }
}

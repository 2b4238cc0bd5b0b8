#![allow(clippy::must_use_candidate)]

pub mod cors;
pub mod health;
pub mod llm;
mod loader;
pub mod provider;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use cors::*;
pub use health::*;
pub use llm::*;
pub use provider::*;
pub use server::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level Vista configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Inference provider defaults
    #[serde(default)]
    pub llm: LlmConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

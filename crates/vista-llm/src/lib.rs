//! Provider abstraction and stream translation for Vista
//!
//! Normalizes chat messages, routes them to OpenRouter, a custom
//! OpenAI-compatible backend, or a local Ollama server, and re-emits the
//! reply as a provider-agnostic event stream.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
#[cfg(feature = "http")]
pub mod handler;
pub mod normalize;
pub mod protocol;
pub mod provider;
pub mod state;
pub mod translate;
pub mod types;

pub use error::{DecodeError, LlmError};
#[cfg(feature = "http")]
pub use handler::llm_router;
pub use normalize::{decode_image_url, normalize};
pub use provider::{IncrementStream, Provider, ProviderKind};
pub use state::{EnvSource, LlmState, ProviderConfigSource};
pub use translate::{EventStream, StreamTranslator, TranslatorState, translate};
pub use types::{FramedEvent, Increment, Message, NormalizedRequest};

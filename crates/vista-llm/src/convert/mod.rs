//! Conversion between the normalized request and provider wire formats
//!
//! Each submodule builds a provider's request payload and turns its response
//! lines into canonical [`Increment`](crate::types::Increment)s.

pub mod ollama;
pub mod openai;

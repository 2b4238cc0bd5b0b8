//! Wire format types for provider-specific API protocols
//!
//! Each module contains plain serde structs matching the respective
//! provider's JSON format. They are only used at the HTTP boundary.

pub mod ollama;
pub mod openai;

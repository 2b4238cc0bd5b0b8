//! Conversion between internal types and the Ollama wire format

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{DecodeError, LlmError};
use crate::protocol::ollama::{OllamaChunk, OllamaMessage, OllamaRequest};
use crate::types::{Increment, NormalizedRequest};

/// Build the wire request; images travel as a side list of base64 strings
pub fn build_request(request: &NormalizedRequest, stream: bool) -> OllamaRequest {
    let system = request.system_prompt.iter().map(|prompt| OllamaMessage {
        role: "system",
        content: prompt.clone(),
        images: Vec::new(),
    });

    let turns = request.turns.iter().map(|turn| OllamaMessage {
        role: turn.role.as_str(),
        content: turn.text.clone(),
        images: turn.images.iter().map(|image| STANDARD.encode(&image.bytes)).collect(),
    });

    OllamaRequest {
        model: request.model.clone(),
        messages: system.chain(turns).collect(),
        stream,
    }
}

/// Text of a non-streaming response
///
/// # Errors
///
/// Returns `LlmError::Upstream` if the response carries an error
pub fn response_text(response: OllamaChunk) -> Result<String, LlmError> {
    if let Some(error) = response.error {
        return Err(LlmError::Upstream(format!("provider reported error: {error}")));
    }
    Ok(response.message.map(|message| message.content).unwrap_or_default())
}

/// Convert one newline-delimited JSON line into increments
///
/// A line may carry a final fragment and the end marker together. Blank and
/// malformed lines yield nothing.
///
/// # Errors
///
/// Returns `LlmError::Streaming` if the line carries an in-band error
pub fn ndjson_line_to_increments(line: &str) -> Result<Vec<Increment>, LlmError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let chunk = match serde_json::from_str::<OllamaChunk>(line).map_err(DecodeError::from) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::debug!(error = %e, line = %line, "skipping unparseable stream line");
            return Ok(Vec::new());
        }
    };

    if let Some(error) = chunk.error {
        return Err(LlmError::Streaming(format!("provider reported error: {error}")));
    }

    let mut increments = Vec::with_capacity(2);
    if let Some(message) = chunk.message
        && !message.content.is_empty()
    {
        increments.push(Increment::TextDelta(message.content));
    }
    if chunk.done {
        increments.push(Increment::End);
    }

    Ok(increments)
}

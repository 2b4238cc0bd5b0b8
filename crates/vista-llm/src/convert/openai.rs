//! Conversion between internal types and the OpenAI-compatible wire format

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{DecodeError, LlmError};
use crate::protocol::openai::{
    OpenAiContent, OpenAiContentPart, OpenAiImageUrl, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiStreamChunk,
};
use crate::types::{Increment, NormalizedRequest, Turn};

/// Prefix marking a payload line in an event stream
const DATA_PREFIX: &str = "data: ";

/// Terminal payload sent by OpenAI-compatible servers
const DONE_SENTINEL: &str = "[DONE]";

// -- Outbound: internal types -> wire format --

/// Build the wire request; the system prompt becomes the leading message
pub fn build_request(request: &NormalizedRequest, stream: bool) -> OpenAiRequest {
    let system = request.system_prompt.iter().map(|prompt| OpenAiMessage {
        role: "system",
        content: OpenAiContent::Text(prompt.clone()),
    });

    OpenAiRequest {
        model: request.model.clone(),
        messages: system.chain(request.turns.iter().map(turn_to_message)).collect(),
        stream,
    }
}

fn turn_to_message(turn: &Turn) -> OpenAiMessage {
    if turn.images.is_empty() {
        return OpenAiMessage {
            role: turn.role.as_str(),
            content: OpenAiContent::Text(turn.text.clone()),
        };
    }

    let mut parts = Vec::with_capacity(turn.images.len() + 1);
    if !turn.text.is_empty() {
        parts.push(OpenAiContentPart::Text { text: turn.text.clone() });
    }
    parts.extend(turn.images.iter().map(|image| OpenAiContentPart::ImageUrl {
        image_url: OpenAiImageUrl {
            url: format!("data:{};base64,{}", image.mime_type, STANDARD.encode(&image.bytes)),
        },
    }));

    OpenAiMessage {
        role: turn.role.as_str(),
        content: OpenAiContent::Parts(parts),
    }
}

// -- Inbound: wire format -> internal types --

/// Text of the first choice of a non-streaming response
pub fn response_text(response: OpenAiResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default()
}

/// Convert one line of an event stream into increments
///
/// Lines without the `data: ` prefix and malformed payloads yield nothing.
///
/// # Errors
///
/// Returns `LlmError::Streaming` if the payload carries an in-band error
pub fn sse_line_to_increments(line: &str) -> Result<Vec<Increment>, LlmError> {
    let Some(data) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(Vec::new());
    };
    let data = data.trim();

    if data == DONE_SENTINEL {
        return Ok(vec![Increment::End]);
    }

    let chunk = match serde_json::from_str::<OpenAiStreamChunk>(data).map_err(DecodeError::from) {
        Ok(chunk) => chunk,
        Err(e) => {
            tracing::debug!(error = %e, data = %data, "skipping unparseable stream chunk");
            return Ok(Vec::new());
        }
    };

    if let Some(error) = chunk.error {
        return Err(LlmError::Streaming(format!("provider reported error: {}", error.message)));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
        .map(Increment::TextDelta)
        .into_iter()
        .collect())
}

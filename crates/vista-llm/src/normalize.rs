//! Conversion from inbound messages to a provider-agnostic request
//!
//! System messages are hoisted into a single prompt, every other role is
//! folded into `user` or `assistant`, and data-URL images are decoded to raw
//! bytes. Undecodable images are logged and dropped; they never fail a call.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::DecodeError;
use crate::types::{Content, ContentPart, ImageData, Message, NormalizedRequest, Role, Turn, TurnRole};

/// Normalize an inbound message list for dispatch to `model`
pub fn normalize(messages: &[Message], model: impl Into<String>) -> NormalizedRequest {
    let mut system_texts = Vec::new();
    let mut turns = Vec::with_capacity(messages.len());

    for message in messages {
        let role = match message.role {
            Role::System => {
                system_texts.push(message.content.joined_text());
                continue;
            }
            Role::User => TurnRole::User,
            Role::Assistant | Role::Other => TurnRole::Assistant,
        };

        turns.push(normalize_turn(role, &message.content));
    }

    NormalizedRequest {
        model: model.into(),
        system_prompt: (!system_texts.is_empty()).then(|| system_texts.join(" ")),
        turns,
    }
}

fn normalize_turn(role: TurnRole, content: &Content) -> Turn {
    let parts = match content {
        Content::Text(text) => {
            return Turn {
                role,
                text: text.clone(),
                images: Vec::new(),
            };
        }
        Content::Parts(parts) => parts,
    };

    let mut texts = Vec::new();
    let mut images = Vec::new();

    for part in parts {
        match part {
            ContentPart::Text { text } => texts.push(text.as_str()),
            ContentPart::ImageUrl { image_url } => match decode_image_url(&image_url.url) {
                Ok(image) => images.push(image),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable image part");
                }
            },
            ContentPart::Unsupported => {
                tracing::debug!("ignoring unsupported content part");
            }
        }
    }

    Turn {
        role,
        text: texts.join(" "),
        images,
    }
}

/// Decode a `data:image/<type>;base64,<payload>` URL into raw bytes
///
/// # Errors
///
/// Returns a [`DecodeError`] if the URL is not an image data URL, the payload
/// is not valid base64, or the bytes are not a recognisable image
pub fn decode_image_url(url: &str) -> Result<ImageData, DecodeError> {
    let rest = url.strip_prefix("data:").ok_or(DecodeError::UnsupportedImageUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(DecodeError::MalformedDataUrl)?;

    let mime_type = header.split(';').next().unwrap_or_default().trim();
    if !mime_type.starts_with("image/") {
        return Err(DecodeError::UnsupportedImageUrl);
    }

    let bytes = STANDARD.decode(payload.trim())?;
    if !infer::is_image(&bytes) {
        return Err(DecodeError::NotAnImage);
    }

    Ok(ImageData {
        mime_type: mime_type.to_owned(),
        bytes,
    })
}

/// Role of a turn after normalization; `system` is hoisted out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnRole {
    /// User turn
    User,
    /// Assistant turn
    Assistant,
}

impl TurnRole {
    /// Wire name shared by all providers
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Decoded image attached to a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Declared MIME type (e.g. `image/png`)
    pub mime_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

/// One conversation turn in provider-agnostic form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Author of the turn
    pub role: TurnRole,
    /// Text content; parts are joined with a single space
    pub text: String,
    /// Images in encounter order
    pub images: Vec<ImageData>,
}

/// Request shaped for dispatch to any provider adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    /// Model identifier sent upstream
    pub model: String,
    /// Concatenated system instruction, if any
    pub system_prompt: Option<String>,
    /// Conversation turns; never contains a system turn
    pub turns: Vec<Turn>,
}

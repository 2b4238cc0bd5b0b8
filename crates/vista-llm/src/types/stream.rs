use serde::Serialize;
use serde_json::{Map, Value};

/// Canonical unit of streamed provider output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Increment {
    /// Incremental text content
    TextDelta(String),
    /// Upstream reported the end of the response
    End,
}

/// Provider-agnostic event sent to the client
///
/// Every variant except [`FramedEvent::Done`] serializes to a single-line
/// JSON object; `Done` is the literal `[DONE]` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FramedEvent {
    /// Opens the response
    Start {
        /// Unique message identifier
        #[serde(rename = "messageId")]
        message_id: String,
    },
    /// Opens the text span
    TextStart {
        /// Text stream identifier
        id: String,
    },
    /// Incremental text
    TextDelta {
        /// Text stream identifier
        id: String,
        /// Text fragment
        delta: String,
    },
    /// Closes the text span
    TextEnd {
        /// Text stream identifier
        id: String,
    },
    /// Closes the response
    Finish {
        /// Optional response metadata
        #[serde(rename = "messageMetadata", skip_serializing_if = "Option::is_none")]
        message_metadata: Option<Map<String, Value>>,
    },
    /// Terminal sentinel
    #[serde(skip)]
    Done,
}

impl FramedEvent {
    /// Payload carried after the `data: ` prefix
    pub fn data(&self) -> String {
        match self {
            Self::Done => "[DONE]".to_owned(),
            event => serde_json::to_string(event).unwrap_or_default(),
        }
    }

    /// Full event-stream frame: `data: <payload>` followed by a blank line
    pub fn to_sse_frame(&self) -> String {
        format!("data: {}\n\n", self.data())
    }

    /// Whether this is the terminal sentinel
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_shapes() {
        let start = FramedEvent::Start {
            message_id: "msg-1".to_owned(),
        };
        assert_eq!(start.data(), r#"{"type":"start","messageId":"msg-1"}"#);

        let text_start = FramedEvent::TextStart { id: "text-1".to_owned() };
        assert_eq!(text_start.data(), r#"{"type":"text-start","id":"text-1"}"#);

        let delta = FramedEvent::TextDelta {
            id: "text-1".to_owned(),
            delta: "He said \"hi\"".to_owned(),
        };
        assert_eq!(
            delta.data(),
            r#"{"type":"text-delta","id":"text-1","delta":"He said \"hi\""}"#
        );

        let text_end = FramedEvent::TextEnd { id: "text-1".to_owned() };
        assert_eq!(text_end.data(), r#"{"type":"text-end","id":"text-1"}"#);
    }

    #[test]
    fn finish_omits_absent_metadata() {
        let finish = FramedEvent::Finish { message_metadata: None };
        assert_eq!(finish.data(), r#"{"type":"finish"}"#);

        let Value::Object(metadata) = json!({"model": "qwen3-vl"}) else {
            unreachable!()
        };
        let finish = FramedEvent::Finish {
            message_metadata: Some(metadata),
        };
        assert_eq!(
            finish.data(),
            r#"{"type":"finish","messageMetadata":{"model":"qwen3-vl"}}"#
        );
    }

    #[test]
    fn done_frame() {
        assert_eq!(FramedEvent::Done.to_sse_frame(), "data: [DONE]\n\n");
        assert!(FramedEvent::Done.is_done());
    }
}

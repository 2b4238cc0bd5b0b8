//! Translation of canonical increments into framed client events
//!
//! Every call produces exactly one `start`, brackets its text deltas with a
//! single `text-start`/`text-end` pair, and closes with `finish` followed by
//! the `[DONE]` sentinel. If the source fails, the error is forwarded and the
//! stream ends without the closing events.

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Instant;

use futures_util::{Stream, StreamExt, stream};

use crate::error::LlmError;
use crate::types::{FramedEvent, Increment};

/// Identifier of the single text span in a response
pub const TEXT_ID: &str = "text-1";

/// Framed events for one call
pub type EventStream = Pin<Box<dyn Stream<Item = Result<FramedEvent, LlmError>> + Send>>;

/// Position of a translator within a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorState {
    /// Nothing emitted yet
    NotStarted,
    /// `start` emitted, no text yet
    AwaitingText,
    /// Inside the text span
    InText,
    /// Closed, by completion or failure
    Finished,
}

/// Per-call state machine producing framed events
#[derive(Debug)]
pub struct StreamTranslator {
    state: TranslatorState,
    label: String,
    message_id: String,
    started_at: Instant,
}

impl StreamTranslator {
    /// Create a translator; `label` tags timing logs
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: TranslatorState::NotStarted,
            label: label.into(),
            message_id: format!("msg-{}", uuid::Uuid::new_v4().simple()),
            started_at: Instant::now(),
        }
    }

    /// Current state
    pub const fn state(&self) -> TranslatorState {
        self.state
    }

    /// Identifier carried by the `start` event
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Emit `start` and begin timing
    pub fn begin(&mut self) -> Vec<FramedEvent> {
        if self.state != TranslatorState::NotStarted {
            tracing::warn!(endpoint = %self.label, state = ?self.state, "translator already started");
            return Vec::new();
        }

        self.state = TranslatorState::AwaitingText;
        self.started_at = Instant::now();

        vec![FramedEvent::Start {
            message_id: self.message_id.clone(),
        }]
    }

    /// Feed one increment, returning the events it produces
    pub fn push(&mut self, increment: Increment) -> Vec<FramedEvent> {
        let mut events = match self.state {
            TranslatorState::NotStarted => self.begin(),
            TranslatorState::Finished => {
                tracing::warn!(endpoint = %self.label, "ignoring increment after stream finished");
                return Vec::new();
            }
            TranslatorState::AwaitingText | TranslatorState::InText => Vec::new(),
        };

        match increment {
            Increment::TextDelta(delta) => {
                if self.state == TranslatorState::AwaitingText {
                    tracing::info!(
                        endpoint = %self.label,
                        elapsed = ?self.started_at.elapsed(),
                        "first chunk received"
                    );
                    self.state = TranslatorState::InText;
                    events.push(FramedEvent::TextStart { id: TEXT_ID.to_owned() });
                }
                events.push(FramedEvent::TextDelta {
                    id: TEXT_ID.to_owned(),
                    delta,
                });
            }
            Increment::End => {
                if self.state == TranslatorState::InText {
                    events.push(FramedEvent::TextEnd { id: TEXT_ID.to_owned() });
                }
                events.push(FramedEvent::Finish { message_metadata: None });
                events.push(FramedEvent::Done);
                self.state = TranslatorState::Finished;
                tracing::info!(endpoint = %self.label, total = ?self.started_at.elapsed(), "stream finished");
            }
        }

        events
    }

    /// Close after a source failure; nothing further is emitted
    pub fn abort(&mut self) {
        tracing::warn!(
            endpoint = %self.label,
            state = ?self.state,
            elapsed = ?self.started_at.elapsed(),
            "stream aborted"
        );
        self.state = TranslatorState::Finished;
    }
}

struct Translation<S> {
    source: Option<S>,
    translator: StreamTranslator,
    pending: VecDeque<FramedEvent>,
}

/// Frame an increment stream; `start` is ready before the source is polled
///
/// Source exhaustion counts as `End`. The source is dropped as soon as the
/// stream finishes or fails.
pub fn translate<S>(source: S, label: impl Into<String>) -> EventStream
where
    S: Stream<Item = Result<Increment, LlmError>> + Send + Unpin + 'static,
{
    let mut translator = StreamTranslator::new(label);
    let pending = VecDeque::from(translator.begin());

    let state = Translation {
        source: Some(source),
        translator,
        pending,
    };

    Box::pin(stream::unfold(state, |mut t| async move {
        loop {
            if let Some(event) = t.pending.pop_front() {
                return Some((Ok(event), t));
            }

            let next = t.source.as_mut()?.next().await;
            match next {
                Some(Ok(increment)) => {
                    let events = t.translator.push(increment);
                    t.pending.extend(events);
                    if t.translator.state() == TranslatorState::Finished {
                        t.source = None;
                    }
                }
                Some(Err(e)) => {
                    t.translator.abort();
                    t.source = None;
                    return Some((Err(e), t));
                }
                None => {
                    let events = t.translator.push(Increment::End);
                    t.pending.extend(events);
                    t.source = None;
                }
            }
        }
    }))
}

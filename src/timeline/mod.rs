//! Conversation timeline
//!
//! The timeline is the ordered, append-only log of user and assistant
//! messages. Messages are immutable once appended; there is no edit,
//! remove, or reorder surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Assistant,
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: String,

    /// Message text (may be empty when a transcription failed).
    pub content: String,

    /// Originating side.
    pub sender: MessageSender,

    /// When the message was appended.
    pub created_at: DateTime<Utc>,

    /// Playback reference for synthesized speech.
    ///
    /// Attached only after synthesis succeeded, so it is never a broken
    /// reference.
    pub audio_ref: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender: MessageSender::User,
            created_at: Utc::now(),
            audio_ref: None,
        }
    }

    pub fn assistant(content: impl Into<String>, audio_ref: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender: MessageSender::Assistant,
            created_at: Utc::now(),
            audio_ref,
        }
    }
}

/// Ordered, append-only sequence of messages.
///
/// Insertion order is conversation order. Owned exclusively by the
/// orchestrator; rendering collaborators get read-only snapshots.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    messages: Vec<Message>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. This is the only mutation the timeline supports.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

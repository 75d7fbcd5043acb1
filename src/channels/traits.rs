//! Chat Transport Definitions
//!
//! The four things the router needs from a messaging platform: inbound text
//! events, sending a message (optionally with a keyboard), getting a handle
//! back, and editing a sent message by that handle.

use async_trait::async_trait;
use std::fmt;

/// Error types for transport operations
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Edit failed: {0}")]
    EditFailed(String),
}

/// Stable identifier of one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub i64);

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Platform handle of a sent message, used for later edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub i32);

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound text event
#[derive(Debug, Clone)]
pub struct InboundText {
    pub conversation_id: ConversationId,
    pub sender_id: i64,
    pub text: String,
}

impl InboundText {
    pub fn new(conversation_id: ConversationId, sender_id: i64, text: impl Into<String>) -> Self {
        Self {
            conversation_id,
            sender_id,
            text: text.into(),
        }
    }
}

/// Rows of labelled buttons; pressing one sends its label back as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<&str>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// All button captions, row by row
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// Outbound side of a messaging platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a new message, optionally replacing the reply keyboard
    async fn send(
        &self,
        conversation: ConversationId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageHandle, ChannelError>;

    /// Replace the text of a previously sent message
    async fn edit(
        &self,
        conversation: ConversationId,
        message: MessageHandle,
        text: &str,
    ) -> Result<(), ChannelError>;
}

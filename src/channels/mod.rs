//! Messaging channel abstraction
//!
//! The router talks to a `ChatTransport`; Telegram is the production
//! implementation (see `crate::telegram`).

pub mod traits;

pub use traits::{
    ChannelError, ChatTransport, ConversationId, InboundText, Keyboard, MessageHandle,
};

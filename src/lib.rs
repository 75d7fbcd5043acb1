//! University Q&A Telegram bot
//!
//! Answers applicant and student questions in Kazakh, Russian or English.
//!
//! # Features
//!
//! - **Menu**: reply-keyboard topics and `/start`, `/help`, `/reset`, `/language`
//! - **Templates**: curated trigger/answer pairs matched by substring
//! - **Generative fallback**: Gemini, grounded on the knowledge corpus
//! - **Placeholder reply**: "thinking" message edited once with the result
//!
//! # Architecture
//!
//! ```text
//! Telegram ──► Dispatcher ──► ConversationRouter ──► MenuDispatcher
//!  (polling)                        │
//!                                   ├── SessionStore (language, context)
//!                                   ├── AnswerResolver
//!                                   │     ├── matcher (templates)
//!                                   │     └── AnswerGenerator (Gemini)
//!                                   └── ChatTransport (send / edit)
//! ```

pub mod channels;
pub mod config;
pub mod gemini;
pub mod knowledge;
pub mod locale;
pub mod matcher;
pub mod menu;
pub mod prompt;
pub mod resolver;
pub mod router;
pub mod session;
pub mod telegram;
pub mod telegram_ui;

#[cfg(test)]
mod telegram_tests;

pub use channels::{ChannelError, ChatTransport, ConversationId, InboundText, Keyboard, MessageHandle};
pub use config::{Config, ConfigError};
pub use gemini::{AnswerGenerator, GeminiClient, GenerationError};
pub use knowledge::{KnowledgeEntry, KnowledgeError, KnowledgeStore, SourceFile};
pub use locale::Language;
pub use menu::{MenuAction, MenuDispatcher, MenuReply};
pub use prompt::PromptContext;
pub use resolver::{Answer, AnswerResolver, AnswerSource, FailureKind, ResolutionFailed};
pub use router::{ConversationRouter, RouteOutcome};
pub use session::{CachedSessionStore, InMemorySessionStore, Session, SessionStore};

//! Session Registry
//!
//! Per-conversation state: selected language and an opaque context slot.
//! The slot can be written and cleared but the router never reads it back
//! into a prompt; every question is answered single-turn.
//!
//! All methods are synchronous. Callers must never hold a session across an
//! await point, so interleaved tasks cannot lose each other's updates.

use moka::sync::Cache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::channels::ConversationId;
use crate::locale::Language;

/// State kept for one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub language: Language,
    pub context: Option<String>,
}

/// Session storage abstraction, swappable without touching the router
pub trait SessionStore: Send + Sync {
    /// Stored language, or the store's default when the conversation is unknown
    fn language(&self, id: ConversationId) -> Language;

    /// Upsert the conversation's language
    fn set_language(&self, id: ConversationId, language: Language);

    /// Store an opaque context blob
    fn set_context(&self, id: ConversationId, context: String);

    /// Drop the context blob; no-op when there is none
    fn clear_context(&self, id: ConversationId);

    /// Snapshot of the stored session, if any
    fn session(&self, id: ConversationId) -> Option<Session>;
}

/// Unbounded in-process map
pub struct InMemorySessionStore {
    default_language: Language,
    sessions: RwLock<HashMap<ConversationId, Session>>,
}

impl InMemorySessionStore {
    pub fn new(default_language: Language) -> Self {
        Self {
            default_language,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    fn fresh(&self) -> Session {
        Session {
            language: self.default_language,
            context: None,
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl SessionStore for InMemorySessionStore {
    fn language(&self, id: ConversationId) -> Language {
        self.sessions
            .read()
            .get(&id)
            .map(|s| s.language)
            .unwrap_or(self.default_language)
    }

    fn set_language(&self, id: ConversationId, language: Language) {
        let mut sessions = self.sessions.write();
        let fresh = self.fresh();
        sessions.entry(id).or_insert(fresh).language = language;
        debug!("Session {}: language set to {}", id, language);
    }

    fn set_context(&self, id: ConversationId, context: String) {
        let mut sessions = self.sessions.write();
        let fresh = self.fresh();
        sessions.entry(id).or_insert(fresh).context = Some(context);
    }

    fn clear_context(&self, id: ConversationId) {
        if let Some(session) = self.sessions.write().get_mut(&id) {
            session.context = None;
        }
        debug!("Session {}: context cleared", id);
    }

    fn session(&self, id: ConversationId) -> Option<Session> {
        self.sessions.read().get(&id).cloned()
    }
}

/// Bounded store backed by a moka cache; idle sessions are evicted and fall
/// back to defaults on their next message.
pub struct CachedSessionStore {
    default_language: Language,
    cache: Cache<ConversationId, Session>,
}

impl CachedSessionStore {
    pub fn new(default_language: Language, max_sessions: u64, idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();

        Self {
            default_language,
            cache,
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn current(&self, id: ConversationId) -> Session {
        self.cache.get(&id).unwrap_or_else(|| Session {
            language: self.default_language,
            context: None,
        })
    }
}

impl SessionStore for CachedSessionStore {
    fn language(&self, id: ConversationId) -> Language {
        self.cache
            .get(&id)
            .map(|s| s.language)
            .unwrap_or(self.default_language)
    }

    fn set_language(&self, id: ConversationId, language: Language) {
        let mut session = self.current(id);
        session.language = language;
        self.cache.insert(id, session);
        debug!("Session {}: language set to {}", id, language);
    }

    fn set_context(&self, id: ConversationId, context: String) {
        let mut session = self.current(id);
        session.context = Some(context);
        self.cache.insert(id, session);
    }

    fn clear_context(&self, id: ConversationId) {
        if let Some(mut session) = self.cache.get(&id) {
            if session.context.take().is_some() {
                self.cache.insert(id, session);
            }
        }
        debug!("Session {}: context cleared", id);
    }

    fn session(&self, id: ConversationId) -> Option<Session> {
        self.cache.get(&id)
    }
}

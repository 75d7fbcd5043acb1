//! Conversation Router
//!
//! Per inbound text: menu dispatch, or placeholder → resolve → one edit.
//!
//! ```text
//! RECEIVED ──► DISPATCHING ──► DONE                       (menu / command)
//!                   │
//!                   └──► AWAITING_ANSWER ──► FINALIZING ──► DONE
//!                        (placeholder sent)  (placeholder edited)
//! ```
//!
//! Every placeholder is edited exactly once, to the answer or to the
//! localized apology. A failed placeholder send is returned to the caller
//! without retry.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::channels::{ChannelError, ChatTransport, ConversationId, InboundText, MessageHandle};
use crate::menu::MenuDispatcher;
use crate::resolver::{AnswerResolver, AnswerSource, FailureKind};
use crate::session::SessionStore;

/// How an inbound event was finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Handled by the menu dispatcher
    Menu,
    /// Placeholder replaced with an answer
    Answered(AnswerSource),
    /// Placeholder replaced with the apology
    Failed(FailureKind),
}

/// A sent placeholder waiting for its single edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    pub conversation_id: ConversationId,
    pub message: MessageHandle,
    /// Per-conversation request number; increases while requests overlap and
    /// restarts once the conversation has nothing in flight
    pub sequence: u64,
}

pub struct ConversationRouter {
    sessions: Arc<dyn SessionStore>,
    menu: MenuDispatcher,
    resolver: AnswerResolver,
    transport: Arc<dyn ChatTransport>,
    /// Requests awaiting their edit, per conversation; entries are removed
    /// once nothing is in flight
    in_flight: Mutex<HashMap<ConversationId, InFlight>>,
}

#[derive(Debug, Default)]
struct InFlight {
    latest: u64,
    pending: usize,
}

impl ConversationRouter {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        resolver: AnswerResolver,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            menu: MenuDispatcher::new(Arc::clone(&sessions)),
            sessions,
            resolver,
            transport,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one inbound text event
    pub async fn handle(&self, event: InboundText) -> Result<RouteOutcome, ChannelError> {
        let conversation = event.conversation_id;
        let language = self.sessions.language(conversation);

        info!(
            ">>> Question: chat={}, user={}, lang={}, text={:?}",
            conversation,
            event.sender_id,
            language,
            event.text.chars().take(80).collect::<String>()
        );

        if let Some(reply) = self.menu.try_dispatch(conversation, &event.text, language) {
            self.transport
                .send(conversation, &reply.text, reply.keyboard.as_ref())
                .await?;
            return Ok(RouteOutcome::Menu);
        }

        let placeholder = self
            .transport
            .send(conversation, language.locale().thinking, None)
            .await?;
        let pending = PendingReply {
            conversation_id: conversation,
            message: placeholder,
            sequence: self.begin(conversation),
        };
        debug!(
            "Placeholder {} sent to {} (seq {})",
            pending.message, conversation, pending.sequence
        );

        let started = Instant::now();
        let (text, outcome) = match self.resolver.resolve(&event.text, language).await {
            Ok(answer) => (answer.text, RouteOutcome::Answered(answer.source)),
            Err(failure) => {
                warn!("Resolution failed for chat {}: {}", conversation, failure);
                (
                    failure.language.locale().error.to_string(),
                    RouteOutcome::Failed(failure.kind),
                )
            }
        };

        self.finalize(pending, &text).await?;
        info!(
            "<<< Reply to chat={} in {:?}: {:?}",
            conversation,
            started.elapsed(),
            outcome
        );
        Ok(outcome)
    }

    /// Edit the placeholder; older requests still get their edit so no
    /// placeholder is left hanging
    async fn finalize(&self, pending: PendingReply, text: &str) -> Result<(), ChannelError> {
        if self.complete(&pending) {
            debug!(
                "Finalizing stale placeholder {} in {} (seq {})",
                pending.message, pending.conversation_id, pending.sequence
            );
        }
        self.transport
            .edit(pending.conversation_id, pending.message, text)
            .await
    }

    /// Number of conversations with a placeholder still awaiting its edit
    pub fn in_flight_conversations(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn begin(&self, conversation: ConversationId) -> u64 {
        let mut in_flight = self.in_flight.lock();
        let entry = in_flight.entry(conversation).or_default();
        entry.latest += 1;
        entry.pending += 1;
        entry.latest
    }

    /// Release the request's slot; true when a newer request started meanwhile
    fn complete(&self, pending: &PendingReply) -> bool {
        let mut in_flight = self.in_flight.lock();
        let Some(entry) = in_flight.get_mut(&pending.conversation_id) else {
            return false;
        };
        let stale = entry.latest > pending.sequence;
        entry.pending = entry.pending.saturating_sub(1);
        if entry.pending == 0 {
            in_flight.remove(&pending.conversation_id);
        }
        stale
    }
}

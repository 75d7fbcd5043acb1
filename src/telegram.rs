//! Telegram Bot integration
//!
//! Long-polling dispatcher feeding text messages into the conversation
//! router, and the teloxide-backed `ChatTransport` the router replies
//! through.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    types::{MessageId, Update},
    utils::command::BotCommands,
};

use crate::channels::{
    ChannelError, ChatTransport, ConversationId, InboundText, Keyboard, MessageHandle,
};
use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::knowledge::KnowledgeStore;
use crate::resolver::AnswerResolver;
use crate::router::ConversationRouter;
use crate::session::{CachedSessionStore, InMemorySessionStore, SessionStore};
use crate::telegram_ui::{reply_keyboard, split_message, MAX_MESSAGE_CHARS};

/// Commands shown in Telegram's command menu
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Командалар / Команды / Commands:")]
enum Command {
    #[command(description = "басты мәзір / главное меню / main menu")]
    Start,
    #[command(description = "көмек / помощь / help")]
    Help,
    #[command(description = "диалогты қайта бастау / начать заново / reset dialog")]
    Reset,
    #[command(description = "тілді таңдау / выбор языка / choose language")]
    Language,
}

/// `ChatTransport` over the Telegram Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(
        &self,
        conversation: ConversationId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageHandle, ChannelError> {
        let mut request = self.bot.send_message(ChatId(conversation.0), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(reply_keyboard(keyboard));
        }

        let sent = request
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()))?;
        Ok(MessageHandle(sent.id.0))
    }

    /// Edits the message with the first chunk; anything past Telegram's
    /// length limit follows as new messages
    async fn edit(
        &self,
        conversation: ConversationId,
        message: MessageHandle,
        text: &str,
    ) -> Result<(), ChannelError> {
        let chat_id = ChatId(conversation.0);
        let mut chunks = split_message(text, MAX_MESSAGE_CHARS).into_iter();
        let first = chunks.next().unwrap_or("(no response)");

        self.bot
            .edit_message_text(chat_id, MessageId(message.0), first)
            .await
            .map_err(|e| ChannelError::EditFailed(e.to_string()))?;

        for chunk in chunks {
            self.bot
                .send_message(chat_id, chunk)
                .await
                .map_err(|e| ChannelError::SendFailed(e.to_string()))?;
        }
        Ok(())
    }
}

/// Session store selected by configuration
fn session_store(config: &Config) -> Arc<dyn SessionStore> {
    match config.session_cache {
        Some(cache) => {
            tracing::info!(
                "Session store: bounded ({} sessions, idle {:?})",
                cache.capacity,
                cache.idle
            );
            Arc::new(CachedSessionStore::new(
                config.default_language,
                cache.capacity,
                cache.idle,
            ))
        }
        None => {
            tracing::info!("Session store: in-memory");
            Arc::new(InMemorySessionStore::new(config.default_language))
        }
    }
}

/// Run Telegram bot with explicit Dispatcher for reliable polling
pub async fn run_telegram_bot(config: Config, knowledge: Arc<KnowledgeStore>) -> Result<()> {
    tracing::info!("===========================================");
    tracing::info!("  University bot - Starting...");
    tracing::info!("===========================================");
    tracing::info!("Default language: {}", config.default_language);
    tracing::info!("Gemini model: {} (timeout {:?})", config.gemini_model, config.ai_timeout);
    tracing::info!("Knowledge: {} templates", knowledge.entries().len());

    let bot = Bot::new(config.bot_token.clone());

    // Verify bot token by calling getMe
    tracing::info!("Verifying bot token...");
    match bot.get_me().await {
        Ok(me) => {
            tracing::info!(
                "Bot authenticated: @{} (ID: {})",
                me.username.as_deref().unwrap_or("unknown"),
                me.id
            );
        }
        Err(e) => {
            tracing::error!("Failed to authenticate bot: {}", e);
            anyhow::bail!("Bot authentication failed: {}", e);
        }
    }

    // Delete any existing webhook to ensure polling works
    tracing::info!("Clearing webhook (if any)...");
    if let Err(e) = bot.delete_webhook().await {
        tracing::warn!("Failed to delete webhook: {} (continuing anyway)", e);
    }

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register command menu: {}", e);
    }

    let generator = Arc::new(GeminiClient::from_config(&config));
    let resolver = AnswerResolver::new(Arc::clone(&knowledge), generator, config.ai_timeout);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let router = Arc::new(ConversationRouter::new(
        session_store(&config),
        resolver,
        transport,
    ));

    let handler = dptree::entry().branch(Update::filter_message().endpoint(message_handler));

    tracing::info!("Starting dispatcher with long polling...");
    tracing::info!("===========================================");
    tracing::info!("  Bot is now LIVE - send a message!");
    tracing::info!("===========================================");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            tracing::debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in message handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::warn!("Dispatcher stopped");
    Ok(())
}

/// Convert a Telegram message into a router event; non-text messages are skipped
pub(crate) fn inbound_text(msg: &Message) -> Option<InboundText> {
    let text = msg.text()?;
    let sender_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
    Some(InboundText::new(ConversationId(msg.chat.id.0), sender_id, text))
}

/// Message handler endpoint for the dispatcher
async fn message_handler(msg: Message, router: Arc<ConversationRouter>) -> ResponseResult<()> {
    let Some(event) = inbound_text(&msg) else {
        tracing::debug!("Ignoring non-text message in chat {}", msg.chat.id);
        return Ok(());
    };

    let chat_id = event.conversation_id;
    if let Err(e) = router.handle(event).await {
        // No reply reached the user; nothing is retried
        tracing::error!("Failed to reply in chat {}: {}", chat_id, e);
    }

    Ok(())
}

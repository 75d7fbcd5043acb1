//! Menu Dispatcher
//!
//! Recognizes slash commands and menu button captions. Captions are matched
//! by exact equality against the current language's labels (they are button
//! texts, not free-text fragments). A recognized text is fully handled here
//! and never reaches the answer resolver.

use std::sync::Arc;
use tracing::debug;

use crate::channels::{ConversationId, Keyboard};
use crate::locale::{Language, Locale};
use crate::session::SessionStore;

/// Informational menu topics with a fixed reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoTopic {
    Programs,
    Admission,
    Tuition,
    Contacts,
}

impl InfoTopic {
    fn reply(&self, locale: &Locale) -> &'static str {
        match self {
            InfoTopic::Programs => locale.replies.programs,
            InfoTopic::Admission => locale.replies.admission,
            InfoTopic::Tuition => locale.replies.tuition,
            InfoTopic::Contacts => locale.replies.contacts,
        }
    }
}

/// Everything the dispatcher can recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Help,
    Reset,
    ChooseLanguage,
    SetLanguage(Language),
    Info(InfoTopic),
}

/// Reply produced for a handled text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuReply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl MenuReply {
    fn new(text: &str, keyboard: Keyboard) -> Self {
        Self {
            text: text.to_string(),
            keyboard: Some(keyboard),
        }
    }
}

/// Classify `text` for a conversation currently in `language`
pub fn recognize(text: &str, language: Language) -> Option<MenuAction> {
    let text = text.trim();

    if text.starts_with('/') {
        return parse_command(text);
    }

    if let Some(lang) = Language::from_button_label(text) {
        return Some(MenuAction::SetLanguage(lang));
    }

    let labels = &language.locale().menu;
    let action = match text {
        t if t == labels.programs => MenuAction::Info(InfoTopic::Programs),
        t if t == labels.admission => MenuAction::Info(InfoTopic::Admission),
        t if t == labels.tuition => MenuAction::Info(InfoTopic::Tuition),
        t if t == labels.contacts => MenuAction::Info(InfoTopic::Contacts),
        t if t == labels.change_language => MenuAction::ChooseLanguage,
        t if t == labels.reset => MenuAction::Reset,
        _ => return None,
    };
    Some(action)
}

/// `/cmd`, `/cmd@botname` and `/cmd payload` forms
fn parse_command(text: &str) -> Option<MenuAction> {
    let first = text.split_whitespace().next()?;
    let command = first.split('@').next().unwrap_or(first);
    match command {
        "/start" => Some(MenuAction::Start),
        "/help" => Some(MenuAction::Help),
        "/reset" => Some(MenuAction::Reset),
        "/language" | "/lang" => Some(MenuAction::ChooseLanguage),
        _ => None,
    }
}

/// Main menu keyboard in the given language
pub fn main_menu(language: Language) -> Keyboard {
    let m = &language.locale().menu;
    Keyboard::new(vec![
        vec![m.programs, m.admission],
        vec![m.tuition, m.contacts],
        vec![m.change_language, m.reset],
    ])
}

/// Language picker keyboard (same in every language)
pub fn language_picker() -> Keyboard {
    Keyboard::new(vec![Language::ALL.iter().map(|l| l.button_label()).collect()])
}

/// Applies control actions to the session store and builds replies
pub struct MenuDispatcher {
    sessions: Arc<dyn SessionStore>,
}

impl MenuDispatcher {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// `Some(reply)` when the text was a command or menu caption
    pub fn try_dispatch(
        &self,
        conversation: ConversationId,
        text: &str,
        language: Language,
    ) -> Option<MenuReply> {
        let action = recognize(text, language)?;
        debug!("Menu action for {}: {:?}", conversation, action);

        let locale = language.locale();
        let reply = match action {
            MenuAction::Start => MenuReply::new(locale.greeting, main_menu(language)),
            MenuAction::Help => MenuReply::new(locale.help, main_menu(language)),
            MenuAction::Reset => {
                self.sessions.clear_context(conversation);
                MenuReply::new(locale.reset_done, main_menu(language))
            }
            MenuAction::ChooseLanguage => {
                MenuReply::new(locale.language_prompt, language_picker())
            }
            MenuAction::SetLanguage(new_language) => {
                self.sessions.set_language(conversation, new_language);
                MenuReply::new(
                    new_language.locale().language_changed,
                    main_menu(new_language),
                )
            }
            MenuAction::Info(topic) => MenuReply::new(topic.reply(locale), main_menu(language)),
        };
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemorySessionStore;

    fn dispatcher() -> (MenuDispatcher, Arc<InMemorySessionStore>) {
        let sessions = Arc::new(InMemorySessionStore::default());
        (MenuDispatcher::new(sessions.clone()), sessions)
    }

    #[test]
    fn test_commands() {
        assert_eq!(recognize("/start", Language::Kk), Some(MenuAction::Start));
        assert_eq!(recognize("/start@AtyrauUniBot", Language::Ru), Some(MenuAction::Start));
        assert_eq!(recognize("/start campaign", Language::En), Some(MenuAction::Start));
        assert_eq!(recognize("/help", Language::Kk), Some(MenuAction::Help));
        assert_eq!(recognize("/reset", Language::Kk), Some(MenuAction::Reset));
        assert_eq!(recognize("/language", Language::Kk), Some(MenuAction::ChooseLanguage));
        assert_eq!(recognize("/unknown", Language::Kk), None);
    }

    #[test]
    fn test_labels_match_only_current_language() {
        assert_eq!(
            recognize("💰 Оқу ақысы", Language::Kk),
            Some(MenuAction::Info(InfoTopic::Tuition))
        );
        assert_eq!(recognize("💰 Оқу ақысы", Language::Ru), None);
        assert_eq!(
            recognize("💰 Стоимость обучения", Language::Ru),
            Some(MenuAction::Info(InfoTopic::Tuition))
        );
    }

    #[test]
    fn test_labels_require_exact_match() {
        assert_eq!(recognize("Оқу ақысы", Language::Kk), None);
        assert_eq!(recognize("💰 Оқу ақысы қанша?", Language::Kk), None);
        assert_eq!(recognize("💰 оқу ақысы", Language::Kk), None);
        // surrounding whitespace is not part of the caption
        assert_eq!(
            recognize("  💰 Оқу ақысы \n", Language::Kk),
            Some(MenuAction::Info(InfoTopic::Tuition))
        );
    }

    #[test]
    fn test_language_buttons_recognized_in_any_language() {
        for current in Language::ALL {
            assert_eq!(
                recognize("🇷🇺 Русский", current),
                Some(MenuAction::SetLanguage(Language::Ru))
            );
        }
    }

    #[test]
    fn test_tuition_reply() {
        let (dispatcher, _) = dispatcher();
        let reply = dispatcher
            .try_dispatch(ConversationId(1), "💰 Оқу ақысы", Language::Kk)
            .unwrap();
        assert_eq!(reply.text, Language::Kk.locale().replies.tuition);
        assert_eq!(reply.keyboard, Some(main_menu(Language::Kk)));
    }

    #[test]
    fn test_set_language_updates_session_and_replies_in_new_language() {
        let (dispatcher, sessions) = dispatcher();
        let id = ConversationId(9);
        let reply = dispatcher.try_dispatch(id, "🇬🇧 English", Language::Kk).unwrap();

        assert_eq!(sessions.language(id), Language::En);
        assert_eq!(reply.text, Language::En.locale().language_changed);
        assert_eq!(reply.keyboard, Some(main_menu(Language::En)));
    }

    #[test]
    fn test_reset_clears_context() {
        let (dispatcher, sessions) = dispatcher();
        let id = ConversationId(4);
        sessions.set_context(id, "stale".to_string());

        let reply = dispatcher.try_dispatch(id, "🔄 Қайта бастау", Language::Kk).unwrap();
        assert_eq!(reply.text, Language::Kk.locale().reset_done);
        assert_eq!(sessions.session(id).unwrap().context, None);

        // second reset is harmless
        assert!(dispatcher.try_dispatch(id, "/reset", Language::Kk).is_some());
    }

    #[test]
    fn test_change_language_shows_picker() {
        let (dispatcher, sessions) = dispatcher();
        let reply = dispatcher
            .try_dispatch(ConversationId(2), "🌐 Сменить язык", Language::Ru)
            .unwrap();
        assert_eq!(reply.text, Language::Ru.locale().language_prompt);
        assert_eq!(reply.keyboard, Some(language_picker()));
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_free_text_not_handled() {
        let (dispatcher, sessions) = dispatcher();
        assert!(dispatcher
            .try_dispatch(ConversationId(1), "Грант қалай алуға болады?", Language::Kk)
            .is_none());
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_main_menu_layout() {
        let keyboard = main_menu(Language::Kk);
        assert_eq!(keyboard.rows.len(), 3);
        assert!(keyboard.labels().any(|l| l == "💰 Оқу ақысы"));
        assert_eq!(language_picker().labels().count(), 3);
    }
}

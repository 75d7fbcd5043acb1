//! Tests for Telegram bot functionality
//!
//! Unit tests for message chunking, keyboard rendering and update conversion.

#[cfg(test)]
mod tests {
    // Test message chunking
    mod message_chunking {
        use crate::telegram_ui::{split_message, MAX_MESSAGE_CHARS};

        #[test]
        fn test_short_message_single_chunk() {
            let msg = "Сәлем, әлем!";
            let chunks = split_message(msg, MAX_MESSAGE_CHARS);
            assert_eq!(chunks, vec![msg]);
        }

        #[test]
        fn test_exact_boundary_message() {
            let msg = "a".repeat(MAX_MESSAGE_CHARS);
            let chunks = split_message(&msg, MAX_MESSAGE_CHARS);
            assert_eq!(chunks.len(), 1);
            assert_eq!(chunks[0].len(), MAX_MESSAGE_CHARS);
        }

        #[test]
        fn test_message_splits_correctly() {
            let msg = "a".repeat(MAX_MESSAGE_CHARS + 100);
            let chunks = split_message(&msg, MAX_MESSAGE_CHARS);
            assert_eq!(chunks.len(), 2);
            assert_eq!(chunks[0].len(), MAX_MESSAGE_CHARS);
            assert_eq!(chunks[1].len(), 100);
        }

        #[test]
        fn test_limit_counts_characters_not_bytes() {
            // Cyrillic is two bytes per char in UTF-8
            let msg = "ә".repeat(MAX_MESSAGE_CHARS);
            let chunks = split_message(&msg, MAX_MESSAGE_CHARS);
            assert_eq!(chunks.len(), 1);
            assert_eq!(chunks[0].chars().count(), MAX_MESSAGE_CHARS);
        }

        #[test]
        fn test_utf8_multibyte_not_broken() {
            let base = "a".repeat(MAX_MESSAGE_CHARS - 2);
            let msg = format!("{}Қазақстан", base);
            let chunks = split_message(&msg, MAX_MESSAGE_CHARS);
            assert_eq!(chunks.len(), 2);
            assert_eq!(chunks.concat(), msg);
        }

        #[test]
        fn test_emoji_boundary() {
            let base = "a".repeat(MAX_MESSAGE_CHARS - 1);
            let msg = format!("{}🎓💰", base);
            let chunks = split_message(&msg, MAX_MESSAGE_CHARS);
            // 🎓 needs two UTF-16 units and only one is left
            assert_eq!(chunks[0].len(), MAX_MESSAGE_CHARS - 1);
            assert_eq!(chunks[1], "🎓💰");
            assert_eq!(chunks.concat(), msg);
        }

        #[test]
        fn test_limit_counts_utf16_units() {
            let msg = "🎓".repeat(MAX_MESSAGE_CHARS);
            let chunks = split_message(&msg, MAX_MESSAGE_CHARS);
            assert_eq!(chunks.len(), 2);
            for chunk in &chunks {
                assert!(chunk.encode_utf16().count() <= MAX_MESSAGE_CHARS);
                assert_eq!(chunk.chars().count(), MAX_MESSAGE_CHARS / 2);
            }
            assert_eq!(chunks.concat(), msg);
        }

        #[test]
        fn test_empty_message() {
            assert!(split_message("", MAX_MESSAGE_CHARS).is_empty());
        }

        #[test]
        fn test_very_long_message() {
            let msg = "x".repeat(10 * 3 + 5);
            let chunks = split_message(&msg, 10);
            assert_eq!(chunks.len(), 4);
            assert_eq!(chunks[3].len(), 5);
        }
    }

    // Test keyboard rendering
    mod keyboard_rendering {
        use crate::channels::Keyboard;
        use crate::locale::Language;
        use crate::menu::{language_picker, main_menu};
        use crate::telegram_ui::reply_keyboard;

        #[test]
        fn test_main_menu_rows_preserved() {
            let markup = reply_keyboard(&main_menu(Language::Kk));
            assert_eq!(markup.keyboard.len(), 3);
            assert_eq!(markup.keyboard[1][0].text, "💰 Оқу ақысы");
        }

        #[test]
        fn test_language_picker_single_row() {
            let markup = reply_keyboard(&language_picker());
            assert_eq!(markup.keyboard.len(), 1);
            let labels: Vec<&str> = markup.keyboard[0].iter().map(|b| b.text.as_str()).collect();
            assert_eq!(labels, vec!["🇰🇿 Қазақша", "🇷🇺 Русский", "🇬🇧 English"]);
        }

        #[test]
        fn test_empty_keyboard() {
            let markup = reply_keyboard(&Keyboard { rows: vec![] });
            assert!(markup.keyboard.is_empty());
        }
    }

    // Test update conversion
    mod update_conversion {
        use crate::channels::ConversationId;
        use crate::telegram::inbound_text;
        use teloxide::types::Message;

        fn message(json: &str) -> Message {
            serde_json::from_str(json).unwrap()
        }

        #[test]
        fn test_text_message_converted() {
            let msg = message(
                r#"{
                    "message_id": 10,
                    "date": 1700000000,
                    "chat": {"id": 555, "type": "private", "first_name": "Айгерім"},
                    "from": {"id": 777, "is_bot": false, "first_name": "Айгерім"},
                    "text": "Платонус параль"
                }"#,
            );
            let event = inbound_text(&msg).unwrap();
            assert_eq!(event.conversation_id, ConversationId(555));
            assert_eq!(event.sender_id, 777);
            assert_eq!(event.text, "Платонус параль");
        }

        #[test]
        fn test_message_without_text_skipped() {
            let msg = message(
                r#"{
                    "message_id": 11,
                    "date": 1700000000,
                    "chat": {"id": 555, "type": "private", "first_name": "Айгерім"},
                    "from": {"id": 777, "is_bot": false, "first_name": "Айгерім"},
                    "location": {"latitude": 47.1, "longitude": 51.9}
                }"#,
            );
            assert!(inbound_text(&msg).is_none());
        }
    }
}

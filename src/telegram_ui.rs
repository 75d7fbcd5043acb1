//! Telegram UI Components
//!
//! Reply keyboard rendering and message-length handling.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::channels::Keyboard;

/// Telegram rejects texts longer than 4096 UTF-16 code units
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Render a keyboard as a resized, persistent reply keyboard
pub fn reply_keyboard(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = keyboard
        .rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(label.as_str())).collect())
        .collect();

    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Split text into chunks of at most `max` UTF-16 code units on char
/// boundaries (astral-plane characters such as emoji count twice)
pub fn split_message(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut units = 0;

    for (i, c) in text.char_indices() {
        let width = c.len_utf16();
        if units + width > max && i > start {
            chunks.push(&text[start..i]);
            start = i;
            units = 0;
        }
        units += width;
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

//! Template Matcher
//!
//! Case-insensitive substring lookup over the knowledge templates.
//! First match in load order wins, so a short generic trigger listed before
//! a longer specific one shadows it.

use crate::knowledge::KnowledgeEntry;

/// Answer of the first entry whose trigger occurs in `text`
pub fn find_answer<'a>(text: &str, entries: &'a [KnowledgeEntry]) -> Option<&'a str> {
    let normalized = normalize(text);
    entries
        .iter()
        .find(|entry| normalized.contains(&normalize(&entry.trigger)))
        .map(|entry| entry.answer.as_str())
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

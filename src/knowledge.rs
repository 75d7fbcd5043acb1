//! Knowledge Store
//!
//! Curated trigger/answer templates plus an optional free-text corpus.
//! Loaded once at startup and shared read-only for the process lifetime.
//! Templates feed the local matcher; everything together is the corpus
//! injected into the generative prompt.

use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::matcher;

/// A trigger phrase and its canned answer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(alias = "key")]
    pub trigger: String,
    #[serde(alias = "value")]
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(trigger: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            answer: answer.into(),
        }
    }
}

/// TOML layout: `[[entry]]` tables with `trigger` and `answer`
#[derive(Debug, Deserialize)]
struct TomlTemplates {
    #[serde(default, rename = "entry")]
    entries: Vec<KnowledgeEntry>,
}

/// Errors loading the knowledge source (fatal at startup)
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON templates in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML templates in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("knowledge base is empty: no templates and no corpus were loaded")]
    Empty,
}

/// Where a knowledge file lives and whether it must exist
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Explicitly configured files must load; default paths may be absent
    pub required: bool,
}

impl SourceFile {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), required: true }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), required: false }
    }

    /// Read the file; `Ok(None)` when it is optional and missing
    fn read(&self) -> Result<Option<String>, KnowledgeError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if !self.required && e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Knowledge file {} not found, skipping", self.path.display());
                Ok(None)
            }
            Err(source) => Err(KnowledgeError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Immutable knowledge base
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    entries: Vec<KnowledgeEntry>,
    corpus: Option<String>,
}

impl KnowledgeStore {
    /// Build from entries (load order preserved) and an optional corpus.
    /// Entries with a blank trigger would match any input and entries with a
    /// blank answer would produce an empty reply; both are dropped.
    pub fn new(entries: Vec<KnowledgeEntry>, corpus: Option<String>) -> Self {
        let before = entries.len();
        let entries: Vec<KnowledgeEntry> = entries
            .into_iter()
            .filter(|e| {
                let blank_trigger = e.trigger.trim().is_empty();
                let blank_answer = e.answer.trim().is_empty();
                if blank_answer && !blank_trigger {
                    warn!("Template {:?} has an empty answer, skipping", e.trigger);
                }
                !blank_trigger && !blank_answer
            })
            .collect();
        if entries.len() < before {
            warn!("Dropped {} incomplete template(s)", before - entries.len());
        }

        let corpus = corpus
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Self { entries, corpus }
    }

    /// Load templates and free-text corpus from disk
    pub fn load(templates: &SourceFile, corpus: &SourceFile) -> Result<Self, KnowledgeError> {
        let entries = match templates.read()? {
            Some(content) => parse_templates(&templates.path, &content)?,
            None => Vec::new(),
        };
        let corpus_text = corpus.read()?;

        let store = Self::new(entries, corpus_text);
        if store.is_empty() {
            return Err(KnowledgeError::Empty);
        }

        info!(
            "Knowledge base loaded: {} templates, corpus {} chars",
            store.entries.len(),
            store.corpus.as_deref().map(|c| c.chars().count()).unwrap_or(0)
        );
        Ok(store)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn corpus(&self) -> Option<&str> {
        self.corpus.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.corpus.is_none()
    }

    /// First template whose trigger occurs in `text`
    pub fn find_answer(&self, text: &str) -> Option<&str> {
        matcher::find_answer(text, &self.entries)
    }

    /// Whole knowledge base as plain text for the model instruction
    pub fn corpus_text(&self) -> String {
        let mut out = String::new();
        if let Some(corpus) = &self.corpus {
            out.push_str(corpus);
        }
        if !self.entries.is_empty() {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            for entry in &self.entries {
                let _ = writeln!(out, "{} — {}", entry.trigger.trim(), entry.answer.trim());
            }
        }
        out
    }
}

/// Parse a templates file; format chosen by extension (`.toml`, else JSON)
pub fn parse_templates(path: &Path, content: &str) -> Result<Vec<KnowledgeEntry>, KnowledgeError> {
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        let parsed: TomlTemplates = toml::from_str(content).map_err(|source| KnowledgeError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parsed.entries)
    } else {
        serde_json::from_str(content).map_err(|source| KnowledgeError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_json_key_value_layout() {
        let json = r#"[{"key": "платонус", "value": "Парольді эдвайзерден алыңыз"},
                       {"trigger": "грант", "answer": "ҰБТ нәтижесі бойынша"}]"#;
        let entries = parse_templates(Path::new("templates.json"), json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].trigger, "платонус");
        assert_eq!(entries[1].answer, "ҰБТ нәтижесі бойынша");
    }

    #[test]
    fn test_parse_toml_layout() {
        let toml = r#"
            [[entry]]
            trigger = "жатақхана"
            answer = "Жатақхана бар"

            [[entry]]
            trigger = "стипендия"
            answer = "Стипендия ай сайын төленеді"
        "#;
        let entries = parse_templates(Path::new("templates.TOML"), toml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].trigger, "стипендия");
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let err = parse_templates(Path::new("bad.json"), "{not json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_blank_triggers_dropped() {
        let store = KnowledgeStore::new(
            vec![KnowledgeEntry::new("  ", "x"), KnowledgeEntry::new("грант", "y")],
            None,
        );
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.find_answer("anything"), None);
    }

    #[test]
    fn test_blank_answers_dropped() {
        let store = KnowledgeStore::new(
            vec![
                KnowledgeEntry::new("жатақхана", ""),
                KnowledgeEntry::new("грант", "   "),
                KnowledgeEntry::new("жатақхана бар", "Иә, бар."),
            ],
            None,
        );
        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.find_answer("Жатақхана бар ма?"), Some("Иә, бар."));
        assert_eq!(store.find_answer("грант"), None);
    }

    #[test]
    fn test_load_from_files() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates.json");
        let corpus = dir.path().join("system.txt");
        std::fs::write(&templates, r#"[{"key": "платонус", "value": "Эдвайзерге жүгініңіз"}]"#).unwrap();
        std::fs::write(&corpus, "Университет 1950 жылы ашылған.\n").unwrap();

        let store = KnowledgeStore::load(
            &SourceFile::required(&templates),
            &SourceFile::required(&corpus),
        )
        .unwrap();

        assert_eq!(store.entries().len(), 1);
        assert_eq!(store.corpus(), Some("Университет 1950 жылы ашылған."));
        let text = store.corpus_text();
        assert!(text.starts_with("Университет 1950"));
        assert!(text.contains("платонус — Эдвайзерге жүгініңіз"));
    }

    #[test]
    fn test_optional_missing_file_skipped() {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("system.txt");
        std::fs::write(&corpus, "corpus").unwrap();

        let store = KnowledgeStore::load(
            &SourceFile::optional(dir.path().join("missing.json")),
            &SourceFile::required(&corpus),
        )
        .unwrap();
        assert!(store.entries().is_empty());
        assert_eq!(store.corpus(), Some("corpus"));
    }

    #[test]
    fn test_required_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = KnowledgeStore::load(
            &SourceFile::required(dir.path().join("missing.json")),
            &SourceFile::optional(dir.path().join("system.txt")),
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::Io { .. }));
    }

    #[test]
    fn test_nothing_loaded_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = KnowledgeStore::load(
            &SourceFile::optional(dir.path().join("templates.json")),
            &SourceFile::optional(dir.path().join("system.txt")),
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::Empty));
    }
}

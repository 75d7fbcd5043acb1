//! Configuration management

use std::path::PathBuf;
use std::time::Duration;

use crate::gemini::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::knowledge::SourceFile;
use crate::locale::Language;

const DEFAULT_KNOWLEDGE_FILE: &str = "system.txt";
const DEFAULT_TEMPLATES_FILE: &str = "templates.json";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SESSION_IDLE_SECS: u64 = 24 * 60 * 60;

/// Startup configuration errors (the bot does not start)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Bounded session store settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCacheConfig {
    pub capacity: u64,
    pub idle: Duration,
}

/// Bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,

    /// Gemini API key
    pub gemini_api_key: String,

    /// Gemini model name
    pub gemini_model: String,

    /// Gemini API base URL
    pub gemini_api_url: String,

    /// Deadline for one generator call
    pub ai_timeout: Duration,

    /// Free-text knowledge corpus
    pub knowledge_file: SourceFile,

    /// Structured trigger/answer templates
    pub templates_file: SourceFile,

    /// Language for conversations that never picked one
    pub default_language: Language,

    /// Bounded session store; `None` keeps every session in memory
    pub session_cache: Option<SessionCacheConfig>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN (or BOT_TOKEN)"))?;

        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let gemini_model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let gemini_api_url = get("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let ai_timeout = Duration::from_secs(
            parse_u64(get("AI_TIMEOUT_SECS"), "AI_TIMEOUT_SECS")?.unwrap_or(DEFAULT_AI_TIMEOUT_SECS),
        );

        let knowledge_file = match get("KNOWLEDGE_FILE") {
            Some(path) => SourceFile::required(PathBuf::from(path)),
            None => SourceFile::optional(DEFAULT_KNOWLEDGE_FILE),
        };
        let templates_file = match get("TEMPLATES_FILE") {
            Some(path) => SourceFile::required(PathBuf::from(path)),
            None => SourceFile::optional(DEFAULT_TEMPLATES_FILE),
        };

        let default_language = match get("BOT_DEFAULT_LANGUAGE") {
            Some(code) => code.parse::<Language>().map_err(|_| ConfigError::Invalid {
                name: "BOT_DEFAULT_LANGUAGE",
                value: code.clone(),
            })?,
            None => Language::default(),
        };

        let session_cache = match parse_u64(get("SESSION_CACHE_CAPACITY"), "SESSION_CACHE_CAPACITY")? {
            Some(capacity) => {
                let idle = parse_u64(get("SESSION_IDLE_SECS"), "SESSION_IDLE_SECS")?
                    .unwrap_or(DEFAULT_SESSION_IDLE_SECS);
                Some(SessionCacheConfig {
                    capacity,
                    idle: Duration::from_secs(idle),
                })
            }
            None => None,
        };

        Ok(Self {
            bot_token,
            gemini_api_key,
            gemini_model,
            gemini_api_url,
            ai_timeout,
            knowledge_file,
            templates_file,
            default_language,
            session_cache,
        })
    }
}

fn parse_u64(value: Option<String>, name: &'static str) -> Result<Option<u64>, ConfigError> {
    value
        .map(|v| {
            v.parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { name, value: v })
        })
        .transpose()
}

//! Gemini API Client
//!
//! Google Gemini `generateContent` client used when no template matches.
//! The grounding instruction goes into `systemInstruction`; the user's raw
//! text is the single user turn.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::prompt::PromptContext;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Generator failures, classified for logging
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Anything that can produce an answer for a grounded prompt
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &PromptContext, user_text: &str) -> Result<String, GenerationError>;
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create from config
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gemini_api_key, &config.gemini_api_url, &config.gemini_model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// Response body; every level is optional because blocked or truncated
/// responses omit them
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Text of the first part of the first candidate, trimmed
fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Malformed("no candidates in response".to_string()))?;

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let text = candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerationError::Malformed(format!(
            "candidate has no text (finish reason: {})",
            if finish_reason.is_empty() { "none" } else { finish_reason.as_str() }
        )));
    }
    Ok(text)
}

#[async_trait]
impl AnswerGenerator for GeminiClient {
    async fn generate(&self, prompt: &PromptContext, user_text: &str) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), user_text)],
            system_instruction: Content::text(None, &prompt.system_prompt),
        };

        debug!(
            "Calling Gemini API: model={}, lang={}, prompt_len={}",
            self.model,
            prompt.language,
            user_text.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Malformed(format!("invalid JSON: {}", e)))?;
        let text = extract_text(parsed)?;

        info!("Gemini response: model={}, chars={}", self.model, text.chars().count());
        Ok(text)
    }
}

//! Answer Resolver
//!
//! Template fast path first; only on a miss is the generator called, bounded
//! by a deadline. Every generator failure collapses into `ResolutionFailed`,
//! which carries the language so the router can apologise in it.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::gemini::{AnswerGenerator, GenerationError};
use crate::knowledge::KnowledgeStore;
use crate::locale::Language;
use crate::prompt::PromptContext;

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Template,
    Generated,
}

/// A resolved answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// Why resolution failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error or non-success HTTP status
    Transport,
    /// Empty candidate list, missing content, unparsable body
    Malformed,
    /// Generator did not answer before the deadline
    DeadlineExceeded,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Malformed => "malformed",
            FailureKind::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

impl From<&GenerationError> for FailureKind {
    fn from(err: &GenerationError) -> Self {
        match err {
            GenerationError::Transport(_) | GenerationError::Status { .. } => FailureKind::Transport,
            GenerationError::Malformed(_) => FailureKind::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("answer resolution failed ({}) for language {language}", .kind.as_str())]
pub struct ResolutionFailed {
    pub language: Language,
    pub kind: FailureKind,
}

/// Template lookup + grounded generation
pub struct AnswerResolver {
    knowledge: Arc<KnowledgeStore>,
    generator: Arc<dyn AnswerGenerator>,
    deadline: Duration,
}

impl AnswerResolver {
    pub fn new(
        knowledge: Arc<KnowledgeStore>,
        generator: Arc<dyn AnswerGenerator>,
        deadline: Duration,
    ) -> Self {
        Self {
            knowledge,
            generator,
            deadline,
        }
    }

    pub async fn resolve(&self, text: &str, language: Language) -> Result<Answer, ResolutionFailed> {
        if let Some(answer) = self.knowledge.find_answer(text) {
            debug!("Template hit for {:?}", truncate(text, 50));
            return Ok(Answer {
                text: answer.to_string(),
                source: AnswerSource::Template,
            });
        }

        let prompt = PromptContext::build(&self.knowledge, language);
        let call = self.generator.generate(&prompt, text);

        let outcome = match tokio::time::timeout(self.deadline, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("Generator timed out after {:?}", self.deadline);
                return Err(ResolutionFailed {
                    language,
                    kind: FailureKind::DeadlineExceeded,
                });
            }
        };

        match outcome {
            Ok(answer) => {
                let answer = answer.trim();
                if answer.is_empty() {
                    warn!("Generator returned an empty answer");
                    return Err(ResolutionFailed {
                        language,
                        kind: FailureKind::Malformed,
                    });
                }
                Ok(Answer {
                    text: answer.to_string(),
                    source: AnswerSource::Generated,
                })
            }
            Err(e) => {
                warn!("Generator error: {}", e);
                Err(ResolutionFailed {
                    language,
                    kind: FailureKind::from(&e),
                })
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max).collect::<String>())
    }
}

//! Prompt construction
//!
//! The system instruction grounds the model in the knowledge corpus: answer
//! only from it, otherwise reply with the locale's refusal phrase, in the
//! session's language. Rebuilt for every request.

use crate::knowledge::KnowledgeStore;
use crate::locale::{Language, UNIVERSITY_NAME};

const CORPUS_BEGIN: &str = "--- KNOWLEDGE BASE ---";
const CORPUS_END: &str = "--- END OF KNOWLEDGE BASE ---";

/// Per-request model instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub language: Language,
    pub system_prompt: String,
}

impl PromptContext {
    pub fn build(knowledge: &KnowledgeStore, language: Language) -> Self {
        let locale = language.locale();
        let system_prompt = format!(
            "You are an AI assistant helping students and applicants of {university}.\n\
             Answer ONLY using the knowledge base below. Do not add any information of your own.\n\
             If the answer is not in the knowledge base, reply exactly: \"{refusal}\".\n\
             Always answer in {language}.\n\
             \n\
             {begin}\n\
             {corpus}\n\
             {end}\n",
            university = UNIVERSITY_NAME,
            refusal = locale.refusal,
            language = locale.prompt_language,
            begin = CORPUS_BEGIN,
            corpus = knowledge.corpus_text(),
            end = CORPUS_END,
        );

        Self {
            language,
            system_prompt,
        }
    }
}

use async_trait::async_trait;

use crate::collaborators::chat::{parse_string_array, ChatClient};
use crate::collaborators::ClauseBreaker;
use crate::errors::CollaboratorError;

// @module: LLM-backed clause/breath segmentation

const SYSTEM_PROMPT: &str =
    "You are an editing assistant for short-form video scripts in Korean.";

const BREATH_PROMPT: &str = "\
Rebreak the script below into breath units for spoken delivery.
Rules:
- Preserve the original text exactly: characters, spacing, word order and endings. Only line placement changes.
- One breath unit per array element, roughly 3 to 6 words (8 to 18 characters) each. Avoid one- or two-word units.
- Keep numbers with their units and signs together, and keep sentence endings attached to the preceding words.
- A question mark may end a unit.
Return ONLY a JSON array of strings, no markdown, no commentary.

Script:";

/// Clause breaker backed by one chat completion for the whole script.
///
/// The response is expected to be a JSON array of clause strings; a raw
/// line-per-unit response is accepted as a fallback parse.
#[derive(Debug)]
pub struct LlmClauseBreaker {
    chat: ChatClient,
}

impl LlmClauseBreaker {
    /// Create a clause breaker on top of a chat client
    pub fn new(chat: ChatClient) -> Self {
        LlmClauseBreaker { chat }
    }
}

#[async_trait]
impl ClauseBreaker for LlmClauseBreaker {
    async fn break_script(&self, script: &str) -> Result<Vec<String>, CollaboratorError> {
        let prompt = format!("{}\n{}", BREATH_PROMPT, script);
        let raw = self.chat.complete(SYSTEM_PROMPT, &prompt).await?;
        Ok(parse_string_array(&raw))
    }
}

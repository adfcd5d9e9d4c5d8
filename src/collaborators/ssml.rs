use async_trait::async_trait;
use log::warn;

use crate::collaborators::chat::{parse_string_array, ChatClient};
use crate::collaborators::MarkupConverter;
use crate::errors::CollaboratorError;

// @module: LLM-backed SSML conversion of clause units

/// Neutral markup used to pad a short converter response
pub const EMPTY_MARKUP: &str = "<speak></speak>";

const SYSTEM_PROMPT: &str =
    "You are a converter that turns short-form Korean script lines into Amazon Polly SSML.";

const SSML_PROMPT: &str = "\
Convert each line of the JSON payload below into one SSML string.
Rules:
- Preserve the words, word order and sentence endings of each line exactly. Spell out digits and units in Korean pronunciation.
- Allowed tags: <speak>, <prosody>, <break>. Allowed punctuation: question mark and comma.
- Pacing: hooks and questions rate 160-165% pitch +15% to +25%; plain exposition rate 140-155% pitch -10% to +5%; conclusions rate 130-140% pitch -15% to -20%.
- Short breaks between phrases (20ms) and sentences (50ms), never above 90ms, never doubled.
Return ONLY a JSON array of SSML strings, one per input line, same order, no markdown.

Payload:";

/// Markup converter backed by one chat completion for all units.
///
/// Responses missing the `<speak>` root are wrapped, and the result list is
/// padded with neutral markup or truncated so its length always matches the
/// input.
#[derive(Debug)]
pub struct LlmMarkupConverter {
    chat: ChatClient,
}

impl LlmMarkupConverter {
    /// Create a markup converter on top of a chat client
    pub fn new(chat: ChatClient) -> Self {
        LlmMarkupConverter { chat }
    }
}

#[async_trait]
impl MarkupConverter for LlmMarkupConverter {
    async fn convert_lines(&self, lines: &[String]) -> Result<Vec<String>, CollaboratorError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::json!({ "lines": lines });
        let prompt = format!("{}\n{}", SSML_PROMPT, payload);
        let raw = self.chat.complete(SYSTEM_PROMPT, &prompt).await?;

        let mut out: Vec<String> = parse_string_array(&raw)
            .into_iter()
            .map(|s| {
                if !s.is_empty() && !s.to_lowercase().contains("<speak") {
                    format!("<speak>{}</speak>", s)
                } else {
                    s
                }
            })
            .collect();

        if out.len() != lines.len() {
            warn!(
                "Markup converter returned {} lines for {} units, reconciling",
                out.len(),
                lines.len()
            );
            out.resize(lines.len(), EMPTY_MARKUP.to_string());
        }

        Ok(out)
    }
}

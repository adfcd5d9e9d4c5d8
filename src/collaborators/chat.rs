use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::ChatConfig;
use crate::errors::CollaboratorError;

/// Chat-completions client shared by the LLM-backed collaborators.
///
/// Speaks the OpenAI chat-completions wire format, which also covers
/// OpenAI-compatible local servers. Both the clause breaker and the markup
/// converter issue exactly one completion per pipeline run through this
/// client.
#[derive(Debug, Clone)]
pub struct ChatClient {
    /// Base URL of the chat API (without the /chat/completions suffix)
    endpoint: String,
    /// Model name
    model: String,
    /// API key, empty for local servers
    api_key: String,
    /// Sampling temperature
    temperature: f32,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl ChatClient {
    /// Create a client from the chat section of the application config
    pub fn from_config(config: &ChatConfig) -> Self {
        ChatClient {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }

    /// Run one completion and return the assistant message content.
    ///
    /// Server and network errors are retried with exponential backoff up to
    /// the configured retry count; client errors are returned immediately.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CollaboratorError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
        };

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let mut builder = self.client.post(&url).json(&request);
            if !self.api_key.is_empty() {
                builder = builder.bearer_auth(&self.api_key);
            }

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed: ChatCompletionResponse =
                            response.json().await.map_err(|e| {
                                CollaboratorError::ParseError(format!(
                                    "invalid chat completion response: {}",
                                    e
                                ))
                            })?;
                        let content = parsed
                            .choices
                            .into_iter()
                            .next()
                            .map(|c| c.message.content)
                            .ok_or_else(|| {
                                CollaboratorError::ParseError(
                                    "chat completion response contained no choices".to_string(),
                                )
                            })?;
                        return Ok(content.trim().to_string());
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!(
                            "Chat API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(CollaboratorError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        // Client error - don't retry
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Chat API error ({}): {}", status, error_text);
                        return Err(CollaboratorError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    error!(
                        "Chat API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(CollaboratorError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            CollaboratorError::RequestFailed(format!(
                "chat completion failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }
}

/// Parse a collaborator response that should be a JSON array of strings.
///
/// Falls back to splitting the raw response into non-empty lines when the
/// JSON parse fails, models frequently wrap or decorate the array.
pub fn parse_string_array(raw: &str) -> Vec<String> {
    if let Ok(arr) = serde_json::from_str::<Vec<String>>(raw) {
        return arr
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
    }

    raw.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

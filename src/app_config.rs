use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Subtitle rendering settings
    #[serde(default)]
    pub subtitle: SubtitleConfig,

    /// Chat-completion collaborator settings (clause breaking, SSML conversion)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Speech synthesis collaborator settings
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for subtitle rendering
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    // @field: Visual template name, resolved against the template registry
    #[serde(default = "default_template")]
    pub template: String,

    // @field: Strip trailing sentence punctuation from the last cue
    #[serde(default = "default_true")]
    pub strip_trailing_punct_last: bool,

    // @field: Max characters on a single caption line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    // @field: Max caption lines per cue (1 or 2)
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            strip_trailing_punct_last: true,
            max_chars_per_line: default_max_chars_per_line(),
            max_lines: default_max_lines(),
        }
    }
}

/// Chat-completion service configuration
///
/// Both LLM-backed collaborators (clause breaker and markup converter) share
/// this transport. The endpoint must speak the OpenAI chat-completions API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatConfig {
    /// Service endpoint URL
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Temperature parameter for text generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds, doubled on each retry)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            model: default_chat_model(),
            api_key: String::new(),
            temperature: default_temperature(),
            timeout_secs: default_chat_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Service endpoint URL
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,

    /// Voice preset key or raw voice id
    #[serde(default = "default_voice")]
    pub voice: String,

    /// Audio container format for synthesized chunks
    #[serde(default = "default_audio_format")]
    pub format: String,

    /// Request timeout in seconds
    #[serde(default = "default_synthesis_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory for per-line audio chunks
    #[serde(default = "default_chunk_dir")]
    pub chunk_dir: String,

    /// Output path for the mixed audio track
    #[serde(default = "default_mix_path")]
    pub mix_path: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_synthesis_endpoint(),
            voice: default_voice(),
            format: default_audio_format(),
            timeout_secs: default_synthesis_timeout_secs(),
            chunk_dir: default_chunk_dir(),
            mix_path: default_mix_path(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_template() -> String {
    "educational".to_string()
}

fn default_max_chars_per_line() -> usize {
    14
}

fn default_max_lines() -> usize {
    2
}

fn default_chat_endpoint() -> String {
    // Ollama's OpenAI-compatible endpoint; no API key needed for local use
    "http://localhost:11434/v1".to_string()
}

fn default_chat_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_temperature() -> f32 {
    1.0
}

fn default_chat_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_synthesis_endpoint() -> String {
    "http://localhost:8020/v1/audio/speech".to_string()
}

fn default_voice() -> String {
    "korean_female1".to_string()
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_synthesis_timeout_secs() -> u64 {
    30
}

fn default_chunk_dir() -> String {
    "assets/_tts_chunks".to_string()
}

fn default_mix_path() -> String {
    "assets/auto/_mix_audio.mp3".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.subtitle.max_lines == 0 || self.subtitle.max_lines > 2 {
            return Err(anyhow!(
                "max_lines must be 1 or 2, got {}",
                self.subtitle.max_lines
            ));
        }

        if self.subtitle.max_chars_per_line == 0 {
            return Err(anyhow!("max_chars_per_line must be at least 1"));
        }

        // Hosted chat endpoints need an API key; local servers usually don't
        if self.chat.endpoint.contains("api.openai.com") && self.chat.api_key.is_empty() {
            return Err(anyhow!(
                "Chat API key is required for endpoint {}",
                self.chat.endpoint
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            subtitle: SubtitleConfig::default(),
            chat: ChatConfig::default(),
            synthesis: SynthesisConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

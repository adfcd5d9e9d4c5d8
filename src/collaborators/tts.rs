use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::app_config::SynthesisConfig;
use crate::collaborators::SpeechSynthesizer;
use crate::errors::CollaboratorError;

// @module: HTTP speech synthesis client

// @const: Project voice presets mapped to service voice ids
static VOICE_PRESETS: &[(&str, &str)] = &[
    ("korean_female1", "Seoyeon"),
    ("korean_male1", "Joon"),
];

/// Resolve a voice preset key to a service voice id.
///
/// Unknown keys pass through unchanged so a raw voice id can be configured
/// directly; an empty key falls back to the first preset.
pub fn resolve_voice(key: &str) -> &str {
    if let Some((_, id)) = VOICE_PRESETS.iter().find(|(k, _)| *k == key) {
        return id;
    }
    if key.is_empty() {
        return VOICE_PRESETS[0].1;
    }
    key
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    /// SSML input for the synthesis engine
    input: &'a str,
    /// Resolved service voice id
    voice: &'a str,
    /// Audio container format of the response
    response_format: &'a str,
}

/// Speech synthesizer posting SSML to a configurable HTTP endpoint.
///
/// The endpoint receives `{input, voice, response_format}` and answers with
/// raw audio bytes, which are written to the requested output path. The
/// client does not retry: a failed unit is reported to the caller, which
/// substitutes a silent placeholder and an estimated duration.
#[derive(Debug)]
pub struct HttpSpeechSynthesizer {
    endpoint: String,
    voice: String,
    format: String,
    client: Client,
}

impl HttpSpeechSynthesizer {
    /// Create a synthesizer from the synthesis section of the application config
    pub fn from_config(config: &SynthesisConfig) -> Self {
        HttpSpeechSynthesizer {
            endpoint: config.endpoint.clone(),
            voice: resolve_voice(&config.voice).to_string(),
            format: config.format.clone(),
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, markup: &str, out_path: &Path) -> Result<(), CollaboratorError> {
        let request = SynthesisRequest {
            input: markup,
            voice: &self.voice,
            response_format: &self.format,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Synthesis API error ({}): {}", status, error_text);
            return Err(CollaboratorError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| CollaboratorError::ParseError(e.to_string()))?;

        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| CollaboratorError::RequestFailed(e.to_string()))?;
            }
        }
        fs::write(out_path, &audio)
            .map_err(|e| CollaboratorError::RequestFailed(e.to_string()))?;

        Ok(())
    }
}

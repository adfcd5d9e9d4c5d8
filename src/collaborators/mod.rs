/*!
 * External collaborator interfaces consumed by the pipeline.
 *
 * The core treats clause breaking, markup conversion, speech synthesis and
 * audio mixing as opaque services behind narrow async traits:
 * - `linebreak`: LLM-backed clause/breath segmentation
 * - `ssml`: LLM-backed synthesis markup conversion
 * - `tts`: HTTP speech synthesis client
 * - `ffmpeg`: audio probing and concatenation via ffmpeg/ffprobe
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::CollaboratorError;

/// Breaks a script into clause/breath units for natural speech pacing.
///
/// Implementations may fail or return ill-formed output; the pipeline falls
/// back to sentence-level segmentation in that case.
#[async_trait]
pub trait ClauseBreaker: Send + Sync + Debug {
    /// Break `script` into ordered clause units
    async fn break_script(&self, script: &str) -> Result<Vec<String>, CollaboratorError>;
}

/// Converts clause units into per-unit synthesis markup.
///
/// The returned list is expected to match the input length; callers
/// reconcile a mismatch defensively rather than failing the run.
#[async_trait]
pub trait MarkupConverter: Send + Sync + Debug {
    /// Convert `lines` into markup strings, one per input line
    async fn convert_lines(&self, lines: &[String]) -> Result<Vec<String>, CollaboratorError>;
}

/// Synthesizes one markup line into an audio file.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize `markup` and write the audio to `out_path`
    async fn synthesize(&self, markup: &str, out_path: &Path) -> Result<(), CollaboratorError>;
}

/// Measures and concatenates per-unit audio artifacts.
#[async_trait]
pub trait AudioMixer: Send + Sync + Debug {
    /// Measured playback duration of an audio file, in seconds
    async fn probe_duration(&self, path: &Path) -> Result<f64, CollaboratorError>;

    /// Concatenate chunks into one track at `out_path`, preserving input
    /// order exactly (this order determines cue ordering)
    async fn concat(
        &self,
        chunk_paths: &[PathBuf],
        out_path: &Path,
    ) -> Result<(), CollaboratorError>;
}

pub mod chat;
pub mod ffmpeg;
pub mod linebreak;
pub mod ssml;
pub mod tts;

use async_trait::async_trait;
use log::{debug, error, warn};
use serde_json::{from_str, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::collaborators::AudioMixer;
use crate::errors::CollaboratorError;

// @module: Audio probing and concatenation via ffmpeg/ffprobe

/// Audio mixer shelling out to ffprobe for duration measurement and to the
/// ffmpeg concat demuxer for order-preserving concatenation.
#[derive(Debug, Default)]
pub struct FfmpegMixer;

impl FfmpegMixer {
    pub fn new() -> Self {
        FfmpegMixer
    }
}

#[async_trait]
impl AudioMixer for FfmpegMixer {
    /// Measure the playback duration of an audio file with ffprobe.
    ///
    /// A zero-byte placeholder (written when synthesis failed for a unit)
    /// makes ffprobe fail, which the pipeline turns into an estimated
    /// duration.
    async fn probe_duration(&self, path: &Path) -> Result<f64, CollaboratorError> {
        if !path.exists() {
            return Err(CollaboratorError::ToolFailed(format!(
                "audio file not found: {:?}",
                path
            )));
        }

        // Add timeout to prevent hanging on problematic files
        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                path.to_str().unwrap_or(""),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(60);
        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| CollaboratorError::ToolFailed(format!("failed to execute ffprobe: {}", e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(CollaboratorError::ToolTimeout("ffprobe timed out after 60 seconds".to_string()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollaboratorError::ToolFailed(format!(
                "ffprobe failed: {}",
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: Value = from_str(&stdout)
            .map_err(|e| CollaboratorError::ParseError(format!("invalid ffprobe output: {}", e)))?;

        json.get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| {
                CollaboratorError::ParseError(format!("no duration reported for {:?}", path))
            })
    }

    /// Concatenate audio chunks in input order into one track.
    ///
    /// Unreadable or empty chunks are skipped; when nothing is usable an
    /// empty file is still produced so downstream steps have a stable path.
    async fn concat(
        &self,
        chunk_paths: &[PathBuf],
        out_path: &Path,
    ) -> Result<(), CollaboratorError> {
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| CollaboratorError::ToolFailed(e.to_string()))?;
            }
        }

        let usable: Vec<&PathBuf> = chunk_paths
            .iter()
            .filter(|p| fs::metadata(p).map(|m| m.len() > 0).unwrap_or(false))
            .collect();

        let skipped = chunk_paths.len() - usable.len();
        if skipped > 0 {
            warn!("Skipping {} empty or unreadable audio chunk(s)", skipped);
        }

        if usable.is_empty() {
            fs::write(out_path, b"").map_err(|e| CollaboratorError::ToolFailed(e.to_string()))?;
            return Ok(());
        }

        // Concat demuxer list file: one `file '<path>'` line per chunk
        let mut list_file = tempfile::NamedTempFile::new()
            .map_err(|e| CollaboratorError::ToolFailed(e.to_string()))?;
        for p in &usable {
            let escaped = p.to_string_lossy().replace('\'', r"'\''");
            writeln!(list_file, "file '{}'", escaped)
                .map_err(|e| CollaboratorError::ToolFailed(e.to_string()))?;
        }
        list_file
            .flush()
            .map_err(|e| CollaboratorError::ToolFailed(e.to_string()))?;

        let ffmpeg_future = Command::new("ffmpeg")
            .args([
                "-y", // Overwrite existing file
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                list_file.path().to_str().unwrap_or_default(),
                "-c",
                "copy",
                out_path.to_str().unwrap_or_default(),
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(120);
        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| CollaboratorError::ToolFailed(format!("failed to execute ffmpeg: {}", e)))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(CollaboratorError::ToolTimeout("ffmpeg concat timed out after 2 minutes".to_string()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            error!("Audio concatenation failed: {}", stderr.trim());
            return Err(CollaboratorError::ToolFailed(format!(
                "ffmpeg concat failed: {}",
                stderr.trim()
            )));
        }

        debug!(
            "Mixed {} audio chunk(s) into {:?}",
            usable.len(),
            out_path
        );
        Ok(())
    }
}

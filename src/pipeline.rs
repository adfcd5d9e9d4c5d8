use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::{Config, SubtitleConfig};
use crate::collaborators::{AudioMixer, ClauseBreaker, MarkupConverter, SpeechSynthesizer};
use crate::errors::PipelineError;
use crate::segmenter;
use crate::subtitle_writer::AssWriter;
use crate::timing::{self, TimedSegment};

// @module: Pipeline orchestration from raw script to subtitle file

/// Result of one pipeline run
#[derive(Debug)]
pub struct PipelineOutput {
    /// Time-aligned segments, contiguous from 0.0
    pub segments: Vec<TimedSegment>,
    /// Per-unit audio chunk paths, in cue order
    pub chunk_paths: Vec<PathBuf>,
    /// Path of the emitted subtitle file (unchanged when nothing was written)
    pub subtitle_path: PathBuf,
}

impl PipelineOutput {
    fn empty(subtitle_path: &Path) -> Self {
        PipelineOutput {
            segments: Vec::new(),
            chunk_paths: Vec::new(),
            subtitle_path: subtitle_path.to_path_buf(),
        }
    }
}

/// Sequences segmentation, markup conversion, synthesis, timing and emission.
///
/// Each run owns its segment list; there is no shared mutable state across
/// runs. Units are processed in strict left-to-right order because every
/// cue's start time is the cumulative duration of all prior cues.
pub struct SubtitlePipeline {
    clause_breaker: Arc<dyn ClauseBreaker>,
    markup_converter: Arc<dyn MarkupConverter>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mixer: Arc<dyn AudioMixer>,
    subtitle: SubtitleConfig,
    chunk_dir: PathBuf,
    mix_path: PathBuf,
    audio_format: String,
}

impl SubtitlePipeline {
    /// Assemble a pipeline from collaborators and the application config
    pub fn new(
        clause_breaker: Arc<dyn ClauseBreaker>,
        markup_converter: Arc<dyn MarkupConverter>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        mixer: Arc<dyn AudioMixer>,
        config: &Config,
    ) -> Self {
        SubtitlePipeline {
            clause_breaker,
            markup_converter,
            synthesizer,
            mixer,
            subtitle: config.subtitle.clone(),
            chunk_dir: PathBuf::from(&config.synthesis.chunk_dir),
            mix_path: PathBuf::from(&config.synthesis.mix_path),
            audio_format: config.synthesis.format.clone(),
        }
    }

    /// Run the pipeline: script text to subtitle file.
    ///
    /// `pre_split` supplies caller-provided clause units (one per entry),
    /// bypassing the clause breaker. An empty script or unit list
    /// short-circuits to an empty result without invoking any collaborator
    /// or touching the filesystem.
    pub async fn run(
        &self,
        script: &str,
        pre_split: Option<&[String]>,
        ass_path: &Path,
    ) -> Result<PipelineOutput, PipelineError> {
        // 1) Clause units
        let units = match pre_split {
            Some(lines) => segmenter::normalize_units(lines),
            None => self.resolve_units(script).await,
        };
        if units.is_empty() {
            debug!("No units to process, skipping synthesis and emission");
            return Ok(PipelineOutput::empty(ass_path));
        }

        // 2) Per-unit synthesis markup
        let markups = match self.markup_converter.convert_lines(&units).await {
            Ok(m) => reconcile_markups(m, units.len()),
            Err(e) => {
                warn!("Markup conversion failed, continuing unstyled: {}", e);
                vec![String::new(); units.len()]
            }
        };

        // 3) Per-unit synthesis, then one mixed track
        if let Err(e) = fs::create_dir_all(&self.chunk_dir) {
            // Chunk writes will fail per unit and fall back to estimates
            warn!("Cannot create chunk directory {:?}: {}", self.chunk_dir, e);
        }

        let mut chunk_paths = Vec::with_capacity(units.len());
        for (i, (text, markup)) in units.iter().zip(markups.iter()).enumerate() {
            let out = self
                .chunk_dir
                .join(format!("tts_{:03}.{}", i, self.audio_format));

            let speak = if markup.trim().is_empty() {
                // Unstyled fallback still gets speech for the raw text
                format!("<speak>{}</speak>", text)
            } else {
                markup.clone()
            };

            if let Err(e) = self.synthesizer.synthesize(&speak, &out).await {
                warn!("Synthesis failed for unit {}: {}", i + 1, e);
                // Placeholder keeps the chunk list aligned with the units;
                // probing it fails and the duration gets estimated
                let _ = fs::write(&out, b"");
            }
            chunk_paths.push(out);
        }

        if let Err(e) = self.mixer.concat(&chunk_paths, &self.mix_path).await {
            warn!("Audio concatenation failed, continuing without a mix: {}", e);
        }

        // 4) Measured or estimated durations
        let mut durations: Vec<Option<f64>> = Vec::with_capacity(chunk_paths.len());
        for (i, p) in chunk_paths.iter().enumerate() {
            match self.mixer.probe_duration(p).await {
                Ok(d) => durations.push(Some(d)),
                Err(e) => {
                    debug!("Could not measure audio for unit {}: {}", i + 1, e);
                    durations.push(None);
                }
            }
        }

        // 5) Timing
        let segments = timing::build_segments(&units, &markups, &durations);

        // 6) Subtitle file
        let writer = AssWriter::new(&self.subtitle);
        let subtitle_path = writer.write(&segments, ass_path)?;

        info!(
            "Generated {} cue(s) spanning {:.3}s",
            segments.len(),
            segments.last().map(|s| s.end).unwrap_or(0.0)
        );

        Ok(PipelineOutput {
            segments,
            chunk_paths,
            subtitle_path,
        })
    }

    /// Obtain clause units for a script, falling back to the deterministic
    /// sentence split when the clause breaker fails or returns nothing
    async fn resolve_units(&self, script: &str) -> Vec<String> {
        if script.trim().is_empty() {
            return Vec::new();
        }

        match self.clause_breaker.break_script(script).await {
            Ok(lines) => {
                let lines = segmenter::normalize_units(&lines);
                if lines.is_empty() {
                    warn!("Clause breaker returned no units, falling back to sentence split");
                    segmenter::split_to_sentences(script)
                } else {
                    lines
                }
            }
            Err(e) => {
                warn!("Clause breaking failed, falling back to sentence split: {}", e);
                segmenter::split_to_sentences(script)
            }
        }
    }
}

/// Pad or truncate a markup list to the unit count
fn reconcile_markups(mut markups: Vec<String>, unit_count: usize) -> Vec<String> {
    if markups.len() != unit_count {
        warn!(
            "Received {} markup line(s) for {} unit(s), reconciling",
            markups.len(),
            unit_count
        );
        markups.resize(unit_count, crate::collaborators::ssml::EMPTY_MARKUP.to_string());
    }
    markups
}

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::collaborators::chat::ChatClient;
use crate::collaborators::ffmpeg::FfmpegMixer;
use crate::collaborators::linebreak::LlmClauseBreaker;
use crate::collaborators::ssml::LlmMarkupConverter;
use crate::collaborators::tts::HttpSpeechSynthesizer;
use crate::file_utils::FileManager;
use crate::pipeline::SubtitlePipeline;

// @module: Application controller for caption generation

/// Main application controller for subtitle generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Assemble the production pipeline from the configuration
    fn build_pipeline(&self) -> SubtitlePipeline {
        let chat = ChatClient::from_config(&self.config.chat);

        SubtitlePipeline::new(
            Arc::new(LlmClauseBreaker::new(chat.clone())),
            Arc::new(LlmMarkupConverter::new(chat)),
            Arc::new(HttpSpeechSynthesizer::from_config(&self.config.synthesis)),
            Arc::new(FfmpegMixer::new()),
            &self.config,
        )
    }

    /// Generate captions for a single script file.
    ///
    /// The subtitle lands next to the script (stem + `.ass`) unless an
    /// explicit output path is given. An existing output is skipped unless
    /// `force_overwrite` is set.
    pub async fn run(
        &self,
        script_file: PathBuf,
        output_path: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<()> {
        if !FileManager::file_exists(&script_file) {
            return Err(anyhow::anyhow!(
                "Script file does not exist: {:?}",
                script_file
            ));
        }

        let ass_path = output_path
            .unwrap_or_else(|| FileManager::subtitle_output_path(&script_file, "ass"));

        if ass_path.exists() && !force_overwrite {
            warn!(
                "Skipping {:?}, output already exists (use -f to force overwrite)",
                script_file
            );
            return Ok(());
        }

        let script = FileManager::read_to_string(&script_file)
            .with_context(|| format!("Failed to read script: {:?}", script_file))?;

        info!("Generating captions for {:?}", script_file);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Segmenting, synthesizing and timing...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        let pipeline = self.build_pipeline();
        let result = pipeline.run(&script, None, &ass_path).await;
        spinner.finish_and_clear();

        let output = result.with_context(|| format!("Pipeline failed for {:?}", script_file))?;

        if output.segments.is_empty() {
            warn!("Script produced no units, nothing was written");
            return Ok(());
        }

        info!(
            "Wrote {} cue(s) to {:?}",
            output.segments.len(),
            output.subtitle_path
        );
        Ok(())
    }

    /// Generate captions for every script file in a directory
    pub async fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<()> {
        let scripts = FileManager::find_script_files(input_dir)?;

        if scripts.is_empty() {
            warn!("No script files found in {:?}", input_dir);
            return Ok(());
        }

        info!("Processing {} script file(s)", scripts.len());

        let mut processed_count = 0;
        for script in scripts {
            if let Err(e) = self.run(script.clone(), None, force_overwrite).await {
                error!("Error processing {:?}: {}", script, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {} file(s)", processed_count);
        Ok(())
    }
}

// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod collaborators;
mod errors;
mod file_utils;
mod pipeline;
mod prosody;
mod segmenter;
mod subtitle_writer;
mod timing;

/// CLI wrapper for the subtitle template registry to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTemplate {
    Educational,
    Center,
}

impl CliTemplate {
    fn as_registry_name(&self) -> &'static str {
        match self {
            CliTemplate::Educational => "educational",
            CliTemplate::Center => "center",
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate timed ASS captions for a script (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for shortcap
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Script text file or directory of script files to process
    #[arg(value_name = "SCRIPT_PATH")]
    input_path: PathBuf,

    /// Output subtitle file path (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Visual template for the captions
    #[arg(short, long, value_enum)]
    template: Option<CliTemplate>,

    /// Voice preset key or raw voice id
    #[arg(short, long)]
    voice: Option<String>,

    /// Keep trailing sentence punctuation on the final cue
    #[arg(long)]
    keep_trailing_punct: bool,

    /// Maximum characters per caption line
    #[arg(long)]
    max_chars_per_line: Option<usize>,

    /// Maximum caption lines per cue (1 or 2)
    #[arg(long)]
    max_lines: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// shortcap - Short-form Caption Pipeline
///
/// Turns a short-form video script into a styled, time-aligned ASS subtitle
/// file, synthesizing speech per clause to measure cue timing.
#[derive(Parser, Debug)]
#[command(name = "shortcap")]
#[command(version = "0.1.0")]
#[command(about = "Timed caption generator for short-form video")]
#[command(long_about = "shortcap splits a script into breath-sized units, synthesizes speech for
each unit, accumulates cue timing from the measured audio, and emits a styled
ASS subtitle file with pitch-derived caption colors.

EXAMPLES:
    shortcap script.txt                       # Generate script.ass next to the script
    shortcap -o out/captions.ass script.txt   # Explicit output path
    shortcap -t center script.txt             # Use the center template
    shortcap -f scripts/                      # Process a directory, overwriting outputs
    shortcap --log-level debug script.txt     # Verbose logging
    shortcap completions bash > shortcap.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script text file or directory of script files to process
    #[arg(value_name = "SCRIPT_PATH")]
    input_path: Option<PathBuf>,

    /// Output subtitle file path (single-file mode only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Visual template for the captions
    #[arg(short, long, value_enum)]
    template: Option<CliTemplate>,

    /// Voice preset key or raw voice id
    #[arg(short, long)]
    voice: Option<String>,

    /// Keep trailing sentence punctuation on the final cue
    #[arg(long)]
    keep_trailing_punct: bool,

    /// Maximum characters per caption line
    #[arg(long)]
    max_chars_per_line: Option<usize>,

    /// Maximum caption lines per cue (1 or 2)
    #[arg(long)]
    max_lines: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "shortcap", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("SCRIPT_PATH is required when no subcommand is specified"))?;

            let generate_args = GenerateArgs {
                input_path,
                output: cli.output,
                template: cli.template,
                voice: cli.voice,
                keep_trailing_punct: cli.keep_trailing_punct,
                max_chars_per_line: cli.max_chars_per_line,
                max_lines: cli.max_lines,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_generate(generate_args).await
        }
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(template) = &options.template {
        config.subtitle.template = template.as_registry_name().to_string();
    }
    if let Some(voice) = &options.voice {
        config.synthesis.voice = voice.clone();
    }
    if options.keep_trailing_punct {
        config.subtitle.strip_trailing_punct_last = false;
    }
    if let Some(max_chars) = options.max_chars_per_line {
        config.subtitle.max_chars_per_line = max_chars;
    }
    if let Some(max_lines) = options.max_lines {
        config.subtitle.max_lines = max_lines;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the controller with the input file or directory
    if options.input_path.is_file() {
        controller
            .run(options.input_path.clone(), options.output, options.force_overwrite)
            .await?;
    } else if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!(
                "--output cannot be combined with a directory input"
            ));
        }
        controller
            .run_folder(&options.input_path, options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!(
            "Input path does not exist: {:?}",
            options.input_path
        ));
    }

    Ok(())
}

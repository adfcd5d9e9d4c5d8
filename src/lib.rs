/*!
 * # shortcap - Short-form Caption Pipeline
 *
 * A Rust library for turning a short-form video script into a styled,
 * time-aligned ASS subtitle file with synthesized speech timing.
 *
 * ## Features
 *
 * - Deterministic sentence segmentation with LLM-backed clause breaking
 * - Per-unit speech synthesis with graceful per-unit failure handling
 * - Cumulative cue timing with reading-speed duration estimates
 * - Caption sanitization and two-line wrapping for vertical video
 * - Prosody pitch extraction mapped to caption color bands
 * - Exact ASS header/dialogue serialization with named visual templates
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Sentence and clause unit segmentation
 * - `timing`: Timed segment construction and duration estimation
 * - `prosody`: Pitch directive extraction and color banding
 * - `subtitle_writer`: Caption normalization and ASS file emission
 * - `pipeline`: Pipeline orchestration from script to subtitle file
 * - `collaborators`: External service clients:
 *   - `collaborators::chat`: OpenAI-compatible chat-completions client
 *   - `collaborators::linebreak`: LLM clause breaker
 *   - `collaborators::ssml`: LLM markup converter
 *   - `collaborators::tts`: HTTP speech synthesis client
 *   - `collaborators::ffmpeg`: audio probing and concatenation
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod collaborators;
pub mod errors;
pub mod file_utils;
pub mod pipeline;
pub mod prosody;
pub mod segmenter;
pub mod subtitle_writer;
pub mod timing;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, CollaboratorError, PipelineError, SubtitleError};
pub use pipeline::{PipelineOutput, SubtitlePipeline};
pub use subtitle_writer::{AssWriter, Template};
pub use timing::TimedSegment;

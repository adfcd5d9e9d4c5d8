/*!
 * Error types for the shortcap application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when calling an external collaborator
/// (clause breaker, markup converter, speech synthesizer, audio mixer)
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Error when sending a request to a collaborator fails
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing a collaborator response fails
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Error returned by the remote service itself
    #[error("Service responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the service
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error launching or waiting on an external tool (ffmpeg/ffprobe)
    #[error("Tool execution failed: {0}")]
    ToolFailed(String),

    /// Error when an external tool exceeds its allotted time
    #[error("Tool timed out: {0}")]
    ToolTimeout(String),
}

/// Errors that can occur while emitting the subtitle file
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Error creating directories or writing the subtitle file.
    /// There is no fallback for a failed write of the one persisted artifact,
    /// so this aborts the pipeline run.
    #[error("Failed to write subtitle file: {0}")]
    WriteFailed(String),
}

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from a collaborator that has no fallback path
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Error from subtitle emission
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a collaborator
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Error from subtitle emission
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

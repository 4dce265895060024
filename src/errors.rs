/*!
 * Error types for the slidereel application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when a timeline cannot be derived from its inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// The image sequence is empty, so there is nothing to divide the audio across
    #[error("Timeline requires at least one image")]
    NoImages,

    /// The total duration is negative or not a finite number
    #[error("Invalid timeline duration: {0}")]
    InvalidDuration(f64),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file could not be read
    #[error("Failed to read subtitle file: {0}")]
    Io(String),

    /// Strict parsing found malformed cues
    #[error("Subtitle file has {count} malformed cue(s), first: {first}")]
    Strict {
        /// Number of diagnostics collected
        count: usize,
        /// Rendered first diagnostic
        first: String,
    },
}

/// Errors that can occur while gathering project media
#[derive(Error, Debug)]
pub enum MediaError {
    /// Input path does not exist
    #[error("Media path not found: {0:?}")]
    NotFound(PathBuf),

    /// File is not an image, audio or subtitle file
    #[error("Unsupported media file: {0:?}")]
    UnsupportedFile(PathBuf),

    /// Audio duration probing failed
    #[error("Failed to probe audio duration: {0}")]
    ProbeFailed(String),

    /// No audio track was supplied
    #[error("No audio track provided")]
    NoAudio,
}

/// Errors produced by the rendering collaborator
#[derive(Error, Debug)]
pub enum RenderError {
    /// The job has no images
    #[error("No images provided")]
    NoImages,

    /// The job has no audio track
    #[error("No audio track provided")]
    NoAudio,

    /// The rendering engine could not be initialized
    #[error("Could not load video processing engine: {0}")]
    EngineLoad(String),

    /// The job was cancelled before completion
    #[error("Render cancelled")]
    Cancelled,

    /// The timeline could not be derived
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Engine-specific failure
    #[error("Render engine failed: {0}")]
    Engine(String),

    /// Writing render output failed
    #[error("Render output error: {0}")]
    Io(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from timeline derivation
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from media intake
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Error from rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

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

impl From<std::io::Error> for RenderError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

//! Error types for pipeline operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, EyescanError>;

/// Errors that can occur anywhere between input acquisition and scoring
#[derive(Error, Debug)]
pub enum EyescanError {
    /// No usable input was supplied
    #[error("Input error: {0}")]
    Input(String),

    /// The image reference could not be retrieved
    #[error("Failed to fetch image from {url}: {message}")]
    Fetch { url: String, message: String },

    /// The image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Feature extraction failed
    #[error("Vectorization error: {0}")]
    Vectorization(String),

    /// Scoring failed or the model refused to score
    #[error("Inference error: {0}")]
    Inference(String),

    /// No artifact exists at the expected location
    #[error("Model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// An artifact exists but could not be read or written
    #[error("Persistence error at {}: {message}", path.display())]
    Persistence { path: PathBuf, message: String },

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EyescanError {
    pub fn persistence(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        EyescanError::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Load failures that should fall back to bootstrapping a fresh model.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            EyescanError::ArtifactNotFound(_) | EyescanError::Persistence { .. }
        )
    }
}

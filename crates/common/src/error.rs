//! Error types shared across SlideReveal crates.

use std::path::PathBuf;

/// Top-level error type for SlideReveal operations.
#[derive(Debug, thiserror::Error)]
pub enum SlideError {
    /// No usable rasterizer binary was found on any candidate name or path.
    #[error("Missing dependency: none of [{}] could be executed; install Ghostscript", tried.join(", "))]
    MissingDependency { tried: Vec<String> },

    #[error("File not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Background estimation found no background pixel in its sampling region.
    #[error("No background pixels found in the {width}x{height} sampling region")]
    DegenerateSample { width: u32, height: u32 },

    #[error("Rasterize error: {message}")]
    Rasterize { message: String },

    #[error("Document error: {message}")]
    Document { message: String },

    #[error("Compose error: {message}")]
    Compose { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SlideError.
pub type SlideResult<T> = Result<T, SlideError>;

impl SlideError {
    pub fn rasterize(msg: impl Into<String>) -> Self {
        Self::Rasterize {
            message: msg.into(),
        }
    }

    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document {
            message: msg.into(),
        }
    }

    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }
}

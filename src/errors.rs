// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetpipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed stylesheet source. `message` carries the compiler's
    /// rendering of the offending span.
    #[error("Failed to compile {path:?}: {message}")]
    CompileError { path: PathBuf, message: String },

    #[error("CSS post-processing failed for {path:?}: {message}")]
    CssError { path: PathBuf, message: String },

    #[error("Image processing failed for {path:?}: {message}")]
    ImageError { path: PathBuf, message: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AssetpipeError {
    /// True for errors that only concern a single input file.
    ///
    /// Pipelines running in skip mode record these and keep going; anything
    /// else aborts the run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            AssetpipeError::CompileError { .. }
                | AssetpipeError::CssError { .. }
                | AssetpipeError::ImageError { .. }
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AssetpipeError>;

//! Error types for the canvas core and the file loader.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error codes. The `comcad` CLI exits with the magnitude of a load error's code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found (-1)
    FileNotFound = -1,
    /// Extension is not one of .dwg/.dxf/.pdf (-2)
    UnsupportedExtension = -2,
    /// Parser library rejected the file (-3)
    ParseError = -3,
    /// Optional format backend not compiled in (-4)
    MissingDependency = -4,
    /// Invalid grid or snap settings (E100)
    InvalidSettings = 100,
    /// Configuration file could not be read or written (E200)
    ConfigError = 200,
}

/// Errors raised by the canvas core and its configuration.
#[derive(Debug, Error)]
pub enum CadError {
    #[error("Invalid grid spacing {spacing}: must be a finite value greater than zero")]
    InvalidGridSpacing { spacing: f64 },

    #[error("Invalid major line interval {major_every}: must be at least 1")]
    InvalidMajorEvery { major_every: u32 },

    #[error("Invalid snap tolerance {tolerance_px}px: must be a finite value >= 0")]
    InvalidTolerance { tolerance_px: f64 },

    #[error("Invalid view scale {scale}: must be a finite value greater than zero")]
    InvalidScale { scale: f64 },

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CadError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CadError::InvalidGridSpacing { .. }
            | CadError::InvalidMajorEvery { .. }
            | CadError::InvalidTolerance { .. }
            | CadError::InvalidScale { .. } => ErrorCode::InvalidSettings,
            CadError::Json(_) | CadError::Io(_) => ErrorCode::ConfigError,
        }
    }
}

/// Result type alias for canvas and configuration operations.
pub type Result<T> = std::result::Result<T, CadError>;

/// Failure while loading a DWG or PDF file.
///
/// Every loader path ends in either a document or one of these; the loader
/// never panics on bad input.
#[derive(Debug, Clone, Error, serde::Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum LoadError {
    #[error("Unsupported extension: {extension}")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("File not found")]
    FileNotFound { path: PathBuf },

    #[error("{message}")]
    MissingDependency { path: PathBuf, message: String },

    #[error("{message}")]
    ParseFailed {
        path: PathBuf,
        message: String,
        detail: Option<String>,
    },
}

impl LoadError {
    /// Path of the file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::UnsupportedExtension { path, .. }
            | LoadError::FileNotFound { path }
            | LoadError::MissingDependency { path, .. }
            | LoadError::ParseFailed { path, .. } => path,
        }
    }

    /// Human readable message, suitable for a status bar.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Underlying library error, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            LoadError::ParseFailed { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::UnsupportedExtension { .. } => ErrorCode::UnsupportedExtension,
            LoadError::FileNotFound { .. } => ErrorCode::FileNotFound,
            LoadError::MissingDependency { .. } => ErrorCode::MissingDependency,
            LoadError::ParseFailed { .. } => ErrorCode::ParseError,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

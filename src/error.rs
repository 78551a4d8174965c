//! Error types for installer operations.
//!
//! This module defines [`InstallError`], the primary error type used throughout
//! the installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `InstallError` for failures that abort the install sequence
//! - Use `anyhow::Error` (via `InstallError::Other`) for unexpected errors
//! - Advisory conditions (missing framework, optional packages) are not
//!   errors; they surface as [`StepOutcome::Advisory`](crate::installer::StepOutcome)

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The Python interpreter is older than the installer supports.
    #[error("Python {required} is required to run deepdrive, found Python {found}")]
    UnsupportedRuntime { found: String, required: String },

    /// An external command exited non-zero or could not be started.
    #[error("{command} finished with error {message}")]
    CommandExecution {
        command: String,
        message: String,
        code: Option<i32>,
    },

    /// The bindings bucket holds no version for the local major.minor.
    #[error("Could not find a bindings version matching {prefix} in bucket {bucket_url}")]
    NoCompatibleVersion { prefix: String, bucket_url: String },

    /// The local VERSION file is missing or unreadable.
    #[error("Failed to read version file {path}: {message}")]
    VersionFile { path: PathBuf, message: String },

    /// A version string lacks the components we need.
    #[error("Invalid version string: '{value}'")]
    InvalidVersion { value: String },

    /// Failed to parse install.yml.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A request to the bindings bucket failed.
    #[error("Request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, InstallError>;

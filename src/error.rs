//! Error types for setup operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the tool, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `InstallFailure`, `CloneFailure`, `MissingArtifact` and `UserDeclined`
//!   are recoverable: components turn them into a degraded
//!   [`Outcome`](crate::outcome::Outcome) and the run continues
//! - `ToolNotFound` is recoverable everywhere except the project generator
//! - `FatalGeneratorFailure` always halts the run
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The package manager exited non-zero while installing a package.
    #[error("Failed to install package '{package}': {message}")]
    InstallFailure { package: String, message: String },

    /// A git operation exited non-zero.
    #[error("Failed to clone '{repository}': {message}")]
    CloneFailure { repository: String, message: String },

    /// An expected file is absent after an operation that should have produced it.
    #[error("Missing {what}: {path}")]
    MissingArtifact { what: String, path: PathBuf },

    /// The operator answered no to an install prompt.
    #[error("Installation of {component} declined")]
    UserDeclined { component: String },

    /// A required external executable is absent.
    #[error("Required tool '{tool}' not found: {hint}")]
    ToolNotFound { tool: String, hint: String },

    /// The build-file generator is missing or failed.
    #[error("Project generation failed: {message}")]
    FatalGeneratorFailure { message: String, code: Option<i32> },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// A download did not complete.
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// Whether this error must halt the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalGeneratorFailure { .. })
    }
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;

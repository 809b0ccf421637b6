//! Error types for oppdeck operations.
//!
//! This module defines [`OppdeckError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `ToolMissing` is fatal to the interactive session; everything else is
//!   recovered locally (empty option sets, skipped install) and surfaced as
//!   a user-visible message.
//! - Use `anyhow::Error` (via `OppdeckError::Other`) for unexpected errors.
//! - No operation is automatically retried.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for oppdeck operations.
#[derive(Debug, Error)]
pub enum OppdeckError {
    /// The opp_env binary cannot be found or started at all.
    #[error("'{program}' could not be run. Install opp_env (`pip install opp-env`) and make sure it is on PATH")]
    ToolMissing { program: String },

    /// opp_env ran but exited non-zero on a query.
    #[error("'{command}' failed with exit code {code:?}: {stderr}")]
    ToolFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Install target directory unset, missing, or inaccessible.
    #[error("Install directory problem at {path}: {message}")]
    Directory { path: PathBuf, message: String },

    /// No OMNeT++ version is selected; an install needs one.
    #[error("No OMNeT++ version is selected")]
    SelectionMissing,

    /// The install subprocess exited non-zero.
    #[error("Installation failed with exit code {code:?}; check the console output for details")]
    InstallFailed { code: Option<i32> },

    /// An install was requested while another is still running.
    #[error("An installation is already in progress")]
    InstallInProgress,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for oppdeck operations.
pub type Result<T> = std::result::Result<T, OppdeckError>;

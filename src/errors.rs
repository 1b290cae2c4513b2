//! Typed error hierarchy for shipit.
//!
//! Three enums cover the three places where callers need to match on a
//! failure rather than just print it:
//! - `ExecError`: a command could not be started or reaped
//! - `ManifestError`: the release version could not be read
//! - `ScaffoldError`: project generation was refused or failed

use std::path::PathBuf;
use thiserror::Error;

/// Errors from running a single external command.
///
/// A non-zero exit is not an error here: the executor reports it as an exit
/// code and the sequence runner decides what it means.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from reading the version out of the build manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Manifest not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No <version> element found in {path}")]
    MissingVersion { path: PathBuf },
}

/// Errors from generating a new plugin project.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Target directory {path} is not empty (use --force to write into it)")]
    TargetNotEmpty { path: PathBuf },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

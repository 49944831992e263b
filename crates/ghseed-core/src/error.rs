use std::path::PathBuf;

use crate::naming::NameError;

/// Central error type for ghseed.
#[derive(Debug, thiserror::Error)]
pub enum GhseedError {
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        name: String,
        #[source]
        reason: NameError,
    },

    #[error("preflight check failed: {message}")]
    PreflightFailed { message: String },

    #[error("refusing to reuse {path}: {message}")]
    UnsafeReuse { path: PathBuf, message: String },

    #[error("filesystem error at {path}: {message}")]
    Filesystem { path: PathBuf, message: String },

    #[error("git {command} failed: {stderr}")]
    VcsCommandFailed { command: String, stderr: String },

    #[error("gh {command} failed: {stderr}")]
    ProviderCommandFailed { command: String, stderr: String },

    #[error("could not write preferences to {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    #[error("invalid visibility '{value}' (expected 'public' or 'private')")]
    InvalidVisibility { value: String },

    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("selection cancelled: {message}")]
    PromptCancelled { message: String },

    #[error("config error: {message}")]
    Config { message: String },
}

impl GhseedError {
    pub fn filesystem(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        GhseedError::Filesystem {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

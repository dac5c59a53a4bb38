//! Error types for srcgen-config.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A malformed configuration document. Fatal for the resolution
    /// that loaded it; a broken config is a user-visible bug, not a
    /// directory to skip.
    #[error("{}: {message} (line {line}, column {column})", path.display())]
    Parse {
        path: PathBuf,
        message: String,
        line: usize,
        column: usize,
    },

    /// An invalid file-spec glob on a match rule.
    #[error("{}: invalid filespec '{filespec}': {message}", path.display())]
    InvalidFileSpec {
        path: PathBuf,
        filespec: String,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for srcgen-core.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A malformed `_project.xml` file. A missing project file is not
    /// an error; only a present-but-unreadable one is.
    #[error("{}: {message}", path.display())]
    Project { path: PathBuf, message: String },

    /// A generator process could not be started.
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

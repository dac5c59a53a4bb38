/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for srcgen-rewrite.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RewriteError {
    /// A `Guid` attribute received a value that does not parse as a
    /// GUID. Fatal for the file being processed.
    #[error("invalid GUID value '{value}'")]
    InvalidGuid { value: String },

    /// The file is not UTF-8 text (or carries a UTF-16 byte-order
    /// mark). Fatal for the file being processed.
    #[error("{}: unsupported text encoding, expected UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RewriteError>;

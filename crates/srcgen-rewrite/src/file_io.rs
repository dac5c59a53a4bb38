/*
 * file_io.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Encoding-preserving source file IO.
//!
//! Files are read as UTF-8, with or without a byte-order mark; the
//! mark is written back when the file is rewritten. UTF-16 marks and
//! invalid UTF-8 are per-file fatal errors.

use std::path::Path;

use crate::error::{Result, RewriteError};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Source text plus the encoding detail needed to write it back.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub bom: bool,
}

/// Read a source file, detecting and stripping a UTF-8 BOM.
pub fn read_source(path: &Path) -> Result<SourceText> {
    let bytes = std::fs::read(path)?;

    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(RewriteError::Encoding {
            path: path.to_path_buf(),
        });
    }

    let (bom, content) = match bytes.strip_prefix(&UTF8_BOM) {
        Some(rest) => (true, rest),
        None => (false, bytes.as_slice()),
    };

    let text = std::str::from_utf8(content)
        .map_err(|_| RewriteError::Encoding {
            path: path.to_path_buf(),
        })?
        .to_string();

    Ok(SourceText { text, bom })
}

/// Write new text back to a file, unless it is byte-identical to the
/// original. Returns whether a write happened.
pub fn write_if_changed(path: &Path, original: &SourceText, new_text: &str) -> Result<bool> {
    if new_text == original.text {
        return Ok(false);
    }
    let mut bytes = Vec::with_capacity(new_text.len() + 3);
    if original.bom {
        bytes.extend_from_slice(&UTF8_BOM);
    }
    bytes.extend_from_slice(new_text.as_bytes());
    std::fs::write(path, bytes)?;
    Ok(true)
}

/*
 * guid.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! GUID normalization for the `Guid` attribute.

use uuid::Uuid;

use crate::error::{Result, RewriteError};

/// Normalize a GUID value to its canonical lowercase hyphenated form
/// (the "D" format: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
///
/// Accepts the bare 32-digit form, the hyphenated form, and either of
/// those wrapped in braces or parentheses. Anything else is an error;
/// a malformed GUID is fatal for the file that supplied it.
pub fn normalize_guid(value: &str) -> Result<String> {
    let stripped = value
        .trim()
        .trim_start_matches(['{', '('])
        .trim_end_matches(['}', ')']);
    Uuid::try_parse(stripped)
        .map(|uuid| uuid.as_hyphenated().to_string())
        .map_err(|_| RewriteError::InvalidGuid {
            value: value.to_string(),
        })
}

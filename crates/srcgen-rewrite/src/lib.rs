/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Attribute call-site rewriting for assembly-info style source files.
//!
//! The rewriter scans source text for `Identifier(argument)` call
//! sites, where the argument is either a bare alphanumeric-dotted
//! token or a double-quoted string literal, and replaces the arguments
//! of requested attributes with macro-expanded values. Attributes that
//! never matched an existing call site can optionally be appended as
//! new `[assembly: ...]` statements.
//!
//! Each file is processed independently: a fatal problem (an invalid
//! GUID value, a file that is not UTF-8) aborts that file only, and
//! no state is shared between files. Output is written back only when
//! it differs from the input, preserving a UTF-8 byte-order mark when
//! one was present.

mod error;
mod file_io;
mod guid;
mod known;
mod quoting;
mod rewriter;
mod scanner;

pub use error::{Result, RewriteError};
pub use file_io::{SourceText, read_source, write_if_changed};
pub use guid::normalize_guid;
pub use known::{KnownAttribute, WELL_KNOWN};
pub use quoting::{quote, unquote};
pub use rewriter::{AttributeRewriter, FileRewrite, RequestedAttribute, RewriteOutcome};
pub use scanner::{CallSite, identifier_matches, scan_call_sites};

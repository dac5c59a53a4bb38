/*
 * rewriter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The attribute rewriter.
//!
//! Matches requested attributes against scanned call sites, splices in
//! macro-expanded replacement values (re-quoted when the original
//! argument was quoted), and optionally appends `[assembly: ...]`
//! statements for attributes that matched no existing call site.

use std::collections::HashSet;
use std::path::Path;

use srcgen_vars::{Diagnostic, VarResolver, expand, expand_env};

use crate::error::Result;
use crate::file_io::{read_source, write_if_changed};
use crate::guid::normalize_guid;
use crate::known;
use crate::quoting::quote;
use crate::scanner::{identifier_matches, scan_call_sites};

/// An attribute the caller wants stamped into the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedAttribute {
    pub name: String,
    /// Replacement value template. `%NAME%` environment tokens are
    /// expanded first, then `$(...)` macros.
    pub value: String,
}

impl RequestedAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse a `Name=Value` argument as given on a command line.
    pub fn parse(spec: &str) -> Option<Self> {
        let (name, value) = spec.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value))
    }
}

/// The result of rewriting one source text.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub text: String,

    /// Number of existing call sites whose argument was rewritten.
    pub applied: usize,

    /// Names of requested attributes appended as new statements.
    pub appended: Vec<String>,

    /// Unresolved-variable diagnostics from value expansion.
    pub diagnostics: Vec<Diagnostic>,
}

/// The result of rewriting one file on disk.
#[derive(Debug, Clone)]
pub struct FileRewrite {
    /// Whether the file's content differs from the original (and was
    /// written back, unless this was a dry run).
    pub changed: bool,
    pub applied: usize,
    pub appended: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Rewrites attribute call sites against a resolver stack.
///
/// The rewriter itself is stateless between calls; every file is
/// processed independently.
#[derive(Debug)]
pub struct AttributeRewriter<'a> {
    resolver: &'a VarResolver,
    add_missing: bool,
}

impl<'a> AttributeRewriter<'a> {
    pub fn new(resolver: &'a VarResolver) -> Self {
        Self {
            resolver,
            add_missing: false,
        }
    }

    /// Append statements for requested attributes that match no
    /// existing call site.
    pub fn with_add_missing(mut self, add_missing: bool) -> Self {
        self.add_missing = add_missing;
        self
    }

    /// Rewrite source text. Never touches the filesystem.
    pub fn rewrite(
        &self,
        source: &str,
        requested: &[RequestedAttribute],
    ) -> Result<RewriteOutcome> {
        let mut diagnostics = Vec::new();

        // Resolve every requested value once, up front. A GUID that
        // does not parse is fatal for the whole file.
        let mut values = Vec::with_capacity(requested.len());
        for request in requested {
            let expansion = expand(&expand_env(&request.value), self.resolver);
            diagnostics.extend(expansion.diagnostics);
            let value = if identifier_matches(&request.name, "Guid") {
                normalize_guid(&expansion.text)?
            } else {
                expansion.text
            };
            values.push(value);
        }

        let mut edits: Vec<(std::ops::Range<usize>, String)> = Vec::new();
        let mut matched: HashSet<usize> = HashSet::new();
        let mut applied = 0;

        for site in scan_call_sites(source) {
            let Some(index) = requested
                .iter()
                .position(|request| identifier_matches(&site.identifier, &request.name))
            else {
                continue;
            };
            matched.insert(index);
            applied += 1;

            let replacement = if site.quoted {
                quote(&values[index])
            } else {
                values[index].clone()
            };
            if replacement != site.argument {
                edits.push((site.span, replacement));
            }
        }

        // Apply edits back to front so earlier spans stay valid.
        let mut text = source.to_string();
        for (span, replacement) in edits.into_iter().rev() {
            text.replace_range(span, &replacement);
        }

        let mut appended = Vec::new();
        if self.add_missing {
            let missing: Vec<&RequestedAttribute> = requested
                .iter()
                .enumerate()
                .filter(|(index, _)| !matched.contains(index))
                .map(|(_, request)| request)
                .collect();
            if !missing.is_empty() {
                append_missing(&mut text, &missing, &mut appended);
            }
        }

        Ok(RewriteOutcome {
            text,
            applied,
            appended,
            diagnostics,
        })
    }

    /// Rewrite a file in place, unless the result is byte-identical.
    ///
    /// With `dry_run` the file is never written; `changed` still
    /// reports whether a write would have happened.
    pub fn rewrite_file(
        &self,
        path: &Path,
        requested: &[RequestedAttribute],
        dry_run: bool,
    ) -> Result<FileRewrite> {
        let source = read_source(path)?;
        let outcome = self.rewrite(&source.text, requested)?;

        let changed = if dry_run {
            outcome.text != source.text
        } else {
            write_if_changed(path, &source, &outcome.text)?
        };
        tracing::debug!(
            path = %path.display(),
            applied = outcome.applied,
            appended = outcome.appended.len(),
            changed,
            "rewrote attributes"
        );

        Ok(FileRewrite {
            changed,
            applied: outcome.applied,
            appended: outcome.appended,
            diagnostics: outcome.diagnostics,
        })
    }
}

/// Append synthesized statements for attributes that never matched.
///
/// The file's current ending decides the padding: text already ending
/// in a blank line gets none, a single trailing newline gets one more,
/// and no trailing newline gets two. The statements follow a
/// timestamped comment line.
fn append_missing(
    text: &mut String,
    missing: &[&RequestedAttribute],
    appended: &mut Vec<String>,
) {
    if text.ends_with("\n\n") {
        // Already padded.
    } else if text.ends_with('\n') {
        text.push('\n');
    } else {
        text.push_str("\n\n");
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    text.push_str(&format!("// Missing attributes added {timestamp}\n"));

    for request in missing {
        let (name, argument) = match known::find(&request.name) {
            Some(attr) => (attr.full_name, if attr.string_argument { "\"\"" } else { "xxx" }),
            None => (request.name.as_str(), "\"\""),
        };
        text.push_str(&format!("[assembly: {name}({argument})]\n"));
        appended.push(request.name.clone());
        tracing::debug!(attribute = %request.name, "appended missing attribute");
    }
}

/*
 * scanner.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Attribute call-site scanning.
//!
//! A call site is a textual location matching `Identifier(argument)`.
//! The argument is either a double-quoted string literal (backslash
//! escapes allowed) or a bare token of letters, digits, `_` and `.`,
//! possibly empty. The scanner records the exact character span of the
//! argument so the rewriter can splice replacements in place.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static CALL_SITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<ident>[A-Za-z_][A-Za-z0-9_]*)\s*\(\s*(?P<arg>"(?:[^"\\]|\\.)*"|[A-Za-z0-9_.]*)\s*\)"#,
    )
    .expect("call site pattern")
});

/// One matched call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// The matched identifier, as written.
    pub identifier: String,

    /// Whether the argument was a quoted string literal.
    pub quoted: bool,

    /// The raw argument text, including quotes when quoted.
    pub argument: String,

    /// Byte span of the argument within the scanned text.
    pub span: Range<usize>,
}

/// Scan text for attribute call sites, in document order.
pub fn scan_call_sites(text: &str) -> Vec<CallSite> {
    CALL_SITE_RE
        .captures_iter(text)
        .map(|caps| {
            let arg = caps.name("arg").expect("arg group");
            CallSite {
                identifier: caps["ident"].to_string(),
                quoted: arg.as_str().starts_with('"'),
                argument: arg.as_str().to_string(),
                span: arg.range(),
            }
        })
        .collect()
}

/// Whether a call-site identifier names a requested attribute.
///
/// Both sides are compared case-insensitively after stripping a
/// trailing `Attribute` suffix, so `AssemblyVersion` matches call
/// sites written as either `AssemblyVersion` or
/// `AssemblyVersionAttribute`.
pub fn identifier_matches(identifier: &str, requested: &str) -> bool {
    strip_attribute_suffix(identifier).eq_ignore_ascii_case(strip_attribute_suffix(requested))
}

/// Strip a trailing `Attribute` suffix, case-insensitively. A name
/// that is exactly "Attribute" is left alone.
pub(crate) fn strip_attribute_suffix(name: &str) -> &str {
    const SUFFIX: &str = "Attribute";
    if name.len() > SUFFIX.len() && name[name.len() - SUFFIX.len()..].eq_ignore_ascii_case(SUFFIX)
    {
        &name[..name.len() - SUFFIX.len()]
    } else {
        name
    }
}

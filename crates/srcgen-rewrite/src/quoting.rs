/*
 * quoting.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! String-literal quoting for rewritten arguments.
//!
//! Printable ASCII passes through with `"` and `\` escaped, carriage
//! return / line feed / tab use their short escapes, and every other
//! character is written as one or more `\uXXXX` escapes (UTF-16 code
//! units, so characters outside the BMP become a surrogate pair).

use std::fmt::Write as _;

/// Quote a value as a double-quoted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(out, "\\u{unit:04x}").expect("write to string");
                }
            }
        }
    }
    out.push('"');
    out
}

/// Parse a double-quoted string literal produced by [`quote`].
///
/// Returns `None` when the literal is malformed (missing quotes, bad
/// escape, invalid surrogate pairing).
pub fn unquote(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            if c == '"' {
                return None;
            }
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'r' => out.push('\r'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'u' => {
                let unit = read_hex4(&mut chars)?;
                if (0xD800..=0xDBFF).contains(&unit) {
                    // High surrogate: the low half must follow as \uXXXX.
                    if chars.next()? != '\\' || chars.next()? != 'u' {
                        return None;
                    }
                    let low = read_hex4(&mut chars)?;
                    let combined = char::decode_utf16([unit, low]).next()?.ok()?;
                    out.push(combined);
                } else {
                    out.push(char::decode_utf16([unit]).next()?.ok()?);
                }
            }
            _ => return None,
        }
    }
    Some(out)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Option<u16> {
    let mut value = 0u16;
    for _ in 0..4 {
        let digit = chars.next()?.to_digit(16)?;
        value = (value << 4) | digit as u16;
    }
    Some(value)
}

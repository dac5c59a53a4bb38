//! Macro expansion over resolver stacks.
//!
//! The macro grammar is `$(field)` or `$(field:from1=to1:from2=to2...)`.
//! `field` is an identifier of letters, digits, `_`, `-` and `.` (empty
//! is permitted and simply resolves like any other name). Each
//! `from=to` pair is applied as a literal substring replacement to the
//! resolved value, in declaration order, against the progressively
//! modified value. Expansion is a single pass: `$(...)` appearing in a
//! resolved value or replacement pair is never re-expanded.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::resolver::VarResolver;

/// `$(field:name=value:...)`. Pair names exclude `=`, `:` and `)`;
/// pair values exclude `:` and `)`. Anything the pattern does not match
/// (stray `$(`, unbalanced parens) is left untouched by expansion.
static MACRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\((?P<field>[A-Za-z0-9_.\-]*)(?P<pairs>(?::[^=:)]+=[^:)]*)*)\)")
        .expect("macro pattern")
});

/// `%NAME%` environment-style token.
static ENV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(?P<name>[A-Za-z0-9_.()\-]+)%").expect("env token pattern"));

/// A non-fatal problem reported during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The unresolved variable name as written in the macro.
    pub variable: String,
    /// Byte offset of the macro in the input text.
    pub offset: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variable $({})", self.variable)
    }
}

/// The result of expanding a text: the output plus collected diagnostics.
///
/// Expansion never fails; unresolved macros are preserved verbatim in
/// [`text`](Self::text) and reported here, one diagnostic per occurrence.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    /// Whether every macro in the input resolved.
    pub fn fully_resolved(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Expand `$(...)` macros in `text` against `resolver`.
pub fn expand(text: &str, resolver: &VarResolver) -> Expansion {
    let mut out = String::with_capacity(text.len());
    let mut diagnostics = Vec::new();
    let mut last = 0;

    for caps in MACRO_RE.captures_iter(text) {
        let whole = caps.get(0).expect("match");
        out.push_str(&text[last..whole.start()]);
        last = whole.end();

        let field = &caps["field"];
        match resolver.resolve(field) {
            Some(value) => {
                let mut value = value.into_owned();
                for (from, to) in parse_pairs(&caps["pairs"]) {
                    value = value.replace(from, to);
                }
                out.push_str(&value);
            }
            None => {
                diagnostics.push(Diagnostic {
                    variable: field.to_string(),
                    offset: whole.start(),
                });
                out.push_str(whole.as_str());
            }
        }
    }
    out.push_str(&text[last..]);

    Expansion { text: out, diagnostics }
}

/// Split the `:from=to:from=to` tail of a macro into pairs.
///
/// Pair names cannot contain `:` or `=` and values cannot contain `:`,
/// so splitting on the separators is exact.
fn parse_pairs(pairs: &str) -> impl Iterator<Item = (&str, &str)> {
    pairs
        .split(':')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| segment.split_once('='))
}

/// Expand `%NAME%` tokens from the process environment.
///
/// Names are matched against environment variables case-insensitively;
/// unknown names are left verbatim, mirroring macro expansion.
pub fn expand_env(text: &str) -> String {
    if !text.contains('%') {
        return text.to_string();
    }
    let env: Vec<(String, String)> = std::env::vars().collect();
    ENV_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let name = &caps["name"];
            env.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::VarSource;

    fn resolver(pairs: &[(&str, &str)]) -> VarResolver {
        VarResolver::new(vec![VarSource::from_pairs(
            "test",
            pairs.iter().map(|(k, v)| (*k, *v)),
        )])
    }

    #[test]
    fn test_simple_expansion() {
        let r = resolver(&[("Name", "World")]);
        let result = expand("Hello $(Name)!", &r);
        assert_eq!(result.text, "Hello World!");
        assert!(result.fully_resolved());
    }

    #[test]
    fn test_replacement_pairs_apply_sequentially() {
        // a->b runs first, so the c->d pair sees the already-modified value.
        let r = resolver(&[("v", "aa")]);
        let result = expand("$(v:a=b:b=c)", &r);
        assert_eq!(result.text, "cc");

        let r = resolver(&[("path", "bin\\debug")]);
        let result = expand("$(path:\\=/:debug=release)", &r);
        assert_eq!(result.text, "bin/release");
    }

    #[test]
    fn test_unknown_variable_preserved_with_one_diagnostic() {
        let r = resolver(&[]);
        let result = expand("before $(NoSuchVar) after", &r);
        assert_eq!(result.text, "before $(NoSuchVar) after");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].variable, "NoSuchVar");
        assert_eq!(result.diagnostics[0].offset, 7);
    }

    #[test]
    fn test_empty_field_resolves_like_any_other() {
        let r = resolver(&[]);
        let result = expand("$()", &r);
        assert_eq!(result.text, "$()");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].variable, "");
    }

    #[test]
    fn test_malformed_syntax_passes_through() {
        let r = resolver(&[("a", "1")]);
        // Unterminated macro and stray dollar signs are not matches.
        assert_eq!(expand("$(a", &r).text, "$(a");
        assert_eq!(expand("$a)", &r).text, "$a)");
        assert_eq!(expand("100$ (a)", &r).text, "100$ (a)");
    }

    #[test]
    fn test_no_recursive_expansion() {
        let r = resolver(&[("outer", "$(inner)"), ("inner", "x")]);
        let result = expand("$(outer)", &r);
        // Single pass: the resolved value is spliced in verbatim.
        assert_eq!(result.text, "$(inner)");
        assert!(result.fully_resolved());
    }

    #[test]
    fn test_identifier_charset() {
        let r = resolver(&[("a.b-c_d", "ok")]);
        assert_eq!(expand("$(a.b-c_d)", &r).text, "ok");
    }

    #[test]
    fn test_help_expands() {
        let mut source = VarSource::new("args");
        source.set("Version", "1.0");
        let r = VarResolver::new(vec![source]);
        let result = expand("$(help)", &r);
        assert!(result.text.contains("Version"));
        assert!(result.fully_resolved());
    }

    #[test]
    fn test_expand_env_known_and_unknown() {
        // SAFETY: test-local variable name, no concurrent reader cares.
        unsafe { std::env::set_var("SRCGEN_TEST_VAR", "value") };
        assert_eq!(expand_env("x %SRCGEN_TEST_VAR% y"), "x value y");
        assert_eq!(expand_env("x %srcgen_test_var% y"), "x value y");
        assert_eq!(expand_env("%NO_SUCH_VAR_HERE%"), "%NO_SUCH_VAR_HERE%");
        assert_eq!(expand_env("no tokens"), "no tokens");
    }
}

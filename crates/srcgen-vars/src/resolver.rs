//! Ordered, case-insensitive variable sources and the resolver stack.

use std::borrow::Cow;

use indexmap::IndexMap;

/// Reserved variable name that expands to a listing of all known
/// variables instead of a lookup. Compared case-insensitively.
pub const HELP_VARIABLE: &str = "help";

/// A single named mapping of variable names to values.
///
/// Keys are compared case-insensitively and are unique within a source
/// (last write wins). Insertion order is preserved for display purposes.
#[derive(Debug, Clone, Default)]
pub struct VarSource {
    name: String,
    entries: IndexMap<String, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    /// The name as originally written (for help listings).
    name: String,
    value: String,
}

impl VarSource {
    /// Create an empty source with a display name (e.g. "command line").
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    /// The display name of this source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set a variable. Replaces any existing value for the same name,
    /// compared case-insensitively.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let name = key.into();
        self.entries.insert(
            name.to_ascii_lowercase(),
            Entry {
                name,
                value: value.into(),
            },
        );
    }

    /// Look up a variable, case-insensitively.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|e| e.value.as_str())
    }

    /// Variable names as originally written, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name.as_str())
    }

    /// Number of variables in this source.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this source has no variables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a source from `name=value` pairs as given on a command line.
    ///
    /// A pair without `=` defines the name with an empty value.
    pub fn from_defines<I, S>(name: impl Into<String>, defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source = Self::new(name);
        for define in defines {
            let define = define.as_ref();
            match define.split_once('=') {
                Some((key, value)) => source.set(key, value),
                None => source.set(define, ""),
            }
        }
        source
    }

    /// Build a source from key/value pairs, preserving iteration order.
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self::new(name);
        for (key, value) in pairs {
            source.set(key, value);
        }
        source
    }

    /// Build a source from the process environment.
    pub fn from_environment() -> Self {
        Self::from_pairs("environment", std::env::vars())
    }
}

/// An ordered stack of variable sources.
///
/// Lookup proceeds source-by-source in construction order and returns
/// the first hit; the order never changes after construction and
/// sources are never mutated during resolution.
#[derive(Debug, Clone, Default)]
pub struct VarResolver {
    sources: Vec<VarSource>,
}

impl VarResolver {
    /// Create a resolver from sources in priority order (highest first).
    pub fn new(sources: Vec<VarSource>) -> Self {
        Self { sources }
    }

    /// The sources of this resolver, in priority order.
    pub fn sources(&self) -> &[VarSource] {
        &self.sources
    }

    /// Resolve a variable name.
    ///
    /// The reserved name [`HELP_VARIABLE`] produces a synthesized listing
    /// of the known variables instead of a lookup. Everything else is
    /// looked up case-insensitively across the sources, first hit wins.
    pub fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        if name.eq_ignore_ascii_case(HELP_VARIABLE) {
            return Some(Cow::Owned(self.help_text()));
        }
        self.sources
            .iter()
            .find_map(|source| source.get(name))
            .map(Cow::Borrowed)
    }

    /// Render the known variable names, grouped by source in priority
    /// order. Backs the reserved `help` variable.
    fn help_text(&self) -> String {
        let mut out = String::from("available variables:\n");
        for source in &self.sources {
            out.push_str("  ");
            out.push_str(source.name());
            out.push_str(":\n");
            for name in source.names() {
                out.push_str("    ");
                out.push_str(name);
                out.push('\n');
            }
        }
        out
    }
}

/*
 * stamp.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Copyright-year and version-number stamping.
//!
//! Both transforms are pure text rewrites; file IO and no-op write
//! avoidance are the caller's concern.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `Copyright (c) 2019` or `Copyright © 2019-2024`, capturing the
/// marker prefix and the year range.
static COPYRIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<prefix>(?i)copyright(?:\s+(?:\(c\)|©))?\s+)(?P<from>\d{4})(?:\s*-\s*\d{4})?")
        .expect("copyright pattern")
});

/// A quoted dotted version literal inside a version-bearing call site,
/// e.g. `AssemblyFileVersion("1.0.0.0")`.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<prefix>\b(?i)[A-Za-z0-9_]*version[A-Za-z0-9_]*\s*\(\s*")(?P<version>[0-9]+(?:\.[0-9]+){1,3})(?P<suffix>"\s*\))"#,
    )
    .expect("version pattern")
});

/// The result of one stamping transform.
#[derive(Debug, Clone)]
pub struct StampResult {
    pub text: String,
    pub replacements: usize,
}

impl StampResult {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Update copyright year ranges to end at `year`.
///
/// `Copyright (c) 2019` becomes `Copyright (c) 2019-<year>` and an
/// existing range gets its end year replaced; a line already ending at
/// `year` is left alone, so stamping is idempotent. When `owner` is
/// given, only lines mentioning it (case-insensitively) are touched.
pub fn stamp_copyright(text: &str, owner: Option<&str>, year: u32) -> StampResult {
    let owner_lower = owner.map(str::to_lowercase);
    let mut replacements = 0;
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let applies = owner_lower
            .as_ref()
            .is_none_or(|needle| line.to_lowercase().contains(needle));
        if !applies {
            out.push_str(line);
            continue;
        }
        let stamped = COPYRIGHT_RE.replace_all(line, |caps: &Captures<'_>| {
            let from: u32 = caps["from"].parse().unwrap_or(year);
            if from >= year {
                format!("{}{}", &caps["prefix"], &caps["from"])
            } else {
                format!("{}{}-{year}", &caps["prefix"], &caps["from"])
            }
        });
        if stamped != line {
            replacements += 1;
        }
        out.push_str(&stamped);
    }

    StampResult {
        text: out,
        replacements,
    }
}

/// Replace version literals in version-bearing call sites.
pub fn stamp_version(text: &str, version: &str) -> StampResult {
    let mut replacements = 0;
    let text = VERSION_RE.replace_all(text, |caps: &Captures<'_>| {
        if &caps["version"] != version {
            replacements += 1;
        }
        format!("{}{}{}", &caps["prefix"], version, &caps["suffix"])
    });

    StampResult {
        text: text.into_owned(),
        replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_year_gains_range() {
        let result = stamp_copyright("// Copyright (c) 2019 Acme\n", None, 2026);
        assert_eq!(result.text, "// Copyright (c) 2019-2026 Acme\n");
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn test_existing_range_end_is_updated() {
        let result = stamp_copyright("// Copyright © 2019-2024 Acme\n", None, 2026);
        assert_eq!(result.text, "// Copyright © 2019-2026 Acme\n");
    }

    #[test]
    fn test_copyright_stamping_is_idempotent() {
        let once = stamp_copyright("// Copyright (c) 2019 Acme\n", None, 2026);
        let twice = stamp_copyright(&once.text, None, 2026);
        assert_eq!(once.text, twice.text);
        assert_eq!(twice.replacements, 0);
    }

    #[test]
    fn test_owner_filter_limits_lines() {
        let text = "// Copyright (c) 2020 Acme\n// Copyright (c) 2020 Other\n";
        let result = stamp_copyright(text, Some("acme"), 2026);
        assert_eq!(
            result.text,
            "// Copyright (c) 2020-2026 Acme\n// Copyright (c) 2020 Other\n"
        );
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn test_current_year_is_left_alone() {
        let result = stamp_copyright("// Copyright (c) 2026 Acme\n", None, 2026);
        assert_eq!(result.text, "// Copyright (c) 2026 Acme\n");
        assert_eq!(result.replacements, 0);
    }

    #[test]
    fn test_version_stamping_targets_version_call_sites() {
        let text = concat!(
            "[assembly: AssemblyVersion(\"1.0.0.0\")]\n",
            "[assembly: AssemblyFileVersion(\"1.0.0.0\")]\n",
            "[assembly: AssemblyTitle(\"1.0.0.0\")]\n",
        );
        let result = stamp_version(text, "2.5.0.0");
        assert_eq!(
            result.text,
            concat!(
                "[assembly: AssemblyVersion(\"2.5.0.0\")]\n",
                "[assembly: AssemblyFileVersion(\"2.5.0.0\")]\n",
                "[assembly: AssemblyTitle(\"1.0.0.0\")]\n",
            )
        );
        assert_eq!(result.replacements, 2);
    }

    #[test]
    fn test_version_stamping_is_idempotent() {
        let once = stamp_version("[assembly: AssemblyVersion(\"1.0.0.0\")]\n", "2.0.0");
        let twice = stamp_version(&once.text, "2.0.0");
        assert_eq!(once.text, twice.text);
        assert_eq!(twice.replacements, 0);
    }
}

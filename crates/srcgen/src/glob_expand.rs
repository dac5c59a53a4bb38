use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expand glob patterns into a list of file paths
///
/// If a pattern doesn't contain glob characters (*, ?, [, ]),
/// treat it as a literal path.
pub fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let paths = glob::glob(pattern)
                .with_context(|| format!("Invalid glob pattern: {}", pattern))?;

            let mut match_count = 0;
            for path in paths {
                let path =
                    path.with_context(|| format!("Failed to read glob match for: {}", pattern))?;
                files.push(path);
                match_count += 1;
            }

            if match_count == 0 {
                eprintln!("Warning: No files matched pattern: {}", pattern);
            }
        } else {
            let path = PathBuf::from(pattern);
            if !path.exists() {
                anyhow::bail!("File not found: {}", pattern);
            }
            files.push(path);
        }
    }

    Ok(files)
}

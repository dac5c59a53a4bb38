//! Directory-ascent resolution of generator bindings.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::cache::ConfigCache;
use crate::error::{ConfigError, Result};
use crate::types::{CONFIG_FILENAME, GeneratorBinding, MatchRule};

/// Resolve the ordered generator bindings for one input file.
///
/// Walks from the input file's directory up toward the filesystem
/// root. Each directory contributes at most one configuration file,
/// whose rules are evaluated in document order. Generators accumulate
/// closest-directory first; a generator claiming an output extension
/// that is already claimed is skipped. A matching rule with
/// `stop="true"` halts the ascent after its directory's remaining
/// rules have been evaluated.
///
/// Bindings are rebuilt fresh on every call; only the parsed documents
/// are reused, through `cache`.
pub fn resolve_bindings(input: &Path, cache: &mut ConfigCache) -> Result<Vec<GeneratorBinding>> {
    let Some(file_name) = input.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Ok(Vec::new());
    };
    let Some(input_dir) = input.parent() else {
        return Ok(Vec::new());
    };

    let mut bindings = Vec::new();
    let mut claimed: Vec<String> = Vec::new();
    let mut dir = Some(input_dir);

    while let Some(current) = dir {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let config = cache.load(&config_path)?;
            let mut stop = false;

            for rule in &config.rules {
                if !rule_matches(rule, &file_name, input_dir, current, &config.path)? {
                    continue;
                }
                if rule.stop {
                    stop = true;
                }

                for generator in &rule.generators {
                    let extensions: Vec<String> = generator
                        .output_extensions()
                        .map(|e| e.to_ascii_lowercase())
                        .collect();
                    if let Some(taken) = extensions.iter().find(|e| claimed.contains(*e)) {
                        tracing::debug!(
                            command = %generator.command,
                            extension = %taken,
                            "skipping generator, output extension already claimed"
                        );
                        continue;
                    }
                    claimed.extend(extensions);
                    bindings.push(GeneratorBinding {
                        config_dir: current.to_path_buf(),
                        generator: generator.clone(),
                    });
                }
            }

            if stop {
                tracing::debug!(dir = %current.display(), "stop rule halts config search");
                break;
            }
        }

        dir = current.parent();
    }

    Ok(bindings)
}

/// Whether a rule applies to the input file.
///
/// The file name must match the rule's glob file-spec
/// (case-insensitive), and when the rule declares scope folders the
/// input file's directory must fall under at least one of them.
fn rule_matches(
    rule: &MatchRule,
    file_name: &str,
    input_dir: &Path,
    config_dir: &Path,
    config_path: &Path,
) -> Result<bool> {
    let pattern = Pattern::new(&rule.filespec).map_err(|e| ConfigError::InvalidFileSpec {
        path: config_path.to_path_buf(),
        filespec: rule.filespec.clone(),
        message: e.to_string(),
    })?;
    let options = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };
    if !pattern.matches_with(file_name, options) {
        return Ok(false);
    }

    if rule.folders.is_empty() {
        return Ok(true);
    }
    Ok(rule
        .folders
        .iter()
        .any(|folder| folder_contains(folder, input_dir, config_dir)))
}

/// Case-insensitive prefix containment of `dir` under a scope folder.
///
/// The folder may use `%NAME%` environment tokens; a relative folder is
/// anchored at the configuration file's directory. Both sides are
/// normalized to forward slashes and terminated with a separator
/// before comparison, so `/a/bc` never matches a scope of `/a/b`.
fn folder_contains(folder: &str, dir: &Path, config_dir: &Path) -> bool {
    let expanded = srcgen_vars::expand_env(folder);
    let scope = if Path::new(&expanded).is_relative() {
        config_dir.join(&expanded)
    } else {
        expanded.into()
    };
    normalized(dir).starts_with(&normalized(&scope))
}

fn normalized(path: &Path) -> String {
    let mut s = path.to_string_lossy().replace('\\', "/").to_lowercase();
    if !s.ends_with('/') {
        s.push('/');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_containment() {
        let config_dir = Path::new("/projects");
        assert!(folder_contains("/projects/svc", Path::new("/projects/svc/api"), config_dir));
        assert!(folder_contains("/projects/svc", Path::new("/Projects/SVC"), config_dir));
        assert!(!folder_contains("/projects/svc", Path::new("/projects/svc2"), config_dir));
        // Relative scopes anchor at the config file's directory.
        assert!(folder_contains("svc", Path::new("/projects/svc/api"), config_dir));
        assert!(!folder_contains("svc", Path::new("/other/svc"), config_dir));
    }
}

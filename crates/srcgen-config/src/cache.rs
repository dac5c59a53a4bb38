//! Caller-owned cache of parsed configuration documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::error::Result;
use crate::parser::parse_config;
use crate::types::ConfigFile;

/// Caches parsed `_srcgen.xml` documents keyed by path and
/// last-modified time.
///
/// The cache is plain state owned by whoever drives a batch; nothing
/// here is process-global. A changed timestamp invalidates the entry
/// and the document is reparsed on the next load.
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    modified: SystemTime,
    config: Arc<ConfigFile>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file through the cache.
    ///
    /// Returns the cached document when the file's modification time is
    /// unchanged; otherwise reads and reparses it. Parse failures are
    /// not cached.
    pub fn load(&mut self, path: &Path) -> Result<Arc<ConfigFile>> {
        let modified = std::fs::metadata(path)?.modified()?;

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                tracing::debug!(path = %path.display(), "config cache hit");
                return Ok(Arc::clone(&entry.config));
            }
        }

        let content = std::fs::read_to_string(path)?;
        let config = Arc::new(parse_config(&content, path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                config: Arc::clone(&config),
            },
        );
        Ok(config)
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

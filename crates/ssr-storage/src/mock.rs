//! Mock loader implementation for testing.
//!
//! Provides [`MockLoader`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::loader::{LoaderError, ResourceLoader};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock loader for testing.
///
/// Stores files in memory and records how often each path was read or
/// checked, so callers can assert on cache behavior.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use ssr_storage::{MockLoader, ResourceLoader};
///
/// let loader = MockLoader::new().with_file("/dist/index.html", "<html></html>");
///
/// assert!(loader.exists(Path::new("/dist/index.html")));
/// assert_eq!(loader.read_count(Path::new("/dist/index.html")), 0);
/// loader.read_to_string(Path::new("/dist/index.html")).unwrap();
/// assert_eq!(loader.read_count(Path::new("/dist/index.html")), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockLoader {
    files: RwLock<HashMap<PathBuf, String>>,
    reads: RwLock<HashMap<PathBuf, usize>>,
    exists_checks: RwLock<HashMap<PathBuf, usize>>,
}

impl MockLoader {
    /// Create a new empty mock loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Number of `read_to_string` calls for `path`, including failed ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn read_count(&self, path: &Path) -> usize {
        self.reads.read().unwrap().get(path).copied().unwrap_or(0)
    }

    /// Number of `exists` calls for `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn exists_count(&self, path: &Path) -> usize {
        self.exists_checks
            .read()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Total number of `read_to_string` calls across all paths.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_reads(&self) -> usize {
        self.reads.read().unwrap().values().sum()
    }
}

impl ResourceLoader for MockLoader {
    fn read_to_string(&self, path: &Path) -> Result<String, LoaderError> {
        *self
            .reads
            .write()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default() += 1;

        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| LoaderError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        *self
            .exists_checks
            .write()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default() += 1;

        self.files.read().unwrap().contains_key(path)
    }
}

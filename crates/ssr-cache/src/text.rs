//! File contents memoization.

use std::path::Path;

use ssr_storage::{LoaderError, ResourceLoader};

use crate::MemoCache;

/// Memoizes file contents read through a [`ResourceLoader`].
///
/// Populated on first read, never invalidated. Read failures are returned
/// to the caller and not cached.
#[derive(Debug, Default)]
pub struct TextCache {
    memo: MemoCache<String>,
}

/// Cache of document templates keyed by document file path.
pub type TemplateCache = TextCache;

/// Cache of stylesheet and font resources used during critical-CSS inlining.
pub type ResourceCache = TextCache;

impl TextCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached contents of `path`, reading it through `loader` on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] if the file can't be read.
    pub fn get_or_read(
        &self,
        path: &Path,
        loader: &dyn ResourceLoader,
    ) -> Result<String, LoaderError> {
        self.memo.get_or_try_insert_with(path, || {
            tracing::debug!(path = %path.display(), "Text cache miss");
            loader.read_to_string(path)
        })
    }

    /// Cached contents of `path`, if already read.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<String> {
        self.memo.get(path)
    }

    /// Number of cached files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    /// Returns `true` if no file has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

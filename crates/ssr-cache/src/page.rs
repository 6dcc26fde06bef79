//! Memoized existence checks for pre-rendered pages.

use std::path::Path;
use std::sync::Arc;

use ssr_storage::ResourceLoader;

use crate::MemoCache;

/// Memoizes whether a statically generated page exists on disk.
///
/// The first call for a path asks the loader; later calls return the
/// memoized answer, including negative ones. Correctness relies on the
/// static output directory not changing while the process runs.
pub struct StaticPageCache {
    loader: Arc<dyn ResourceLoader>,
    memo: MemoCache<bool>,
}

impl StaticPageCache {
    /// Create a cache wrapping `loader`'s existence check.
    #[must_use]
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            loader,
            memo: MemoCache::new(),
        }
    }

    /// Check whether `path` exists, memoizing the answer.
    pub fn exists(&self, path: &Path) -> bool {
        if let Some(known) = self.memo.get(path) {
            return known;
        }

        let exists = self.loader.exists(path);
        tracing::debug!(path = %path.display(), exists, "Static page lookup");
        self.memo.insert(path.to_path_buf(), exists);
        exists
    }
}

impl std::fmt::Debug for StaticPageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticPageCache")
            .field("memo", &self.memo)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use ssr_storage::MockLoader;

    use super::*;

    static_assertions::assert_impl_all!(StaticPageCache: Send, Sync);

    #[test]
    fn test_exists_checks_once() {
        let loader = Arc::new(MockLoader::new().with_file("/dist/about/index.html", "about"));
        let cache = StaticPageCache::new(Arc::clone(&loader) as Arc<dyn ResourceLoader>);
        let path = Path::new("/dist/about/index.html");

        assert!(cache.exists(path));
        assert!(cache.exists(path));
        assert_eq!(loader.exists_count(path), 1);
    }

    #[test]
    fn test_negative_answer_is_memoized() {
        let loader = Arc::new(MockLoader::new());
        let cache = StaticPageCache::new(Arc::clone(&loader) as Arc<dyn ResourceLoader>);
        let path = Path::new("/dist/contact/index.html");

        assert!(!cache.exists(path));
        loader.insert("/dist/contact/index.html", "late");

        // Never invalidated within the process lifetime
        assert!(!cache.exists(path));
        assert_eq!(loader.exists_count(path), 1);
    }
}

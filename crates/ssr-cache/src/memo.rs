//! Generic path-keyed memo table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Path-keyed memo table without eviction.
///
/// Values are cloned out on every hit, so `V` should be cheap to clone
/// (`bool`, `String`, `Arc<_>`).
#[derive(Debug)]
pub struct MemoCache<V> {
    entries: RwLock<HashMap<PathBuf, V>>,
}

impl<V> Default for MemoCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> MemoCache<V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a memoized value.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn get(&self, key: &Path) -> Option<V> {
        self.entries.read().unwrap().get(key).cloned()
    }

    /// Store a value, replacing any previous one.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn insert(&self, key: PathBuf, value: V) {
        self.entries.write().unwrap().insert(key, value);
    }

    /// Return the memoized value for `key`, computing it with `compute` on a miss.
    ///
    /// Failed computations are not memoized; the next call retries.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returns on failure.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: &Path,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        // Lock released while computing
        let value = compute()?;
        self.insert(key.to_path_buf(), value.clone());
        Ok(value)
    }

    /// Number of memoized entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if nothing has been memoized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

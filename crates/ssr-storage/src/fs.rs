//! Filesystem loader implementation.

use std::fs;
use std::path::Path;

use crate::loader::{LoaderError, ResourceLoader};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// [`ResourceLoader`] backed by the local filesystem.
///
/// Stateless: every call hits the filesystem. Memoization is the job of the
/// caches layered on top (see `ssr-cache`).
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl FsLoader {
    /// Create a new filesystem loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResourceLoader for FsLoader {
    fn read_to_string(&self, path: &Path) -> Result<String, LoaderError> {
        tracing::debug!(path = %path.display(), "Reading resource");
        fs::read_to_string(path).map_err(|e| LoaderError::io(e, path).with_backend(BACKEND))
    }

    fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).is_ok_and(|m| m.is_file())
    }
}

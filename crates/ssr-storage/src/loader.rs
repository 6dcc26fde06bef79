//! Loader trait and error types.

use std::path::{Path, PathBuf};

/// Semantic error categories for resource reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoaderErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource exists but is not valid UTF-8.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Resource loading error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct LoaderError {
    /// Semantic error category.
    pub kind: LoaderErrorKind,
    /// Path that failed to load.
    pub path: PathBuf,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LoaderError {
    /// Create a new loader error for `path`.
    #[must_use]
    pub fn new(kind: LoaderErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            backend: None,
            source: None,
        }
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(LoaderErrorKind::NotFound, path)
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a loader error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: &Path) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => LoaderErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => LoaderErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => LoaderErrorKind::InvalidData,
            _ => LoaderErrorKind::Other,
        };
        Self::new(kind, path).with_source(err)
    }

    /// Returns `true` if the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == LoaderErrorKind::NotFound
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            LoaderErrorKind::NotFound => "Not found",
            LoaderErrorKind::PermissionDenied => "Permission denied",
            LoaderErrorKind::InvalidData => "Invalid data",
            LoaderErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        write!(f, " (path: {})", self.path.display())
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only access to build output.
///
/// Paths are filesystem paths as given by the caller; implementations do
/// not resolve them against any root.
pub trait ResourceLoader: Send + Sync {
    /// Read a resource as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError`] if the resource doesn't exist or can't be read.
    fn read_to_string(&self, path: &Path) -> Result<String, LoaderError>;

    /// Check whether a regular file exists at `path`.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, path: &Path) -> bool;
}

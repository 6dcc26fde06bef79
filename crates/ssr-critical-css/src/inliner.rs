//! Inliner collaborator interface.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use ssr_cache::ResourceCache;
use ssr_storage::{LoaderError, ResourceLoader};

/// How deferred stylesheets are loaded once the critical subset is inlined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preload {
    /// `media="print"` swapped to `all` on load.
    #[default]
    Media,
    /// `rel="preload"` swapped to `stylesheet` on load.
    Swap,
}

/// Settings handed to the inliner on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlinerSettings {
    /// Directory stylesheets are resolved against.
    pub path: PathBuf,
    /// URL prefix the stylesheets are deployed under.
    pub public_path: String,
    /// Minify inlined CSS.
    pub compress: bool,
    /// Remove inlined rules from the source stylesheet.
    pub prune_source: bool,
    /// Process existing `<style>` blocks too.
    pub reduce_inline_styles: bool,
    /// Merge all inlined CSS into a single `<style>`.
    pub merge_stylesheets: bool,
    pub preload: Preload,
    /// Emit a `<noscript>` fallback for each deferred stylesheet.
    pub noscript_fallback: bool,
    /// Inline critical `@font-face` rules.
    pub inline_fonts: bool,
}

impl InlinerSettings {
    /// Settings used for server rendering: only the path, deploy URL and
    /// minification vary between calls.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, public_path: impl Into<String>, compress: bool) -> Self {
        Self {
            path: path.into(),
            public_path: public_path.into(),
            compress,
            prune_source: false,
            reduce_inline_styles: false,
            merge_stylesheets: false,
            preload: Preload::Media,
            noscript_fallback: true,
            inline_fonts: true,
        }
    }
}

/// Per-call context given to a [`CssInliner`].
///
/// Resource reads go through the processor's shared cache. Warnings and
/// errors are collected for this call only.
pub struct InlineSession<'a> {
    settings: InlinerSettings,
    loader: &'a dyn ResourceLoader,
    resources: &'a ResourceCache,
    warnings: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl<'a> InlineSession<'a> {
    pub(crate) fn new(
        settings: InlinerSettings,
        loader: &'a dyn ResourceLoader,
        resources: &'a ResourceCache,
    ) -> Self {
        Self {
            settings,
            loader,
            resources,
            warnings: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &InlinerSettings {
        &self.settings
    }

    /// Read a stylesheet or font, memoized for the processor's lifetime.
    pub fn read_resource(&self, path: &Path) -> Result<String, LoaderError> {
        self.resources.get_or_read(path, self.loader)
    }

    /// Record a warning.
    pub fn warn(&self, message: impl Into<String>) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.into());
    }

    /// Record an error.
    pub fn error(&self, message: impl Into<String>) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.into());
    }

    pub(crate) fn into_messages(self) -> (Vec<String>, Vec<String>) {
        (
            self.warnings
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            self.errors.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

/// Critical CSS inliner.
///
/// Implementations rewrite `html` so that the CSS needed for first paint is
/// inlined. Failures are reported through [`InlineSession::error`]; the
/// returned HTML is used as-is.
pub trait CssInliner: Send + Sync {
    fn inline(&self, html: &str, session: &InlineSession<'_>) -> String;
}

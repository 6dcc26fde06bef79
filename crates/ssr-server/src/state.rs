//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use ssr_engine::{CommonEngine, ShellRenderer};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Rendering engine; owns the process-lifetime caches.
    pub(crate) engine: CommonEngine<ShellRenderer>,
    /// Browser build output directory.
    pub(crate) public_path: PathBuf,
    /// Document template file.
    pub(crate) document_path: PathBuf,
    /// Inline critical CSS into rendered pages.
    pub(crate) inline_critical_css: bool,
    /// Host used in request URLs when the `Host` header is missing.
    pub(crate) default_host: String,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}

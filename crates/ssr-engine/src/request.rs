use std::path::PathBuf;

use crate::provider::Provider;

/// Root the application is bootstrapped from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapTarget {
    /// Server module, bootstrapped through the module platform.
    Module(String),
    /// Standalone application entry point.
    Application(String),
}

impl BootstrapTarget {
    /// Name of the module or application.
    pub fn name(&self) -> &str {
        match self {
            Self::Module(name) | Self::Application(name) => name,
        }
    }
}

/// Options for a single render.
///
/// One of [`document`](Self::document) or
/// [`document_file_path`](Self::document_file_path) must be set; an inline
/// document takes precedence.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Absolute request URL.
    pub url: Option<String>,
    /// Used when the engine has no bootstrap target of its own.
    pub bootstrap: Option<BootstrapTarget>,
    /// Inline document template.
    pub document: Option<String>,
    /// Document template file.
    pub document_file_path: Option<PathBuf>,
    /// Directory holding browser build output and pre-rendered pages.
    pub public_path: Option<PathBuf>,
    /// Extra providers, placed before the engine's own.
    pub providers: Vec<Provider>,
    /// Inline critical CSS into the rendered HTML. Defaults to `true`.
    pub inline_critical_css: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            url: None,
            bootstrap: None,
            document: None,
            document_file_path: None,
            public_path: None,
            providers: Vec::new(),
            inline_critical_css: true,
        }
    }
}

impl RenderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: BootstrapTarget) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    #[must_use]
    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    #[must_use]
    pub fn with_document_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.document_file_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_public_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    #[must_use]
    pub fn with_inline_critical_css(mut self, enabled: bool) -> Self {
        self.inline_critical_css = enabled;
        self
    }
}

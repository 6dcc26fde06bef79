//! Critical CSS processor.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use ssr_cache::ResourceCache;
use ssr_storage::ResourceLoader;

use crate::inliner::{CssInliner, InlineSession, InlinerSettings};
use crate::stylesheet::StylesheetInliner;

/// Per-call processing options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Directory stylesheets are resolved against.
    pub output_path: PathBuf,
    /// URL prefix the assets are deployed under.
    pub deploy_url: String,
    /// Minify inlined CSS.
    pub minify: bool,
}

/// Outcome of [`CriticalCssProcessor::process`].
///
/// `warnings` and `errors` are `None` when nothing was reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineCriticalCssResult {
    pub content: String,
    pub warnings: Option<Vec<String>>,
    pub errors: Option<Vec<String>>,
}

/// Runs a [`CssInliner`] with a resource cache shared across calls.
pub struct CriticalCssProcessor {
    inliner: Arc<dyn CssInliner>,
    loader: Arc<dyn ResourceLoader>,
    resources: ResourceCache,
}

impl CriticalCssProcessor {
    /// Create a processor around a custom inliner.
    #[must_use]
    pub fn new(inliner: Arc<dyn CssInliner>, loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            inliner,
            loader,
            resources: ResourceCache::new(),
        }
    }

    /// Create a processor using the built-in [`StylesheetInliner`].
    #[must_use]
    pub fn with_stylesheet_inliner(loader: Arc<dyn ResourceLoader>) -> Self {
        Self::new(Arc::new(StylesheetInliner::new()), loader)
    }

    /// Inline critical CSS into `html`.
    pub fn process(&self, html: &str, options: &ProcessOptions) -> InlineCriticalCssResult {
        let settings = InlinerSettings::new(
            options.output_path.clone(),
            options.deploy_url.clone(),
            options.minify,
        );
        let session = InlineSession::new(settings, self.loader.as_ref(), &self.resources);

        let content = self.inliner.inline(html, &session);
        let (warnings, errors) = session.into_messages();

        InlineCriticalCssResult {
            content,
            warnings: non_empty(warnings),
            errors: non_empty(errors),
        }
    }

    /// Number of resources read so far.
    #[must_use]
    pub fn cached_resources(&self) -> usize {
        self.resources.len()
    }
}

impl fmt::Debug for CriticalCssProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriticalCssProcessor")
            .field("resources", &self.resources.len())
            .finish_non_exhaustive()
    }
}

fn non_empty(messages: Vec<String>) -> Option<Vec<String>> {
    (!messages.is_empty()).then_some(messages)
}

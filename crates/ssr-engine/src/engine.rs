//! Render orchestration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use regex::Regex;
use ssr_cache::{StaticPageCache, TemplateCache};
use ssr_critical_css::{CriticalCssProcessor, ProcessOptions};
use ssr_storage::ResourceLoader;

use crate::error::EngineError;
use crate::paths::{normalize, static_page_path};
use crate::provider::Provider;
use crate::renderer::PlatformRenderer;
use crate::request::{BootstrapTarget, RenderRequest};

/// Deferred-stylesheet markup left in templates by build-time inlining.
///
/// The link is restored to a plain stylesheet so that it is inlined again
/// against the rendered markup.
static MEDIA_SWAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#" media="print" onload="this\.media='all'"><noscript><link .+?></noscript>"#)
        .unwrap()
});

/// Server-side rendering engine.
///
/// Holds the page, template and stylesheet caches for its whole lifetime;
/// share one instance across requests behind an [`Arc`].
pub struct CommonEngine<R> {
    renderer: R,
    loader: Arc<dyn ResourceLoader>,
    bootstrap: Option<BootstrapTarget>,
    providers: Vec<Provider>,
    templates: TemplateCache,
    pages: StaticPageCache,
    critical_css: CriticalCssProcessor,
    minify: bool,
    deploy_url: String,
}

impl<R: PlatformRenderer> CommonEngine<R> {
    /// Create an engine using the built-in stylesheet inliner.
    pub fn new(renderer: R, loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            renderer,
            pages: StaticPageCache::new(Arc::clone(&loader)),
            critical_css: CriticalCssProcessor::with_stylesheet_inliner(Arc::clone(&loader)),
            loader,
            bootstrap: None,
            providers: Vec::new(),
            templates: TemplateCache::new(),
            minify: false,
            deploy_url: String::new(),
        }
    }

    /// Bind a bootstrap target. It takes precedence over the request's.
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: BootstrapTarget) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Providers appended after each request's own providers.
    #[must_use]
    pub fn with_providers(mut self, providers: Vec<Provider>) -> Self {
        self.providers = providers;
        self
    }

    /// Replace the critical CSS processor.
    #[must_use]
    pub fn with_critical_css(mut self, processor: CriticalCssProcessor) -> Self {
        self.critical_css = processor;
        self
    }

    /// Minify inlined critical CSS.
    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// URL prefix stylesheets are deployed under.
    #[must_use]
    pub fn with_deploy_url(mut self, deploy_url: impl Into<String>) -> Self {
        self.deploy_url = deploy_url.into();
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render `request` to HTML.
    ///
    /// Template, page and stylesheet reads go through the synchronous
    /// [`ResourceLoader`] on the calling task. The loader must be fast (local
    /// disk, memory); slow backends should wrap the call in
    /// `tokio::task::spawn_blocking`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::MissingBootstrap`] if neither the engine nor the
    ///   request names a bootstrap target. Checked before any I/O.
    /// - [`EngineError::MissingDocument`] if the request has no document.
    /// - [`EngineError::Io`] if a template or pre-rendered page can't be read.
    /// - [`EngineError::Render`] if the renderer fails.
    ///
    /// Critical CSS problems are logged and never fail the render.
    pub async fn render(&self, request: RenderRequest) -> Result<String, EngineError> {
        let bootstrap = self
            .bootstrap
            .as_ref()
            .or(request.bootstrap.as_ref())
            .cloned()
            .ok_or(EngineError::MissingBootstrap)?;

        if let Some(page) = self.retrieve_static_page(&request) {
            tracing::debug!(path = %page.display(), "Serving pre-rendered page");
            return Ok(self.loader.read_to_string(&page)?);
        }

        let mut providers = Vec::with_capacity(request.providers.len() + self.providers.len() + 2);
        providers.push(Provider::server_context());
        providers.extend(request.providers.iter().cloned());
        providers.extend(self.providers.iter().cloned());

        let mut document = self.resolve_document(&request)?;
        if request.inline_critical_css {
            document = MEDIA_SWAP_RE.replace_all(&document, ">").into_owned();
        }
        providers.push(Provider::initial_config(&document, request.url.as_deref()));

        tracing::debug!(
            bootstrap = bootstrap.name(),
            url = request.url.as_deref().unwrap_or_default(),
            "Rendering"
        );
        let html = self
            .renderer
            .render(&bootstrap, &providers)
            .await
            .map_err(EngineError::Render)?;

        if !request.inline_critical_css {
            return Ok(html);
        }

        Ok(self.inline_critical_css(&html, &request))
    }

    /// Pre-rendered page for the request, if one exists and is not the
    /// document template itself.
    fn retrieve_static_page(&self, request: &RenderRequest) -> Option<PathBuf> {
        let (Some(public_path), Some(document_file_path), Some(url)) = (
            request.public_path.as_deref(),
            request.document_file_path.as_deref(),
            request.url.as_deref(),
        ) else {
            return None;
        };

        let page = static_page_path(public_path, url)?;
        if page == normalize(document_file_path) {
            return None;
        }

        self.pages.exists(&page).then_some(page)
    }

    fn resolve_document(&self, request: &RenderRequest) -> Result<String, EngineError> {
        if let Some(document) = &request.document {
            return Ok(document.clone());
        }
        let path = request
            .document_file_path
            .as_deref()
            .ok_or(EngineError::MissingDocument)?;
        Ok(self.templates.get_or_read(path, self.loader.as_ref())?)
    }

    fn inline_critical_css(&self, html: &str, request: &RenderRequest) -> String {
        let output_path = request
            .public_path
            .clone()
            .or_else(|| {
                request
                    .document_file_path
                    .as_deref()
                    .and_then(Path::parent)
                    .map(Path::to_path_buf)
            })
            .unwrap_or_default();

        let result = self.critical_css.process(
            html,
            &ProcessOptions {
                output_path,
                deploy_url: self.deploy_url.clone(),
                minify: self.minify,
            },
        );

        for warning in result.warnings.iter().flatten() {
            tracing::warn!("{warning}");
        }
        for error in result.errors.iter().flatten() {
            tracing::error!("{error}");
        }

        result.content
    }
}

impl<R> fmt::Debug for CommonEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommonEngine")
            .field("bootstrap", &self.bootstrap)
            .field("providers", &self.providers.len())
            .field("templates", &self.templates.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::future::{self, Future};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use ssr_critical_css::{CssInliner, InlineSession};
    use ssr_storage::MockLoader;

    use super::*;
    use crate::provider::{INITIAL_CONFIG, SERVER_CONTEXT};
    use crate::renderer::{RenderError, ShellRenderer};

    static_assertions::assert_impl_all!(CommonEngine<ShellRenderer>: Send, Sync);

    /// Returns the initial document and records every call.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: AtomicUsize,
        seen: Mutex<Vec<(BootstrapTarget, Vec<Provider>)>>,
    }

    impl RecordingRenderer {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_providers(&self) -> Vec<Provider> {
            self.seen.lock().unwrap().last().unwrap().1.clone()
        }

        fn last_bootstrap(&self) -> BootstrapTarget {
            self.seen.lock().unwrap().last().unwrap().0.clone()
        }
    }

    impl PlatformRenderer for RecordingRenderer {
        fn render(
            &self,
            bootstrap: &BootstrapTarget,
            providers: &[Provider],
        ) -> impl Future<Output = Result<String, RenderError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((bootstrap.clone(), providers.to_vec()));
            let document = Provider::find(providers, INITIAL_CONFIG)
                .and_then(|c| c["document"].as_str())
                .unwrap()
                .to_owned();
            future::ready(Ok(document))
        }
    }

    /// Appends a marker and reports one warning per call.
    #[derive(Default)]
    struct CountingInliner {
        calls: AtomicUsize,
        paths: Mutex<Vec<PathBuf>>,
    }

    impl CssInliner for CountingInliner {
        fn inline(&self, html: &str, session: &InlineSession<'_>) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.paths
                .lock()
                .unwrap()
                .push(session.settings().path.clone());
            session.warn("unused rule");
            format!("{html}<!--inlined-->")
        }
    }

    const DOCUMENT: &str = "<html><head></head><body><app-root></app-root></body></html>";

    fn module() -> BootstrapTarget {
        BootstrapTarget::Module("AppServerModule".to_owned())
    }

    fn engine(loader: &Arc<MockLoader>) -> CommonEngine<RecordingRenderer> {
        CommonEngine::new(
            RecordingRenderer::default(),
            Arc::clone(loader) as Arc<dyn ResourceLoader>,
        )
    }

    fn file_request(url: &str) -> RenderRequest {
        RenderRequest::new()
            .with_url(url)
            .with_bootstrap(module())
            .with_public_path("/dist")
            .with_document_file_path("/dist/index.html")
    }

    #[tokio::test]
    async fn test_missing_bootstrap_fails_before_io() {
        let loader = Arc::new(MockLoader::new().with_file("/dist/index.html", DOCUMENT));
        let engine = engine(&loader);
        let request = RenderRequest::new()
            .with_url("http://localhost/about")
            .with_public_path("/dist")
            .with_document_file_path("/dist/index.html");

        let err = engine.render(request).await.unwrap_err();

        assert!(matches!(err, EngineError::MissingBootstrap));
        assert_eq!(loader.total_reads(), 0);
        assert_eq!(loader.exists_count(Path::new("/dist/about/index.html")), 0);
        assert_eq!(engine.renderer().calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let loader = Arc::new(MockLoader::new());
        let engine = engine(&loader);

        let err = engine
            .render(RenderRequest::new().with_bootstrap(module()))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::MissingDocument));
    }

    #[tokio::test]
    async fn test_template_read_failure_propagates() {
        let loader = Arc::new(MockLoader::new());
        let engine = engine(&loader);

        let err = engine.render(file_request("http://localhost/")).await.unwrap_err();

        match err {
            EngineError::Io(e) => {
                assert!(e.is_not_found());
                assert_eq!(e.path, PathBuf::from("/dist/index.html"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_static_page_skips_renderer() {
        let loader = Arc::new(
            MockLoader::new()
                .with_file("/dist/index.html", DOCUMENT)
                .with_file("/dist/about/index.html", "<p>prerendered</p>"),
        );
        let engine = engine(&loader);

        let html = engine
            .render(file_request("http://localhost/about?ref=1"))
            .await
            .unwrap();

        assert_eq!(html, "<p>prerendered</p>");
        assert_eq!(engine.renderer().calls(), 0);
    }

    #[tokio::test]
    async fn test_static_page_existence_memoized() {
        let loader = Arc::new(MockLoader::new().with_file("/dist/index.html", DOCUMENT));
        let engine = engine(&loader).with_critical_css(CriticalCssProcessor::new(
            Arc::new(CountingInliner::default()),
            Arc::clone(&loader) as Arc<dyn ResourceLoader>,
        ));
        let page = Path::new("/dist/products/index.html");

        engine.render(file_request("http://localhost/products")).await.unwrap();
        engine.render(file_request("http://localhost/products")).await.unwrap();

        assert_eq!(loader.exists_count(page), 1);
        assert_eq!(engine.renderer().calls(), 2);
    }

    #[tokio::test]
    async fn test_static_page_outside_public_path_ignored() {
        let loader = Arc::new(
            MockLoader::new()
                .with_file("/dist/index.html", DOCUMENT)
                .with_file("/etc/app/index.html", "<p>secret</p>"),
        );
        let engine = engine(&loader);
        let request =
            file_request("http://localhost:99999/../../etc/app/?x").with_inline_critical_css(false);

        let html = engine.render(request).await.unwrap();

        assert_eq!(html, DOCUMENT);
        assert_eq!(engine.renderer().calls(), 1);
        assert_eq!(loader.exists_count(Path::new("/etc/app/index.html")), 0);
        assert_eq!(loader.read_count(Path::new("/etc/app/index.html")), 0);
    }

    #[tokio::test]
    async fn test_root_url_does_not_match_template() {
        let loader = Arc::new(MockLoader::new().with_file("/dist/index.html", DOCUMENT));
        let engine = engine(&loader);

        engine.render(file_request("http://localhost/")).await.unwrap();

        assert_eq!(loader.exists_count(Path::new("/dist/index.html")), 0);
        assert_eq!(engine.renderer().calls(), 1);
    }

    #[tokio::test]
    async fn test_template_read_once() {
        let loader = Arc::new(MockLoader::new().with_file("/dist/index.html", DOCUMENT));
        let engine = engine(&loader);

        for url in ["http://localhost/a", "http://localhost/b", "http://localhost/c"] {
            engine
                .render(file_request(url).with_inline_critical_css(false))
                .await
                .unwrap();
        }

        assert_eq!(loader.read_count(Path::new("/dist/index.html")), 1);
    }

    #[tokio::test]
    async fn test_provider_order() {
        let loader = Arc::new(MockLoader::new());
        let engine = engine(&loader).with_providers(vec![Provider::new("ENGINE", 1)]);
        let request = RenderRequest::new()
            .with_url("http://localhost/")
            .with_bootstrap(module())
            .with_document(DOCUMENT)
            .with_provider(Provider::new("FIRST", "a"))
            .with_provider(Provider::new("SECOND", "b"))
            .with_inline_critical_css(false);

        engine.render(request).await.unwrap();

        let tokens: Vec<String> = engine
            .renderer()
            .last_providers()
            .into_iter()
            .map(|p| p.token)
            .collect();
        assert_eq!(
            tokens,
            vec![SERVER_CONTEXT, "FIRST", "SECOND", "ENGINE", INITIAL_CONFIG]
        );

        let providers = engine.renderer().last_providers();
        assert_eq!(providers[0].value, serde_json::json!("ssr"));
        assert_eq!(
            providers[4].value,
            serde_json::json!({ "document": DOCUMENT, "url": "http://localhost/" })
        );
    }

    #[tokio::test]
    async fn test_engine_bootstrap_wins() {
        let loader = Arc::new(MockLoader::new());
        let engine = engine(&loader).with_bootstrap(BootstrapTarget::Application("main".into()));
        let request = RenderRequest::new()
            .with_bootstrap(module())
            .with_document(DOCUMENT)
            .with_inline_critical_css(false);

        engine.render(request).await.unwrap();

        assert_eq!(
            engine.renderer().last_bootstrap(),
            BootstrapTarget::Application("main".into())
        );
    }

    #[tokio::test]
    async fn test_raw_html_without_critical_css() {
        let loader = Arc::new(MockLoader::new());
        let inliner = Arc::new(CountingInliner::default());
        let engine = engine(&loader).with_critical_css(CriticalCssProcessor::new(
            Arc::clone(&inliner) as Arc<dyn CssInliner>,
            Arc::clone(&loader) as Arc<dyn ResourceLoader>,
        ));
        let request = RenderRequest::new()
            .with_bootstrap(module())
            .with_document(DOCUMENT)
            .with_inline_critical_css(false);

        let html = engine.render(request).await.unwrap();

        assert_eq!(html, DOCUMENT);
        assert_eq!(inliner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_critical_css_output_path() {
        let loader = Arc::new(MockLoader::new().with_file("/srv/app/index.html", DOCUMENT));
        let inliner = Arc::new(CountingInliner::default());
        let engine = engine(&loader).with_critical_css(CriticalCssProcessor::new(
            Arc::clone(&inliner) as Arc<dyn CssInliner>,
            Arc::clone(&loader) as Arc<dyn ResourceLoader>,
        ));

        let html = engine
            .render(
                RenderRequest::new()
                    .with_bootstrap(module())
                    .with_document_file_path("/srv/app/index.html"),
            )
            .await
            .unwrap();
        engine
            .render(file_request("http://localhost/x").with_document(DOCUMENT))
            .await
            .unwrap();

        assert_eq!(html, format!("{DOCUMENT}<!--inlined-->"));
        assert_eq!(
            *inliner.paths.lock().unwrap(),
            vec![PathBuf::from("/srv/app"), PathBuf::from("/dist")]
        );
    }

    #[tokio::test]
    async fn test_media_swap_normalized() {
        let loader = Arc::new(MockLoader::new());
        let engine = engine(&loader);
        let deferred = concat!(
            r#"<head><link rel="stylesheet" href="styles.css" media="print" onload="this.media='all'">"#,
            r#"<noscript><link rel="stylesheet" href="styles.css"></noscript></head>"#
        );

        let raw = engine
            .render(
                RenderRequest::new()
                    .with_bootstrap(module())
                    .with_document(deferred)
                    .with_inline_critical_css(false),
            )
            .await
            .unwrap();
        assert_eq!(raw, deferred);

        engine
            .render(
                RenderRequest::new()
                    .with_bootstrap(module())
                    .with_document(deferred),
            )
            .await
            .unwrap();
        let providers = engine.renderer().last_providers();
        let config = Provider::find(&providers, INITIAL_CONFIG).unwrap();
        assert_eq!(
            config["document"],
            serde_json::json!(r#"<head><link rel="stylesheet" href="styles.css"></head>"#)
        );
    }

    #[tokio::test]
    async fn test_shell_renderer_end_to_end() {
        let loader = Arc::new(
            MockLoader::new()
                .with_file("/dist/index.html", DOCUMENT)
                .with_file("/dist/styles.css", "body { margin: 0; }"),
        );
        let engine = CommonEngine::new(
            ShellRenderer::default(),
            Arc::clone(&loader) as Arc<dyn ResourceLoader>,
        )
        .with_bootstrap(module());
        let document = DOCUMENT.replace(
            "<head></head>",
            r#"<head><link rel="stylesheet" href="styles.css"></head>"#,
        );

        let html = engine
            .render(
                RenderRequest::new()
                    .with_document(document)
                    .with_public_path("/dist"),
            )
            .await
            .unwrap();

        assert!(html.contains(r#"<app-root ng-server-context="ssr">"#));
        assert!(html.contains("<style>body { margin: 0; }</style></head>"));
        assert!(html.contains(r#"media="print" onload="this.media='all'""#));
    }
}

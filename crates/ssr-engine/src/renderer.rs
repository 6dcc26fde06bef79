//! Platform renderer collaborator.

use std::future::{self, Future};

use crate::provider::{INITIAL_CONFIG, Provider, SERVER_CONTEXT};
use crate::request::BootstrapTarget;

/// Error produced by a [`PlatformRenderer`].
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// Renders an application into its document template.
///
/// `providers` always contain [`SERVER_CONTEXT`] first and
/// [`INITIAL_CONFIG`] (`{document, url}`) last.
pub trait PlatformRenderer: Send + Sync {
    fn render(
        &self,
        bootstrap: &BootstrapTarget,
        providers: &[Provider],
    ) -> impl Future<Output = Result<String, RenderError>> + Send;
}

/// Renderer for deployments without a framework runtime.
///
/// Returns the document unchanged apart from an `ng-server-context`
/// attribute on the first root element, which client-side hydration reads
/// to detect server-rendered markup.
#[derive(Clone, Debug)]
pub struct ShellRenderer {
    root_selector: String,
}

impl Default for ShellRenderer {
    fn default() -> Self {
        Self::new("app-root")
    }
}

impl ShellRenderer {
    pub fn new(root_selector: impl Into<String>) -> Self {
        Self {
            root_selector: root_selector.into(),
        }
    }

    fn render_shell(
        &self,
        bootstrap: &BootstrapTarget,
        providers: &[Provider],
    ) -> Result<String, RenderError> {
        let document = Provider::find(providers, INITIAL_CONFIG)
            .and_then(|config| config.get("document"))
            .and_then(serde_json::Value::as_str)
            .ok_or("Missing initial document")?;
        let context = Provider::find(providers, SERVER_CONTEXT)
            .and_then(serde_json::Value::as_str)
            .unwrap_or("other");

        let Some(insert_at) = find_root_tag_end(document, &self.root_selector) else {
            tracing::debug!(
                selector = %self.root_selector,
                bootstrap = bootstrap.name(),
                "Root element not found in document"
            );
            return Ok(document.to_owned());
        };

        let attr = format!(r#" ng-server-context="{context}""#);
        let mut html = String::with_capacity(document.len() + attr.len());
        html.push_str(&document[..insert_at]);
        html.push_str(&attr);
        html.push_str(&document[insert_at..]);
        Ok(html)
    }
}

impl PlatformRenderer for ShellRenderer {
    fn render(
        &self,
        bootstrap: &BootstrapTarget,
        providers: &[Provider],
    ) -> impl Future<Output = Result<String, RenderError>> + Send {
        future::ready(self.render_shell(bootstrap, providers))
    }
}

/// Byte offset just past `<selector` in its first opening tag.
fn find_root_tag_end(document: &str, selector: &str) -> Option<usize> {
    let open = format!("<{selector}");
    let mut from = 0;
    while let Some(found) = document[from..].find(&open) {
        let end = from + found + open.len();
        match document[end..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => return Some(end),
            _ => from = end,
        }
    }
    None
}

//! Built-in stylesheet inliner.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::inliner::{CssInliner, InlineSession, InlinerSettings, Preload};

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<link\b[^>]*>").unwrap());

static REL_STYLESHEET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\brel=["']?stylesheet["']?"#).unwrap());

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bhref=["']([^"']+)["']"#).unwrap());

static ONLOAD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bonload=").unwrap());

static CSS_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static CSS_WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Whitespace around punctuation that never needs it.
static CSS_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,>])\s*").unwrap());

/// Inlines local stylesheets and defers their `<link>` elements.
///
/// Every `<link rel="stylesheet">` whose `href` resolves to a file under
/// [`InlinerSettings::path`] is copied into a `<style>` block at the end of
/// `<head>`. The link itself is kept but loaded without blocking render,
/// according to [`InlinerSettings::preload`]. External stylesheets are left
/// untouched.
///
/// Whole stylesheets are inlined; no selector matching is performed, so
/// `prune_source`, `reduce_inline_styles` and `inline_fonts` have no effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct StylesheetInliner;

impl StylesheetInliner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CssInliner for StylesheetInliner {
    fn inline(&self, html: &str, session: &InlineSession<'_>) -> String {
        let settings = session.settings();
        let Some(head_end) = find_ignore_ascii_case(html, "</head>") else {
            session.warn("No <head> element found, critical CSS not inlined");
            return html.to_owned();
        };

        let (head, rest) = html.split_at(head_end);
        let mut styles: Vec<String> = Vec::new();

        let head = LINK_RE.replace_all(head, |caps: &Captures| {
            let tag = &caps[0];
            let Some(href) = stylesheet_href(tag) else {
                return tag.to_owned();
            };
            if is_external(href) {
                return tag.to_owned();
            }

            let path = resolve(settings, href);
            match session.read_resource(&path) {
                Ok(css) => {
                    tracing::debug!(href, path = %path.display(), "Inlining stylesheet");
                    styles.push(if settings.compress {
                        compress_css(&css)
                    } else {
                        css
                    });
                    defer_link(tag, settings)
                }
                Err(e) => {
                    session.warn(format!("Unable to locate stylesheet {href}: {e}"));
                    tag.to_owned()
                }
            }
        });

        if styles.is_empty() {
            return html.to_owned();
        }

        let mut out = String::with_capacity(html.len() + styles.iter().map(String::len).sum::<usize>());
        out.push_str(&head);
        if settings.merge_stylesheets {
            out.push_str("<style>");
            out.extend(styles.iter().map(String::as_str));
            out.push_str("</style>");
        } else {
            for css in &styles {
                out.push_str("<style>");
                out.push_str(css);
                out.push_str("</style>");
            }
        }
        out.push_str(rest);
        out
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// `href` of a stylesheet link that has not been deferred yet.
fn stylesheet_href(tag: &str) -> Option<&str> {
    if !REL_STYLESHEET_RE.is_match(tag) || ONLOAD_RE.is_match(tag) {
        return None;
    }
    HREF_RE
        .captures(tag)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn is_external(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Map an `href` to a file under the output path.
fn resolve(settings: &InlinerSettings, href: &str) -> PathBuf {
    let href = href.split(['?', '#']).next().unwrap_or(href);
    let relative = href
        .strip_prefix(settings.public_path.as_str())
        .filter(|_| !settings.public_path.is_empty())
        .unwrap_or(href)
        .trim_start_matches('/');
    settings.path.join(relative)
}

fn defer_link(tag: &str, settings: &InlinerSettings) -> String {
    let open = tag.trim_end_matches('>').trim_end_matches('/').trim_end();
    let deferred = match settings.preload {
        Preload::Media => format!(r#"{open} media="print" onload="this.media='all'">"#),
        Preload::Swap => {
            let open = REL_STYLESHEET_RE.replace(open, r#"rel="preload" as="style""#);
            format!(r#"{open} onload="this.rel='stylesheet'">"#)
        }
    };
    if settings.noscript_fallback {
        format!("{deferred}<noscript>{tag}</noscript>")
    } else {
        deferred
    }
}

/// Strip comments and redundant whitespace.
fn compress_css(css: &str) -> String {
    let css = CSS_COMMENT_RE.replace_all(css, "");
    let css = CSS_WHITESPACE_RE.replace_all(&css, " ");
    let css = CSS_PUNCT_RE.replace_all(&css, "$1");
    css.replace(";}", "}").trim().to_owned()
}

//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Path portion of a request URL.
///
/// Absolute URLs are parsed; anything else is treated as a path with an
/// optional query and fragment. A malformed absolute URL (bad port, bad
/// host) still has its scheme and authority stripped.
pub(crate) fn url_pathname(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        return parsed.path().to_owned();
    }
    let rest = match url.split_once("://") {
        Some((_, after_scheme)) => after_scheme
            .find(['/', '?', '#'])
            .map_or("", |i| &after_scheme[i..]),
        None => url,
    };
    let path = rest.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() {
        "/".to_owned()
    } else {
        path.to_owned()
    }
}

/// Location of the pre-rendered page for `url` under `public_path`.
///
/// `None` when the normalized location falls outside `public_path`.
pub(crate) fn static_page_path(public_path: &Path, url: &str) -> Option<PathBuf> {
    let pathname = url_pathname(url);
    let root = normalize(public_path);
    let page = normalize(
        &root
            .join(pathname.trim_start_matches('/'))
            .join("index.html"),
    );
    if page.starts_with(&root) {
        Some(page)
    } else {
        tracing::debug!(url, path = %page.display(), "Pre-rendered page outside public path");
        None
    }
}

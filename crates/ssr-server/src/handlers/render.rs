//! Server-side rendering endpoint.
//!
//! Builds a render request from the incoming HTTP request, the way a
//! framework's HTTP engine adapter does, and returns the rendered HTML.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse};
use md5::{Digest, Md5};
use serde_json::json;
use ssr_engine::{Provider, REQUEST, RESPONSE, RenderRequest};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle any GET request not served as a static file.
pub(crate) async fn render_page(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServerError> {
    let url = request_url(&uri, &headers, &state.default_host);

    let request = RenderRequest::new()
        .with_url(url.clone())
        .with_document_file_path(state.document_path.clone())
        .with_public_path(state.public_path.clone())
        .with_inline_critical_css(state.inline_critical_css)
        .with_provider(request_provider(&method, &url, &headers))
        .with_provider(Provider::new(RESPONSE, json!({ "status": 200 })));

    let html = state.engine.render(request).await?;

    let etag = compute_etag(&state.version, &html);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok(([(header::ETAG, etag)], Html(html)).into_response())
}

/// Absolute URL of the request: `{protocol}://{host}{original url}`.
fn request_url(uri: &Uri, headers: &HeaderMap, default_host: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(default_host);
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    format!("{scheme}://{host}{path}")
}

fn request_provider(method: &Method, url: &str, headers: &HeaderMap) -> Provider {
    let headers: serde_json::Map<String, serde_json::Value> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_owned(), json!(v)))
        })
        .collect();
    Provider::new(
        REQUEST,
        json!({ "method": method.as_str(), "url": url, "headers": headers }),
    )
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// Files under the public path are served as-is, without directory index
/// lookup; every other GET request is server-side rendered.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let render = get(handlers::render::render_page).with_state(Arc::clone(&state));
    let static_files = ServeDir::new(&state.public_path)
        .append_index_html_on_directories(false)
        .fallback(render);

    security::apply(Router::new().fallback_service(static_files)).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use ssr_engine::BootstrapTarget;
    use tower::ServiceExt;

    use super::*;
    use crate::{ServerConfig, create_engine};

    const DOCUMENT: &str = concat!(
        r#"<html><head><link rel="stylesheet" href="styles.css"></head>"#,
        "<body><app-root></app-root></body></html>"
    );

    fn state(public_path: &Path) -> Arc<AppState> {
        let config = ServerConfig {
            public_path: public_path.to_path_buf(),
            document_path: public_path.join("index.html"),
            bootstrap: BootstrapTarget::Module("AppServerModule".to_owned()),
            version: "test".to_owned(),
            ..ServerConfig::default()
        };
        Arc::new(AppState {
            engine: create_engine(&config),
            public_path: config.public_path.clone(),
            document_path: config.document_path.clone(),
            inline_critical_css: true,
            default_host: "localhost:4000".to_owned(),
            version: config.version,
        })
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), DOCUMENT).unwrap();
        std::fs::write(dir.path().join("styles.css"), "body {\n  margin: 0;\n}\n").unwrap();
        std::fs::create_dir(dir.path().join("about")).unwrap();
        std::fs::write(dir.path().join("about/index.html"), "<p>about</p>").unwrap();
        dir
    }

    async fn send(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::HOST, "example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_static_asset_served() {
        let dir = fixture();

        let (status, _, body) = send(create_router(state(dir.path())), "/styles.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {\n  margin: 0;\n}\n");
    }

    #[tokio::test]
    async fn test_root_is_rendered() {
        let dir = fixture();

        let (status, headers, body) = send(create_router(state(dir.path())), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert!(body.contains(r#"<app-root ng-server-context="ssr">"#));
        assert!(body.contains("<style>body{margin:0}</style></head>"));
    }

    #[tokio::test]
    async fn test_prerendered_page_served() {
        let dir = fixture();

        let (status, _, body) = send(create_router(state(dir.path())), "/about").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>about</p>");
    }

    #[tokio::test]
    async fn test_security_headers() {
        let dir = fixture();

        let (_, headers, _) = send(create_router(state(dir.path())), "/").await;

        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers.contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_missing_template_is_server_error() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _, body) = send(create_router(state(dir.path())), "/home").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("error"));
    }
}

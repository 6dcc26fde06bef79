//! Security response headers.

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::HeaderName;
use tower_http::set_header::SetResponseHeaderLayer;

/// Policy for rendered pages.
///
/// Inlined critical CSS needs `'unsafe-inline'` styles, and the deferred
/// stylesheet link runs `this.media='all'` from `onload`, allowed by hash.
const CSP: &str = "default-src 'self'; \
                   script-src 'self' 'unsafe-hashes' 'sha256-MhtPZXr7+LpJUY5qtMutB+qWfQtMaPccfe7QXtCcEYc='; \
                   style-src 'self' 'unsafe-inline'; \
                   font-src 'self' data:; \
                   img-src 'self' data:; \
                   frame-ancestors 'none'";

/// How a header interacts with one the handler already set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Override,
    KeepExisting,
}

const HEADERS: [(&str, &str, Mode); 3] = [
    ("content-security-policy", CSP, Mode::KeepExisting),
    ("x-content-type-options", "nosniff", Mode::Override),
    ("x-frame-options", "DENY", Mode::Override),
];

fn header_layer(name: &'static str, value: &'static str, mode: Mode) -> SetResponseHeaderLayer<HeaderValue> {
    let name = HeaderName::from_static(name);
    let value = HeaderValue::from_static(value);
    match mode {
        Mode::Override => SetResponseHeaderLayer::overriding(name, value),
        Mode::KeepExisting => SetResponseHeaderLayer::if_not_present(name, value),
    }
}

/// Wrap `router` so every response carries the security headers.
pub(crate) fn apply(router: Router) -> Router {
    HEADERS
        .into_iter()
        .fold(router, |router, (name, value, mode)| {
            router.layer(header_layer(name, value, mode))
        })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_csp_allows_deferred_stylesheet() {
        assert!(CSP.contains("style-src 'self' 'unsafe-inline'"));
        assert!(CSP.contains("'unsafe-hashes'"));
        assert!(CSP.contains("frame-ancestors 'none'"));
    }

    #[tokio::test]
    async fn test_handler_policy_kept() {
        let router = apply(Router::new().route(
            "/",
            get(|| async {
                (
                    [(header::CONTENT_SECURITY_POLICY, "default-src 'none'")],
                    StatusCode::OK,
                )
                    .into_response()
            }),
        ));

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_SECURITY_POLICY], "default-src 'none'");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}

//! Renderer providers.

use serde_json::Value;

/// Rendering context marker; always `"ssr"` for this engine.
pub const SERVER_CONTEXT: &str = "SERVER_CONTEXT";

/// Initial platform configuration: `{ "document": ..., "url": ... }`.
pub const INITIAL_CONFIG: &str = "INITIAL_CONFIG";

/// Incoming HTTP request, supplied by the HTTP layer.
pub const REQUEST: &str = "REQUEST";

/// Outgoing HTTP response, supplied by the HTTP layer.
pub const RESPONSE: &str = "RESPONSE";

/// Value made available to the application under `token`.
#[derive(Clone, Debug, PartialEq)]
pub struct Provider {
    pub token: String,
    pub value: Value,
}

impl Provider {
    pub fn new(token: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            token: token.into(),
            value: value.into(),
        }
    }

    pub(crate) fn server_context() -> Self {
        Self::new(SERVER_CONTEXT, "ssr")
    }

    pub(crate) fn initial_config(document: &str, url: Option<&str>) -> Self {
        Self::new(
            INITIAL_CONFIG,
            serde_json::json!({ "document": document, "url": url }),
        )
    }

    /// First provider registered for `token`.
    pub fn find<'a>(providers: &'a [Provider], token: &str) -> Option<&'a Value> {
        providers.iter().find(|p| p.token == token).map(|p| &p.value)
    }
}

//! CLI error types.

use ssr_config::ConfigError;
use ssr_engine::EngineError;
use ssr_hydration::NghError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Render(#[from] EngineError),

    #[error("{0}")]
    Ngh(#[from] NghError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Server(String),
}

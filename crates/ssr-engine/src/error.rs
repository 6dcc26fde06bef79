use ssr_storage::LoaderError;

use crate::renderer::RenderError;

/// Error returned by [`CommonEngine::render`](crate::CommonEngine::render).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("A bootstrap module or application must be provided")]
    MissingBootstrap,

    #[error("A document or document file path must be provided")]
    MissingDocument,

    #[error(transparent)]
    Io(#[from] LoaderError),

    #[error("Render failed: {0}")]
    Render(#[source] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            EngineError::MissingBootstrap.to_string(),
            "A bootstrap module or application must be provided"
        );
        assert_eq!(
            EngineError::from(LoaderError::not_found("/dist/index.html")).to_string(),
            LoaderError::not_found("/dist/index.html").to_string()
        );
        assert_eq!(
            EngineError::Render("boom".into()).to_string(),
            "Render failed: boom"
        );
    }
}

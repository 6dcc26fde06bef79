//! `ssr render` command implementation.

use std::path::PathBuf;

use clap::Args;
use ssr_config::{CliSettings, Config};
use ssr_engine::RenderRequest;
use ssr_server::{create_engine, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// URL to render, e.g. `http://localhost/products`.
    url: String,

    /// Path to configuration file (default: auto-discover ssr.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Browser build output directory (overrides config).
    #[arg(long)]
    public_path: Option<PathBuf>,

    /// Disable critical CSS inlining.
    #[arg(long)]
    no_inline_critical_css: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or rendering fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            public_path: self.public_path,
            inline_critical_css: self.no_inline_critical_css.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let server_config = server_config_from_config(&config, String::new());
        let engine = create_engine(&server_config);

        let request = RenderRequest::new()
            .with_url(self.url)
            .with_document_file_path(server_config.document_path.clone())
            .with_public_path(server_config.public_path.clone())
            .with_inline_critical_css(server_config.inline_critical_css);

        let html = engine.render(request).await?;
        Output::new().result(&html)?;
        Ok(())
    }
}

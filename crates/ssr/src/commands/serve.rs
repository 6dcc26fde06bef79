//! `ssr serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use ssr_config::{CliSettings, Config};
use ssr_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover ssr.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Browser build output directory (overrides config).
    #[arg(long)]
    public_path: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long, env = "SSR_HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long, env = "SSR_PORT")]
    port: Option<u16>,

    /// Disable critical CSS inlining.
    #[arg(long)]
    no_inline_critical_css: bool,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            public_path: self.public_path,
            inline_critical_css: self.no_inline_critical_css.then_some(false),
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let render = &config.render_resolved;

        output.highlight(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!("Public path: {}", render.public_path.display()));
        output.info(&format!("Document: {}", render.document_path().display()));
        output.info(&format!("Bootstrap: {}", render.bootstrap));
        if render.inline_critical_css {
            output.info("Critical CSS: inlined");
        } else {
            output.info("Critical CSS: disabled");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

//! HTTP server for server-side rendered applications.
//!
//! Serves the browser build output as static files and renders every other
//! GET request through [`CommonEngine`](ssr_engine::CommonEngine).
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use ssr_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         public_path: PathBuf::from("dist/browser"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (ssr-server)
//!                        │
//!                        ├─► Static files (tower-http ServeDir, no index)
//!                        │
//!                        └─► Fallback ──► CommonEngine
//!                                            ├─► pre-rendered page
//!                                            └─► renderer + critical CSS
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use ssr_config::BootstrapKind;
use ssr_engine::{BootstrapTarget, CommonEngine, ShellRenderer};
use ssr_storage::{FsLoader, ResourceLoader};
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Browser build output directory.
    pub public_path: PathBuf,
    /// Document template file.
    pub document_path: PathBuf,
    /// Application bootstrap target.
    pub bootstrap: BootstrapTarget,
    /// Inline critical CSS into rendered pages.
    pub inline_critical_css: bool,
    /// Tag name of the application root element.
    pub root_selector: String,
    /// Minify inlined CSS.
    pub minify: bool,
    /// URL prefix stylesheets are deployed under.
    pub deploy_url: String,
    /// Application version (for `ETag` computation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4000,
            public_path: PathBuf::from("dist/browser"),
            document_path: PathBuf::from("dist/browser/index.html"),
            bootstrap: BootstrapTarget::Module("AppServerModule".to_owned()),
            inline_critical_css: true,
            root_selector: "app-root".to_owned(),
            minify: true,
            deploy_url: String::new(),
            version: String::new(),
        }
    }
}

/// Build the rendering engine described by `config`, reading from the local
/// filesystem.
#[must_use]
pub fn create_engine(config: &ServerConfig) -> CommonEngine<ShellRenderer> {
    let loader: Arc<dyn ResourceLoader> = Arc::new(FsLoader::new());
    CommonEngine::new(ShellRenderer::new(config.root_selector.clone()), loader)
        .with_bootstrap(config.bootstrap.clone())
        .with_minify(config.minify)
        .with_deploy_url(config.deploy_url.clone())
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        engine: create_engine(&config),
        public_path: config.public_path.clone(),
        document_path: config.document_path.clone(),
        inline_critical_css: config.inline_critical_css,
        default_host: format!("{}:{}", config.host, config.port),
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from SSR config.
#[must_use]
pub fn server_config_from_config(config: &ssr_config::Config, version: String) -> ServerConfig {
    let render = &config.render_resolved;
    let bootstrap = match render.bootstrap_kind {
        BootstrapKind::Module => BootstrapTarget::Module(render.bootstrap.clone()),
        BootstrapKind::Application => BootstrapTarget::Application(render.bootstrap.clone()),
    };

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        public_path: render.public_path.clone(),
        document_path: render.document_path(),
        bootstrap,
        inline_critical_css: render.inline_critical_css,
        root_selector: render.root_selector.clone(),
        minify: config.critical_css.minify,
        deploy_url: config.critical_css.deploy_url.clone(),
        version,
    }
}

//! Configuration management for the SSR server.
//!
//! Parses `ssr.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `critical_css.deploy_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override browser build output directory.
    pub public_path: Option<PathBuf>,
    /// Override critical CSS inlining.
    pub inline_critical_css: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ssr.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Render configuration (paths are relative strings from TOML).
    render: RenderConfigRaw,
    /// Critical CSS configuration.
    pub critical_css: CriticalCssConfig,

    /// Resolved render configuration (set after loading).
    #[serde(skip)]
    pub render_resolved: RenderConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 4000,
        }
    }
}

/// How the bootstrap target is started.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapKind {
    /// Server module.
    #[default]
    Module,
    /// Standalone application.
    Application,
}

/// Raw render configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RenderConfigRaw {
    public_path: Option<String>,
    document: Option<String>,
    bootstrap: Option<String>,
    bootstrap_kind: Option<BootstrapKind>,
    inline_critical_css: Option<bool>,
    root_selector: Option<String>,
}

/// Resolved render configuration with absolute paths.
#[derive(Debug, Default)]
pub struct RenderConfig {
    /// Browser build output: static assets and pre-rendered pages.
    pub public_path: PathBuf,
    /// Document template filename, relative to `public_path`.
    pub document: String,
    /// Bootstrap module or application name.
    pub bootstrap: String,
    pub bootstrap_kind: BootstrapKind,
    /// Whether critical CSS is inlined into rendered pages.
    pub inline_critical_css: bool,
    /// Tag name of the application root element.
    pub root_selector: String,
}

impl RenderConfig {
    /// Document template path.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.public_path.join(&self.document)
    }
}

/// Critical CSS configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CriticalCssConfig {
    /// Minify inlined CSS.
    pub minify: bool,
    /// URL prefix stylesheets are deployed under.
    pub deploy_url: String,
}

impl Default for CriticalCssConfig {
    fn default() -> Self {
        Self {
            minify: true,
            deploy_url: String::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`SSR_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `ssr.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(public_path) = &settings.public_path {
            self.render_resolved.public_path.clone_from(public_path);
        }
        if let Some(inline_critical_css) = settings.inline_critical_css {
            self.render_resolved.inline_critical_css = inline_critical_css;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            render: RenderConfigRaw::default(),
            critical_css: CriticalCssConfig::default(),
            render_resolved: RenderConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_render()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let render = &self.render_resolved;
        require_non_empty(&render.document, "render.document")?;
        require_non_empty(&render.bootstrap, "render.bootstrap")?;
        require_non_empty(&render.root_selector, "render.root_selector")?;

        if !render
            .root_selector
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::Validation(format!(
                "render.root_selector must be a tag name, got {:?}",
                render.root_selector
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.critical_css.deploy_url =
            expand::expand_env(&self.critical_css.deploy_url, "critical_css.deploy_url")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.render;
        self.render_resolved = RenderConfig {
            public_path: config_dir.join(raw.public_path.as_deref().unwrap_or("dist/browser")),
            document: raw
                .document
                .clone()
                .unwrap_or_else(|| "index.html".to_owned()),
            bootstrap: raw
                .bootstrap
                .clone()
                .unwrap_or_else(|| "AppServerModule".to_owned()),
            bootstrap_kind: raw.bootstrap_kind.unwrap_or_default(),
            inline_critical_css: raw.inline_critical_css.unwrap_or(true),
            root_selector: raw
                .root_selector
                .clone()
                .unwrap_or_else(|| "app-root".to_owned()),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/app"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(
            config.render_resolved.public_path,
            PathBuf::from("/app/dist/browser")
        );
        assert_eq!(
            config.render_resolved.document_path(),
            PathBuf::from("/app/dist/browser/index.html")
        );
        assert_eq!(config.render_resolved.bootstrap, "AppServerModule");
        assert_eq!(config.render_resolved.bootstrap_kind, BootstrapKind::Module);
        assert!(config.render_resolved.inline_critical_css);
        assert_eq!(config.render_resolved.root_selector, "app-root");
        assert!(config.critical_css.minify);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 4000);
        assert!(config.critical_css.minify);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[render]
public_path = "build/browser"
document = "index.server.html"
bootstrap = "main"
bootstrap_kind = "application"
inline_critical_css = false
root_selector = "my-app"

[critical_css]
minify = false
deploy_url = "/static/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.render_resolved.document_path(),
            PathBuf::from("/project/build/browser/index.server.html")
        );
        assert_eq!(config.render_resolved.bootstrap, "main");
        assert_eq!(
            config.render_resolved.bootstrap_kind,
            BootstrapKind::Application
        );
        assert!(!config.render_resolved.inline_critical_css);
        assert_eq!(config.render_resolved.root_selector, "my-app");
        assert!(!config.critical_css.minify);
        assert_eq!(config.critical_css.deploy_url, "/static/");
    }

    #[test]
    fn test_unknown_bootstrap_kind_rejected() {
        let result: Result<Config, _> = toml::from_str("[render]\nbootstrap_kind = \"plugin\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/app"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            public_path: Some(PathBuf::from("/srv/www")),
            inline_critical_css: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.render_resolved.document_path(),
            PathBuf::from("/srv/www/index.html")
        );
        assert!(!config.render_resolved.inline_critical_css);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/app"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert!(config.render_resolved.inline_critical_css);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("SSR_CONFIG_TEST_HOST", "10.0.0.1");
            std::env::remove_var("SSR_CONFIG_TEST_CDN");
        }

        let toml = r#"
[server]
host = "${SSR_CONFIG_TEST_HOST}"

[critical_css]
deploy_url = "${SSR_CONFIG_TEST_CDN:-/}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.critical_css.deploy_url, "/");

        unsafe {
            std::env::remove_var("SSR_CONFIG_TEST_HOST");
        }
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/app"));
        config.server.port = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_validate_empty_bootstrap() {
        let mut config = Config::default_with_base(Path::new("/app"));
        config.render_resolved.bootstrap = String::new();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.bootstrap"));
    }

    #[test]
    fn test_validate_root_selector() {
        let mut config = Config::default_with_base(Path::new("/app"));
        config.render_resolved.root_selector = "app-root > div".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.root_selector"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[server]\nport = 4200\n\n[render]\npublic_path = \"out\"\n")
            .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 4200);
        assert_eq!(config.render_resolved.public_path, dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/ssr.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            port: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}

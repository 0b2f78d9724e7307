//! Configuration management for StackWatch.
//!
//! Parses `sw.toml` configuration files with serde and provides
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
//! - `docs.base_url`

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Override the local documentation directory.
    pub source_dir: Option<PathBuf>,
    /// Fetch documentation over HTTP from this base URL.
    pub base_url: Option<String>,
    /// Override the sidebar variant.
    pub expandable: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sw.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Viewer behavior.
    pub viewer: ViewerConfig,
    /// Page chrome.
    pub ui: UiConfig,
    /// Service cards on the landing page.
    pub services: Vec<ServiceConfig>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
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
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    base_url: Option<String>,
    manifest: Option<String>,
    mount_path: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved documentation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// Local documentation directory (absolute when loaded from a file).
    pub source_dir: PathBuf,
    /// When set, documents are fetched over HTTP instead of from `source_dir`.
    pub base_url: Option<String>,
    /// Manifest name relative to the documentation base.
    pub manifest: String,
    /// URL path where raw documentation files are served.
    pub mount_path: String,
    /// HTTP fetch timeout.
    pub timeout_secs: u64,
}

impl DocsConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            source_dir: base.join("docs"),
            base_url: None,
            manifest: "manifest.json".to_owned(),
            mount_path: "/help/docs".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

/// Viewer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Collapsible sidebar (`true`) or flat sidebar (`false`).
    pub expandable: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self { expandable: true }
    }
}

/// Color scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse `light` or `dark`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Page chrome configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme used when the visitor has no stored preference.
    pub theme: Theme,
    /// Platform name in the header.
    pub title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            title: "StackWatch".to_owned(),
        }
    }
}

/// Icon shown on a service card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceIcon {
    Prometheus,
    Grafana,
    Help,
}

/// Lifecycle state shown as a badge on a service card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Active,
    Maintenance,
    Deprecated,
}

impl ServiceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Deprecated => "deprecated",
        }
    }
}

/// A service card on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Link target, relative to the gateway.
    pub path: String,
    pub icon: ServiceIcon,
    #[serde(default)]
    pub status: ServiceStatus,
}

/// Services shown when the config lists none.
#[must_use]
pub fn default_services() -> Vec<ServiceConfig> {
    let service = |id: &str, name: &str, description: &str, path: &str, icon| ServiceConfig {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        path: path.to_owned(),
        icon,
        status: ServiceStatus::Active,
    };
    vec![
        service(
            "svc-prom",
            "Prometheus",
            "Time-series event monitoring and alerting.",
            "/prometheus",
            ServiceIcon::Prometheus,
        ),
        service(
            "svc-graf",
            "Grafana",
            "Operational dashboards and data visualization.",
            "/grafana",
            ServiceIcon::Grafana,
        ),
        service(
            "svc-help",
            "Help & Documentation",
            "User guides, tutorials, and documentation.",
            "/help",
            ServiceIcon::Help,
        ),
    ]
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
        /// Config field path (e.g., "`docs.base_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_HOST`} not set").
        message: String,
    },
}

/// Paths the server routes itself.
const RESERVED_PATHS: &[&str] = &["/", "/help"];

/// Route prefixes the server owns, including everything beneath them.
const RESERVED_PREFIXES: &[&str] = &["/api", "/theme"];

/// Whether raw documents mounted at `path` would collide with a server route.
fn is_reserved_route(path: &str) -> bool {
    RESERVED_PATHS.contains(&path)
        || RESERVED_PREFIXES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `sw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, so CLI
    /// arguments take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result does not validate.
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

    /// Services to show, falling back to the built-in set.
    #[must_use]
    pub fn services(&self) -> Vec<ServiceConfig> {
        if self.services.is_empty() {
            default_services()
        } else {
            self.services.clone()
        }
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
            // An explicit directory wins over a configured URL.
            self.docs_resolved.base_url = None;
        }
        if let Some(base_url) = &settings.base_url {
            self.docs_resolved.base_url = Some(base_url.clone());
        }
        if let Some(expandable) = settings.expandable {
            self.viewer.expandable = expandable;
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

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            viewer: ViewerConfig::default(),
            ui: UiConfig::default(),
            services: Vec::new(),
            docs_resolved: DocsConfig::with_base(base),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_services()?;
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

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        if let Some(base_url) = &docs.base_url {
            require_non_empty(base_url, "docs.base_url")?;
            require_http_url(base_url, "docs.base_url")?;
        }
        require_non_empty(&docs.manifest, "docs.manifest")?;
        if !docs.mount_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "docs.mount_path must start with /".to_owned(),
            ));
        }
        if is_reserved_route(&docs.mount_path) {
            return Err(ConfigError::Validation(format!(
                "docs.mount_path {} overlaps a server route",
                docs.mount_path
            )));
        }
        if docs.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "docs.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_services(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for service in &self.services {
            require_non_empty(&service.id, "services.id")?;
            require_non_empty(&service.name, "services.name")?;
            if !seen.insert(service.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate service id: {}",
                    service.id
                )));
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref url) = self.docs.base_url {
            self.docs.base_url = Some(expand::expand_env(url, "docs.base_url")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = DocsConfig::with_base(config_dir);
        let raw = &self.docs;

        self.docs_resolved = DocsConfig {
            source_dir: raw
                .source_dir
                .as_deref()
                .map_or(defaults.source_dir, |dir| config_dir.join(dir)),
            base_url: raw.base_url.clone(),
            manifest: raw.manifest.clone().unwrap_or(defaults.manifest),
            mount_path: raw
                .mount_path
                .as_deref()
                .map_or(defaults.mount_path, |p| p.trim_end_matches('/').to_owned()),
            timeout_secs: raw.timeout_secs.unwrap_or(defaults.timeout_secs),
        };
    }
}

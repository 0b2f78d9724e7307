//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod render;
pub(crate) mod serve;

use std::path::{Path, PathBuf};

use sw_config::{CliSettings, Config};
use sw_server::{ServerConfig, server_config_from_config};

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;
pub(crate) use serve::ServeArgs;

use crate::error::CliError;

/// Load configuration and derive the server configuration from it.
fn load_config(
    config_path: Option<&Path>,
    settings: &CliSettings,
    version: &str,
) -> Result<ServerConfig, CliError> {
    let config = Config::load(config_path, Some(settings))?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "Loaded configuration");
    }
    Ok(server_config_from_config(&config, version.to_owned()))
}

/// Settings for commands that only choose where documents come from.
fn source_settings(source_dir: Option<PathBuf>, base_url: Option<String>) -> CliSettings {
    CliSettings {
        source_dir,
        base_url,
        ..CliSettings::default()
    }
}

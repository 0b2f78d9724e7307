//! CLI error types.

use sw_config::ConfigError;
use sw_server::ServerError;
use sw_source::SourceError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Validation(String),
}

//! `sw serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use sw_config::CliSettings;
use sw_server::{DocsLocation, run_server};

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover sw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Fetch documentation from this base URL instead of a directory.
    #[arg(long, env = "SW_DOCS_URL", conflicts_with = "source_dir")]
    base_url: Option<String>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Show every section expanded instead of collapsible sections.
    #[arg(long)]
    flat: bool,

    /// Enable verbose output (request and fetch logs).
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
            source_dir: self.source_dir,
            base_url: self.base_url,
            expandable: self.flat.then_some(false),
        };
        let server_config = super::load_config(self.config.as_deref(), &cli_settings, version)?;

        output.line(
            Tone::Heading,
            &format!(
                "Starting server on http://{}:{}",
                server_config.host, server_config.port
            ),
        );
        match &server_config.docs {
            DocsLocation::Local(dir) => {
                output.field("Documentation directory", dir.display());
                output.field("Raw documents", &server_config.mount_path);
            }
            DocsLocation::Remote(url) => output.field("Documentation URL", url),
        }
        output.field(
            "Sidebar",
            if server_config.expandable { "expandable" } else { "flat" },
        );

        run_server(server_config).await?;

        Ok(())
    }
}

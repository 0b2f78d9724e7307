//! `sw check` command implementation.
//!
//! Loads the manifest the way the viewer does, reports structural issues and
//! fetches every listed document.

use std::path::PathBuf;

use clap::Args;
use sw_manifest::Manifest;
use sw_source::DocSource;

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover sw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Check documentation served from this base URL.
    #[arg(long, env = "SW_DOCS_URL", conflicts_with = "source_dir")]
    base_url: Option<String>,

    /// Treat manifest issues as failures.
    #[arg(long)]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Outcome of checking one documentation source.
#[derive(Debug, Default, PartialEq, Eq)]
struct Report {
    files: usize,
    issues: Vec<String>,
    /// Paths that failed to load, with the reason.
    failures: Vec<(String, String)>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded, lists no files, or
    /// a listed document cannot be fetched.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let settings = super::source_settings(self.source_dir, self.base_url);
        let server_config = super::load_config(self.config.as_deref(), &settings, version)?;
        let source = server_config.source();

        output.line(Tone::Plain, &format!("Checking {}", source.describe()));
        let report = check_source(source.as_ref())?;

        for issue in &report.issues {
            output.line(Tone::Warn, &format!("  warning: {issue}"));
        }
        for (path, reason) in &report.failures {
            output.line(Tone::Bad, &format!("  failed: {path}: {reason}"));
        }

        if !report.failures.is_empty() {
            return Err(CliError::Validation(format!(
                "{} of {} documents could not be loaded",
                report.failures.len(),
                report.files
            )));
        }
        if self.strict && !report.issues.is_empty() {
            return Err(CliError::Validation(format!(
                "manifest has {} issues",
                report.issues.len()
            )));
        }

        output.line(Tone::Good, &format!("{} documents OK", report.files));
        Ok(())
    }
}

fn check_source(source: &dyn DocSource) -> Result<Report, CliError> {
    let text = source.fetch_manifest()?;
    let manifest = Manifest::from_json(&text)
        .map_err(|e| CliError::Validation(e.to_string()))?;

    let files = manifest.files();
    if files.is_empty() {
        return Err(CliError::Validation(
            "No documentation files found in manifest".to_owned(),
        ));
    }

    let failures = files
        .iter()
        .filter_map(|entry| {
            tracing::info!(path = %entry.path, "Fetching document");
            source
                .fetch_document(entry.path)
                .err()
                .map(|e| (entry.path.to_owned(), e.to_string()))
        })
        .collect();

    Ok(Report {
        files: files.len(),
        issues: manifest.validate().iter().map(ToString::to_string).collect(),
        failures,
    })
}

//! `sw render` command implementation.

use std::path::PathBuf;

use clap::Args;
use sw_manifest::Manifest;
use sw_renderer::MarkdownRenderer;
use sw_source::DocSource;

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document path relative to the documentation base.
    path: String,

    /// Path to configuration file (default: auto-discover sw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Render documentation served from this base URL.
    #[arg(long, env = "SW_DOCS_URL", conflicts_with = "source_dir")]
    base_url: Option<String>,

    /// Rewrite document links with this prefix (e.g. `/help?doc=`).
    #[arg(long)]
    link_prefix: Option<String>,

    /// Parse as plain CommonMark (no tables, task lists or alerts).
    #[arg(long)]
    no_gfm: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be fetched or written.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let settings = super::source_settings(self.source_dir, self.base_url);
        let server_config = super::load_config(self.config.as_deref(), &settings, version)?;
        let source = server_config.source();

        if let Some(warning) = unlisted_warning(source.as_ref(), &self.path) {
            output.line(Tone::Warn, &warning);
        }
        let html = render_document(source.as_ref(), &self.path, self.link_prefix, !self.no_gfm)?;
        output.result(&html)?;
        Ok(())
    }
}

fn render_document(
    source: &dyn DocSource,
    path: &str,
    link_prefix: Option<String>,
    gfm: bool,
) -> Result<String, CliError> {
    let markdown = source.fetch_document(path)?;

    let mut renderer = MarkdownRenderer::new()
        .with_gfm(gfm)
        .with_title_extraction()
        .with_base_path(path);
    if let Some(prefix) = link_prefix {
        renderer = renderer.with_link_prefix(prefix);
    }
    let result = renderer.render_markdown(&markdown);
    tracing::info!(
        path,
        title = result.title.as_deref().unwrap_or(""),
        headings = result.toc.len(),
        "Rendered document"
    );

    let mut html = result.html;
    html.push('\n');
    Ok(html)
}

/// Documents outside the manifest still render, but the sidebar never links them.
///
/// Returns `None` when the path is listed or the manifest is unavailable.
fn unlisted_warning(source: &dyn DocSource, path: &str) -> Option<String> {
    let manifest = Manifest::from_json(&source.fetch_manifest().ok()?).ok()?;
    (!manifest.contains_path(path))
        .then(|| format!("{path} is not listed in the manifest of {}", source.describe()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sw_source::MockSource;

    use super::*;

    #[test]
    fn test_render_document() {
        let source = MockSource::new()
            .with_document("ops/runbook.md", "# Runbook\n\nSee [FAQ](../faq.md).");

        let html = render_document(&source, "ops/runbook.md", Some("/help?doc=".to_owned()), true)
            .unwrap();

        assert!(html.starts_with("<h1 id=\"runbook\">Runbook</h1>"));
        assert!(html.contains("href=\"/help?doc=faq.md\""));
    }

    #[test]
    fn test_render_missing_document() {
        let result = render_document(&MockSource::new(), "missing.md", None, true);

        assert!(matches!(result, Err(CliError::Source(_))));
    }

    #[test]
    fn test_render_without_gfm_leaves_tables_as_text() {
        let source = MockSource::new().with_document("t.md", "| a |\n|---|\n| 1 |");

        let gfm = render_document(&source, "t.md", None, true).unwrap();
        let plain = render_document(&source, "t.md", None, false).unwrap();

        assert!(gfm.contains("<table>"));
        assert!(!plain.contains("<table>"));
    }

    #[test]
    fn test_unlisted_warning() {
        let source = MockSource::new()
            .with_manifest(r#"{"sections": [{"title": "FAQ", "type": "file", "path": "faq.md"}]}"#)
            .with_document("faq.md", "# FAQ")
            .with_document("draft.md", "# Draft");

        assert_eq!(unlisted_warning(&source, "faq.md"), None);
        assert!(
            unlisted_warning(&source, "draft.md")
                .unwrap()
                .starts_with("draft.md is not listed")
        );
    }

    #[test]
    fn test_unlisted_warning_without_manifest() {
        let source = MockSource::new().with_document("draft.md", "# Draft");

        assert_eq!(unlisted_warning(&source, "draft.md"), None);
    }
}

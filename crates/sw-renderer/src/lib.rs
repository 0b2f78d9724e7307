//! Sanitizing markdown renderer for StackWatch documentation.
//!
//! Turns CommonMark with GFM extensions (tables, strikethrough, task lists,
//! alerts) into HTML that is safe to place in a page: raw HTML in the source
//! is escaped rather than injected, and link/image URLs with executable
//! schemes are neutralized.
//!
//! # Example
//!
//! ```
//! use sw_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .with_base_path("alerting/rules.md")
//!     .with_link_prefix("/help?doc=")
//!     .render_markdown("# Rules\n\nSee [routing](routing.md). <b>raw</b>");
//!
//! assert_eq!(result.title.as_deref(), Some("Rules"));
//! assert!(result.html.contains(r#"href="/help?doc=alerting/routing.md""#));
//! assert!(result.html.contains("&lt;b&gt;raw&lt;/b&gt;"));
//! ```

mod link;
mod renderer;
mod state;

pub use link::{BLOCKED_URL, is_safe_url, resolve_relative_path};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{AlertKind, TocEntry, escape_html, slugify};

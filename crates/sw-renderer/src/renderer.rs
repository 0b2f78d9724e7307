//! Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::link::{self, BLOCKED_URL};
use crate::state::{
    AlertKind, CodeBlockState, HeadingState, ImageState, TableState, TocEntry, escape_html,
};

/// Result of rendering markdown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML.
    pub html: String,
    /// Title from the first H1 (when title extraction is enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer producing sanitized HTML.
///
/// Raw HTML in the source is escaped and shown as text. Link and image
/// URLs with a scheme outside http, https, mailto and tel are replaced
/// with `#`.
///
/// Relative `.md` links are rewritten to viewer links when a link prefix is
/// set, and relative image sources are resolved against the asset prefix.
/// Both resolve against the directory of the base path.
pub struct MarkdownRenderer {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    /// Directory of the document being rendered.
    base_dir: String,
    link_prefix: Option<String>,
    asset_prefix: Option<String>,
    pending_image: Option<(String, String)>,
    gfm: bool,
    /// Open blockquotes; `Some` for GFM alerts.
    alert_stack: Vec<Option<AlertKind>>,
}

impl MarkdownRenderer {
    /// Create a new renderer with GFM enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(false),
            base_dir: String::new(),
            link_prefix: None,
            asset_prefix: None,
            pending_image: None,
            gfm: true,
            alert_stack: Vec::new(),
        }
    }

    /// Extract the first H1 as the document title.
    ///
    /// The heading is still rendered but left out of the table of contents.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.heading = HeadingState::new(true);
        self
    }

    /// Set the path of the document being rendered (e.g. `ops/alerts.md`).
    ///
    /// Relative links and images resolve against its directory.
    #[must_use]
    pub fn with_base_path(mut self, path: &str) -> Self {
        link::parent_dir(path).clone_into(&mut self.base_dir);
        self
    }

    /// Rewrite relative `.md` links to `{prefix}{path}`.
    #[must_use]
    pub fn with_link_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.link_prefix = Some(prefix.into());
        self
    }

    /// Resolve relative image sources under `{prefix}/`.
    #[must_use]
    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = Some(prefix.into());
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM covers tables, strikethrough, task lists and alerts.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Parser options for the configured feature set.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Render markdown text with the configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        let parser = Parser::new_ext(markdown, self.parser_options());
        self.render(parser)
    }

    /// Render a stream of markdown events.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
        }
    }

    /// Push inline content to the heading buffer or the output.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {}
        }
    }

    fn link_href(&self, url: &str) -> String {
        if !link::is_safe_url(url) {
            return BLOCKED_URL.to_owned();
        }
        self.link_prefix
            .as_deref()
            .and_then(|prefix| link::resolve_doc_link(url, &self.base_dir, prefix))
            .unwrap_or_else(|| url.to_owned())
    }

    fn image_src(&self, url: &str) -> String {
        if !link::is_safe_url(url) {
            return BLOCKED_URL.to_owned();
        }
        self.asset_prefix
            .as_deref()
            .and_then(|prefix| link::resolve_asset(url, &self.base_dir, prefix))
            .unwrap_or_else(|| url.to_owned())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the ID is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(kind) => {
                if let Some(kind) = kind {
                    let alert = AlertKind::from(kind);
                    let (class, label) = alert.class_and_label();
                    self.alert_stack.push(Some(alert));
                    let _ = write!(
                        self.output,
                        r#"<div class="alert alert-{class}"><p class="alert-title">{label}</p>"#
                    );
                } else {
                    self.alert_stack.push(None);
                    self.output.push_str("<blockquote>");
                }
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{tag}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link { dest_url, .. } => {
                let href = self.link_href(&dest_url);
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                if self.image.start() {
                    self.pending_image = Some((self.image_src(&dest_url), title.to_string()));
                }
            }
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.complete_heading() {
                    let level = heading.level;
                    let _ = write!(
                        self.output,
                        r#"<h{level} id="{}">{}</h{level}>"#,
                        heading.id,
                        heading.html.trim()
                    );
                }
            }
            TagEnd::BlockQuote(_) => match self.alert_stack.pop() {
                Some(Some(_)) => self.output.push_str("</div>"),
                _ => self.output.push_str("</blockquote>"),
            },
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                match lang {
                    Some(lang) => {
                        let _ = write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&content)
                        );
                    }
                    None => {
                        let _ = write!(self.output, "<pre><code>{}</code></pre>", escape_html(&content));
                    }
                }
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some(alt) = self.image.end()
                    && let Some((src, title)) = self.pending_image.take()
                {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    let img = format!(
                        r#"<img src="{}"{title_attr} alt="{}">"#,
                        escape_html(&src),
                        escape_html(&alt)
                    );
                    self.push_inline(&img);
                }
            }
            TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }

        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
            return;
        }

        self.output.push_str(&escape_html(text));
    }

    fn inline_code(&mut self, code: &str) {
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
    }

    /// Raw HTML is shown as text, never injected.
    fn raw_html(&mut self, html: &str) {
        if self.code.is_active() {
            self.code.push_str(html);
            return;
        }
        let escaped = escape_html(html);
        self.push_inline(&escaped);
    }

    fn soft_break(&mut self) {
        if self.heading.is_active() {
            self.heading.push_text(" ");
        }
        self.push_inline("\n");
    }

    fn task_list_marker(&mut self, checked: bool) {
        if checked {
            self.output
                .push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            self.output.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> RenderResult {
        MarkdownRenderer::new().render_markdown(markdown)
    }

    fn render_doc(markdown: &str, path: &str) -> RenderResult {
        MarkdownRenderer::new()
            .with_title_extraction()
            .with_base_path(path)
            .with_link_prefix("/help?doc=")
            .with_asset_prefix("/help/docs")
            .render_markdown(markdown)
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello, world!").html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_with_id() {
        let result = render("## Section Title");

        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 2,
                title: "Section Title".to_owned(),
                id: "section-title".to_owned(),
            }]
        );
    }

    #[test]
    fn test_title_extraction() {
        let result = render_doc("# Alert Rules\n\nText\n\n## Severity", "ops/rules.md");

        assert_eq!(result.title.as_deref(), Some("Alert Rules"));
        assert!(result.html.contains(r#"<h1 id="alert-rules">Alert Rules</h1>"#));
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].id, "severity");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render("## Query `rate()`");

        assert!(result.html.contains("<code>rate()</code>"));
        assert_eq!(result.toc[0].title, "Query rate()");
    }

    #[test]
    fn test_code_block_language() {
        let result = render("```promql\nrate(http_requests_total[5m])\n```");

        assert_eq!(
            result.html,
            "<pre><code class=\"language-promql\">rate(http_requests_total[5m])\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_escapes_content() {
        let result = render("```\n<b>not bold</b>\n```");

        assert!(result.html.contains("&lt;b&gt;not bold&lt;/b&gt;"));
    }

    #[test]
    fn test_raw_html_block_escaped() {
        let result = render("<script>alert('x')</script>");

        assert!(!result.html.contains("<script>"));
        assert!(result.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_inline_html_escaped() {
        let result = render("Click <img src=x onerror=alert(1)> here");

        assert!(!result.html.contains("<img"));
        assert!(result.html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_javascript_link_blocked() {
        let result = render("[click](javascript:alert(1))");

        assert_eq!(result.html, r##"<p><a href="#">click</a></p>"##);
    }

    #[test]
    fn test_data_image_blocked() {
        let result = render("![x](data:image/svg+xml;base64,AAAA)");

        assert_eq!(result.html, r##"<p><img src="#" alt="x"></p>"##);
    }

    #[test]
    fn test_external_link_kept() {
        let result = render_doc("[Prometheus](https://prometheus.io/docs/)", "a.md");

        assert!(result.html.contains(r#"href="https://prometheus.io/docs/""#));
    }

    #[test]
    fn test_relative_md_link_rewritten() {
        let result = render_doc("[Next](../grafana/panels.md#stat)", "ops/alerts.md");

        assert!(
            result
                .html
                .contains(r#"href="/help?doc=grafana/panels.md#stat""#)
        );
    }

    #[test]
    fn test_link_not_rewritten_without_prefix() {
        let result = render("[Next](other.md)");

        assert!(result.html.contains(r#"href="other.md""#));
    }

    #[test]
    fn test_relative_image_resolved() {
        let result = render_doc("![Graph](img/graph.png \"Latency\")", "ops/alerts.md");

        assert!(result.html.contains(
            r#"<img src="/help/docs/ops/img/graph.png" title="Latency" alt="Graph">"#
        ));
    }

    #[test]
    fn test_table() {
        let result = render("| A | B |\n|:--|--:|\n| 1 | 2 |");

        assert_eq!(
            result.html,
            concat!(
                "<table><thead><tr>",
                r#"<th style="text-align:left">A</th><th style="text-align:right">B</th>"#,
                "</tr></thead><tbody><tr>",
                r#"<td style="text-align:left">1</td><td style="text-align:right">2</td>"#,
                "</tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_strikethrough_and_emphasis() {
        let result = render("~~old~~ *new* **bold**");

        assert_eq!(
            result.html,
            "<p><s>old</s> <em>new</em> <strong>bold</strong></p>"
        );
    }

    #[test]
    fn test_task_list() {
        let result = render("- [ ] todo\n- [x] done");

        assert!(result.html.contains(r#"<input type="checkbox" disabled> todo"#));
        assert!(
            result
                .html
                .contains(r#"<input type="checkbox" checked disabled> done"#)
        );
    }

    #[test]
    fn test_alert() {
        let result = render("> [!WARNING]\n> Disk almost full");

        assert!(result.html.starts_with(r#"<div class="alert alert-warning">"#));
        assert!(result.html.contains("Disk almost full"));
        assert!(result.html.ends_with("</div>"));
    }

    #[test]
    fn test_plain_blockquote() {
        let result = render("> quoted");

        assert_eq!(result.html, "<blockquote><p>quoted</p></blockquote>");
    }

    #[test]
    fn test_ordered_list_start() {
        let result = render("3. three\n4. four");

        assert!(result.html.starts_with(r#"<ol start="3">"#));
    }

    #[test]
    fn test_nested_image_keeps_outer() {
        let result = render("![a ![b](y.png)](x.png)");

        assert_eq!(result.html, r#"<p><img src="x.png" alt="a b"></p>"#);
    }

    #[test]
    fn test_gfm_disabled() {
        let renderer = MarkdownRenderer::new().with_gfm(false);

        assert!(!renderer.parser_options().contains(Options::ENABLE_TABLES));
    }
}

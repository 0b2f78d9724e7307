//! HTML page templates.
//!
//! Pages are plain server-rendered HTML: no scripts, one inline stylesheet.
//! Sidebar toggles and theme switches are links, so the viewer works with
//! JavaScript disabled and under a strict CSP.

use std::collections::BTreeSet;
use std::fmt::Write;

use percent_encoding::utf8_percent_encode;
use sw_config::{ServiceConfig, ServiceIcon, Theme};
use sw_manifest::NodeKey;
use sw_renderer::{TocEntry, escape_html};
use sw_viewer::{NavItem, NavKind, ViewerView};

use crate::handlers::{QUERY_VALUE, help_url};

/// Per-request page chrome.
pub(crate) struct Chrome<'a> {
    /// Platform name.
    pub(crate) title: &'a str,
    pub(crate) version: &'a str,
    pub(crate) theme: Theme,
    /// Path and query of the current page, for the theme toggle.
    pub(crate) current: &'a str,
}

const STYLE: &str = "\
:root{--bg:#f8fafc;--fg:#0f172a;--muted:#64748b;--card:#fff;--border:#e2e8f0;--accent:#2563eb}
[data-theme=dark]{--bg:#0f172a;--fg:#e2e8f0;--muted:#94a3b8;--card:#1e293b;--border:#334155;--accent:#60a5fa}
body{margin:0;font-family:system-ui,sans-serif;background:var(--bg);color:var(--fg)}
a{color:var(--accent);text-decoration:none}
header,footer{display:flex;align-items:center;gap:1rem;padding:.75rem 1.5rem;border-bottom:1px solid var(--border)}
footer{border-top:1px solid var(--border);border-bottom:0;color:var(--muted);font-size:.85rem}
header .brand{font-weight:700;color:var(--fg)}
header .spacer{flex:1}
.status-pill{font-size:.75rem;padding:.1rem .6rem;border-radius:999px;background:#16a34a;color:#fff}
main{padding:1.5rem}
.cards{display:grid;grid-template-columns:repeat(auto-fill,minmax(16rem,1fr));gap:1rem}
.card{background:var(--card);border:1px solid var(--border);border-radius:.5rem;padding:1rem}
.badge{font-size:.7rem;text-transform:uppercase;padding:.1rem .4rem;border-radius:.25rem;background:var(--border)}
.badge-active{background:#dcfce7;color:#166534}
.badge-maintenance{background:#fef9c3;color:#854d0e}
.badge-deprecated{background:#fee2e2;color:#991b1b}
.viewer{display:flex;gap:1.5rem}
.sidebar{width:16rem;flex-shrink:0}
.sidebar ul{list-style:none;margin:0;padding-left:.75rem}
.sidebar>ul{padding-left:0}
.nav-section{font-weight:600;color:var(--fg)}
.nav-file.selected{font-weight:600;text-decoration:underline}
.document{flex:1;min-width:0}
.toc{width:12rem;flex-shrink:0;font-size:.85rem}
.banner{padding:.75rem 1rem;border-radius:.375rem;background:#fee2e2;color:#991b1b;margin-bottom:1rem}
.alert{border-left:4px solid var(--accent);padding:.25rem 1rem;margin:1rem 0}
.alert-title{font-weight:600}
pre{background:var(--card);border:1px solid var(--border);padding:.75rem;overflow:auto}
table{border-collapse:collapse}th,td{border:1px solid var(--border);padding:.25rem .5rem}
";

/// Wrap a page body in the shared layout.
pub(crate) fn render_layout(chrome: &Chrome<'_>, page_title: &str, body: &str) -> String {
    let mut html = String::with_capacity(8192 + body.len());

    html.push_str("<!DOCTYPE html>\n");
    let _ = writeln!(
        html,
        "<html lang=\"en\" data-theme=\"{}\">",
        chrome.theme.as_str()
    );
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} - {}</title>",
        escape_html(page_title),
        escape_html(chrome.title)
    );
    let _ = writeln!(html, "<style>\n{STYLE}</style>");
    html.push_str("</head>\n<body>\n");

    render_header(&mut html, chrome);
    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("</main>\n");
    let _ = writeln!(
        html,
        "<footer>{} v{}</footer>",
        escape_html(chrome.title),
        escape_html(chrome.version)
    );

    html.push_str("</body>\n</html>\n");
    html
}

fn render_header(html: &mut String, chrome: &Chrome<'_>) {
    let next = chrome.theme.toggled();
    let return_to: String = utf8_percent_encode(chrome.current, QUERY_VALUE).collect();

    html.push_str("<header>\n");
    let _ = writeln!(
        html,
        "<a class=\"brand\" href=\"/\">{}</a>",
        escape_html(chrome.title)
    );
    html.push_str("<a href=\"/\">Services</a>\n<a href=\"/help\">Help</a>\n");
    html.push_str("<span class=\"spacer\"></span>\n");
    html.push_str("<span class=\"status-pill\">Online</span>\n");
    let _ = writeln!(
        html,
        "<a class=\"theme-toggle\" href=\"/theme/{}?return={return_to}\">{} mode</a>",
        next.as_str(),
        if next == Theme::Dark { "Dark" } else { "Light" }
    );
    html.push_str("</header>\n");
}

/// Landing page body with one card per service.
pub(crate) fn render_home(services: &[ServiceConfig]) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str("<h1>Services</h1>\n<div class=\"cards\">\n");
    for service in services {
        let status = service.status.as_str();
        let _ = write!(
            html,
            "<a class=\"card\" id=\"{id}\" href=\"{href}\">\
             <span class=\"icon icon-{icon}\"></span>\
             <h2>{name}</h2>\
             <p>{description}</p>\
             <span class=\"badge badge-{status}\">{status}</span></a>\n",
            id = escape_html(&service.id),
            href = escape_html(&service.path),
            icon = icon_name(service.icon),
            name = escape_html(&service.name),
            description = escape_html(&service.description),
        );
    }
    html.push_str("</div>\n");
    html
}

fn icon_name(icon: ServiceIcon) -> &'static str {
    match icon {
        ServiceIcon::Prometheus => "prometheus",
        ServiceIcon::Grafana => "grafana",
        ServiceIcon::Help => "help",
    }
}

/// Help viewer body: sidebar, banner, document and table of contents.
pub(crate) fn render_help(view: &ViewerView) -> String {
    let mut html = String::with_capacity(4096 + view.document.html.len());
    html.push_str("<div class=\"viewer\">\n");

    html.push_str("<nav class=\"sidebar\" aria-label=\"Documentation\">\n");
    render_nav_list(&mut html, &view.navigation, view);
    html.push_str("</nav>\n");

    html.push_str("<article class=\"document\">\n");
    if let Some(banner) = &view.banner {
        let _ = writeln!(
            html,
            "<div class=\"banner\" role=\"alert\">{}</div>",
            escape_html(&banner.to_string())
        );
    }
    html.push_str(&view.document.html);
    html.push_str("</article>\n");

    render_toc(&mut html, &view.document.toc);

    html.push_str("</div>\n");
    html
}

fn render_nav_list(html: &mut String, items: &[NavItem], view: &ViewerView) {
    if items.is_empty() {
        return;
    }
    html.push_str("<ul>\n");
    for item in items {
        html.push_str("<li>");
        let title = escape_html(&item.title);
        match &item.kind {
            NavKind::File { path } if !path.is_empty() => {
                let href = help_url(Some(path), &view.expanded);
                let _ = write!(
                    html,
                    "<a class=\"nav-file{}\" href=\"{}\">{title}</a>",
                    if item.selected { " selected" } else { "" },
                    escape_html(&href)
                );
            }
            NavKind::File { .. } => {
                let _ = write!(html, "<span class=\"nav-file\">{title}</span>");
            }
            NavKind::Section if item.toggleable => {
                let href = help_url(
                    view.selected_path.as_deref(),
                    &toggled(&view.expanded, &item.key),
                );
                let _ = write!(
                    html,
                    "<a class=\"nav-section\" href=\"{}\" aria-expanded=\"{}\">{title}</a>",
                    escape_html(&href),
                    item.expanded
                );
            }
            NavKind::Section => {
                let _ = write!(html, "<span class=\"nav-section\">{title}</span>");
            }
        }
        html.push('\n');
        render_nav_list(html, &item.children, view);
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}

/// `expanded` with `key` flipped.
fn toggled(expanded: &BTreeSet<NodeKey>, key: &NodeKey) -> BTreeSet<NodeKey> {
    let mut next = expanded.clone();
    if !next.remove(key) {
        next.insert(key.clone());
    }
    next
}

fn render_toc(html: &mut String, toc: &[TocEntry]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<aside class=\"toc\">\n<p>On this page</p>\n<ul>\n");
    for entry in toc {
        let _ = writeln!(
            html,
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>",
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.title)
        );
    }
    html.push_str("</ul>\n</aside>\n");
}

//! Navigation tree view model.
//!
//! [`build_navigation`] turns manifest nodes into [`NavItem`]s for a sidebar.
//! Items carry no behavior of their own: [`NavItem::activate`] reports what a
//! click means and the viewer acts on it.

use std::collections::BTreeSet;

use serde::Serialize;
use sw_manifest::{MenuNode, NodeKey};

/// Sidebar behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavOptions {
    /// `true`: sections toggle and collapsed sections hide their children.
    /// `false`: sections are inert labels and everything is shown.
    pub expandable: bool,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self { expandable: true }
    }
}

/// What a navigation item points at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavKind {
    File { path: String },
    Section,
}

/// User intent raised by clicking an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavEvent {
    SelectDocument(String),
    ToggleSection(NodeKey),
}

/// One rendered sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Structural position; unique even when titles repeat.
    pub key: NodeKey,
    pub title: String,
    /// Nesting level, 0 for top-level entries.
    pub depth: usize,
    #[serde(flatten)]
    pub kind: NavKind,
    /// File whose path equals the selected path.
    pub selected: bool,
    /// Children are shown.
    pub expanded: bool,
    /// Clicking toggles the section.
    pub toggleable: bool,
    /// Built children; empty for collapsed sections.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// Event raised when the item is clicked, if it is clickable.
    #[must_use]
    pub fn activate(&self) -> Option<NavEvent> {
        match &self.kind {
            NavKind::File { path } if !path.is_empty() => {
                Some(NavEvent::SelectDocument(path.clone()))
            }
            NavKind::File { .. } => None,
            NavKind::Section => self
                .toggleable
                .then(|| NavEvent::ToggleSection(self.key.clone())),
        }
    }

    /// Path of the file this item points at.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match &self.kind {
            NavKind::File { path } => Some(path),
            NavKind::Section => None,
        }
    }
}

/// Build the sidebar for a manifest.
///
/// Manifest order is kept at every level.
#[must_use]
pub fn build_navigation(
    sections: &[MenuNode],
    selected: Option<&str>,
    expanded: &BTreeSet<NodeKey>,
    options: NavOptions,
) -> Vec<NavItem> {
    build_level(sections, None, selected, expanded, options)
}

fn build_level(
    nodes: &[MenuNode],
    parent: Option<&NodeKey>,
    selected: Option<&str>,
    expanded: &BTreeSet<NodeKey>,
    options: NavOptions,
) -> Vec<NavItem> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let key = parent.map_or_else(|| NodeKey::root(i), |p| p.child(i));
            let depth = key.depth();
            match node {
                MenuNode::File { title, path } => NavItem {
                    selected: !path.is_empty() && selected == Some(path.as_str()),
                    key,
                    title: title.clone(),
                    depth,
                    kind: NavKind::File { path: path.clone() },
                    expanded: false,
                    toggleable: false,
                    children: Vec::new(),
                },
                MenuNode::Section { title, children } => {
                    let has_children = !children.is_empty();
                    let open = has_children && (!options.expandable || expanded.contains(&key));
                    let built = if open {
                        build_level(children, Some(&key), selected, expanded, options)
                    } else {
                        Vec::new()
                    };
                    NavItem {
                        key,
                        title: title.clone(),
                        depth,
                        kind: NavKind::Section,
                        selected: false,
                        expanded: open,
                        toggleable: options.expandable && has_children,
                        children: built,
                    }
                }
            }
        })
        .collect()
}

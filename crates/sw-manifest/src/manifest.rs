//! Manifest root and tree traversal.

use serde::{Deserialize, Serialize};

use crate::node::{MenuNode, NodeKey};
use crate::validate::{self, ManifestIssue};

/// Root of the documentation tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Top-level nodes in manifest order. Missing in the source means empty.
    #[serde(default)]
    pub sections: Vec<MenuNode>,
}

/// Error parsing a manifest document.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The document is not valid manifest JSON.
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A navigable file found during traversal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry<'a> {
    /// Structural position of the file node.
    pub key: NodeKey,
    /// Display label.
    pub title: &'a str,
    /// Document path.
    pub path: &'a str,
}

/// Find the first navigable file in pre-order.
///
/// Sequence order at each level is authoritative: a section's children are
/// visited before the section's later siblings. File nodes with an empty path
/// are skipped.
#[must_use]
pub fn find_first_file(nodes: &[MenuNode]) -> Option<&str> {
    nodes.iter().find_map(|node| match node {
        MenuNode::File { .. } => node.path(),
        MenuNode::Section { children, .. } => find_first_file(children),
    })
}

impl Manifest {
    /// Create a manifest from top-level nodes.
    #[must_use]
    pub fn new(sections: Vec<MenuNode>) -> Self {
        Self { sections }
    }

    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Path of the first navigable file in pre-order.
    #[must_use]
    pub fn first_file(&self) -> Option<&str> {
        find_first_file(&self.sections)
    }

    /// Whether the manifest has no top-level nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All navigable files in pre-order.
    #[must_use]
    pub fn files(&self) -> Vec<FileEntry<'_>> {
        fn walk<'a>(nodes: &'a [MenuNode], parent: Option<&NodeKey>, out: &mut Vec<FileEntry<'a>>) {
            for (i, node) in nodes.iter().enumerate() {
                let key = parent.map_or_else(|| NodeKey::root(i), |p| p.child(i));
                match node {
                    MenuNode::File { title, path } if !path.is_empty() => out.push(FileEntry {
                        key,
                        title,
                        path,
                    }),
                    MenuNode::File { .. } => {}
                    MenuNode::Section { children, .. } => walk(children, Some(&key), out),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.sections, None, &mut out);
        out
    }

    /// Whether any file node points at `path`.
    #[must_use]
    pub fn contains_path(&self, path: &str) -> bool {
        self.files().iter().any(|entry| entry.path == path)
    }

    /// Keys of the sections enclosing the first file with `path`.
    ///
    /// Ordered from the outermost section inwards. Empty when the path is not
    /// in the manifest or the file is at the top level.
    #[must_use]
    pub fn ancestors_of(&self, path: &str) -> Vec<NodeKey> {
        let Some(entry) = self.files().into_iter().find(|entry| entry.path == path) else {
            return Vec::new();
        };

        let mut ancestors = Vec::new();
        let mut current = entry.key.parent();
        while let Some(key) = current {
            current = key.parent();
            ancestors.push(key);
        }
        ancestors.reverse();
        ancestors
    }

    /// Look up a node by its structural key.
    #[must_use]
    pub fn node(&self, key: &NodeKey) -> Option<&MenuNode> {
        let (first, rest) = key.indices().split_first()?;
        let mut node = self.sections.get(*first)?;
        for &index in rest {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    /// Check the manifest for structural problems.
    ///
    /// Issues are advisory: a manifest with issues still loads and renders.
    #[must_use]
    pub fn validate(&self) -> Vec<ManifestIssue> {
        validate::validate(&self.sections)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Manifest {
        Manifest::new(vec![
            MenuNode::section(
                "A",
                vec![
                    MenuNode::section("A1", vec![]),
                    MenuNode::file("doc1", "a.md"),
                ],
            ),
            MenuNode::file("doc2", "b.md"),
        ])
    }

    #[test]
    fn test_find_first_file_preorder() {
        assert_eq!(find_first_file(&sample().sections), Some("a.md"));
    }

    #[test]
    fn test_find_first_file_section_children_before_siblings() {
        let nodes = vec![
            MenuNode::section(
                "Outer",
                vec![MenuNode::section(
                    "Inner",
                    vec![MenuNode::file("Deep", "deep.md")],
                )],
            ),
            MenuNode::file("Top", "top.md"),
        ];

        assert_eq!(find_first_file(&nodes), Some("deep.md"));
    }

    #[test]
    fn test_find_first_file_skips_empty_paths() {
        let nodes = vec![MenuNode::file("Draft", ""), MenuNode::file("Real", "real.md")];

        assert_eq!(find_first_file(&nodes), Some("real.md"));
    }

    #[test]
    fn test_find_first_file_none_without_files() {
        assert_eq!(find_first_file(&[]), None);

        let nodes = vec![MenuNode::section(
            "Empty",
            vec![MenuNode::section("Nested", vec![])],
        )];
        assert_eq!(find_first_file(&nodes), None);
    }

    #[test]
    fn test_from_json_missing_sections_is_empty() {
        let manifest = Manifest::from_json("{}").unwrap();

        assert!(manifest.is_empty());
        assert_eq!(manifest.first_file(), None);
    }

    #[test]
    fn test_from_json_preserves_order() {
        let json = r#"{
            "sections": [
                {"title": "Zeta", "type": "file", "path": "z.md"},
                {"title": "Alpha", "type": "section", "children": [
                    {"title": "Beta", "type": "file", "path": "b.md"}
                ]}
            ]
        }"#;
        let manifest = Manifest::from_json(json).unwrap();

        let titles: Vec<_> = manifest.sections.iter().map(MenuNode::title).collect();
        assert_eq!(titles, vec!["Zeta", "Alpha"]);
        assert_eq!(manifest.first_file(), Some("z.md"));
    }

    #[test]
    fn test_from_json_invalid() {
        let result = Manifest::from_json("not json");

        assert!(matches!(result, Err(ManifestError::Json(_))));
    }

    #[test]
    fn test_files_preorder_with_keys() {
        let manifest = sample();
        let files = manifest.files();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, "a.md");
        assert_eq!(files[0].key.to_string(), "0.1");
        assert_eq!(files[1].path, "b.md");
        assert_eq!(files[1].key.to_string(), "1");
    }

    #[test]
    fn test_contains_path() {
        let manifest = sample();

        assert!(manifest.contains_path("b.md"));
        assert!(!manifest.contains_path("missing.md"));
    }

    #[test]
    fn test_ancestors_of_nested_file() {
        let manifest = Manifest::new(vec![MenuNode::section(
            "Ops",
            vec![MenuNode::section(
                "Alerts",
                vec![MenuNode::file("Rules", "ops/rules.md")],
            )],
        )]);

        let ancestors: Vec<String> = manifest
            .ancestors_of("ops/rules.md")
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(ancestors, vec!["0", "0.0"]);
    }

    #[test]
    fn test_ancestors_of_top_level_and_unknown() {
        let manifest = sample();

        assert!(manifest.ancestors_of("b.md").is_empty());
        assert!(manifest.ancestors_of("nope.md").is_empty());
    }

    #[test]
    fn test_node_lookup() {
        let manifest = sample();

        let node = manifest.node(&NodeKey::root(0).child(1)).unwrap();
        assert_eq!(node.title(), "doc1");
        assert!(manifest.node(&NodeKey::root(5)).is_none());
        assert!(manifest.node(&NodeKey::root(1).child(0)).is_none());
    }
}

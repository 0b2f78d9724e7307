//! Manifest tree nodes and their structural keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// One entry of the documentation tree.
///
/// Serialized with the `type` field as discriminator, matching the manifest
/// wire format (`"file"` or `"section"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MenuNode {
    /// Navigable document leaf.
    File {
        /// Display label.
        title: String,
        /// Relative slug resolved against the document base.
        ///
        /// A missing path deserializes to an empty string; such a file is
        /// never selected as a navigation target.
        #[serde(default)]
        path: String,
    },
    /// Grouping of further nodes.
    Section {
        /// Display label.
        title: String,
        /// Ordered children, in manifest order.
        #[serde(default)]
        children: Vec<MenuNode>,
    },
}

impl MenuNode {
    /// Create a file node.
    #[must_use]
    pub fn file(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self::File {
            title: title.into(),
            path: path.into(),
        }
    }

    /// Create a section node.
    #[must_use]
    pub fn section(title: impl Into<String>, children: Vec<MenuNode>) -> Self {
        Self::Section {
            title: title.into(),
            children,
        }
    }

    /// Display label of the node.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::File { title, .. } | Self::Section { title, .. } => title.as_str(),
        }
    }

    /// Document path for file nodes with a non-empty path.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::File { path, .. } if !path.is_empty() => Some(path.as_str()),
            _ => None,
        }
    }

    /// Children of a section (empty for files).
    #[must_use]
    pub fn children(&self) -> &[MenuNode] {
        match self {
            Self::Section { children, .. } => children.as_slice(),
            Self::File { .. } => &[],
        }
    }

    /// Whether this node is a section.
    #[must_use]
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section { .. })
    }

    /// Whether this subtree contains at least one navigable file.
    #[must_use]
    pub fn has_files(&self) -> bool {
        match self {
            Self::File { path, .. } => !path.is_empty(),
            Self::Section { children, .. } => children.iter().any(Self::has_files),
        }
    }
}

/// Structural position of a node in the manifest tree.
///
/// Holds the child index at each level, starting from the top-level
/// `sections` sequence. Rendered as dot-separated indices (`"0.2.1"`).
/// Titles are not unique, so positions identify nodes for rendering and
/// for the expanded-section set.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey(Vec<usize>);

impl NodeKey {
    /// Key of a top-level node.
    #[must_use]
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    /// Key of the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Key of the parent node, `None` for top-level nodes.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(Self(self.0[..n - 1].to_vec())),
        }
    }

    /// Nesting depth (0 for top-level nodes).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Child indices from the root.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Error parsing a [`NodeKey`] from its dotted form.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid node key: {0:?}")]
pub struct ParseNodeKeyError(String);

impl FromStr for NodeKey {
    type Err = ParseNodeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseNodeKeyError(s.to_owned()));
        }
        s.split('.')
            .map(str::parse::<usize>)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
            .map_err(|_| ParseNodeKeyError(s.to_owned()))
    }
}

impl Serialize for NodeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deserialize_file_node() {
        let node: MenuNode =
            serde_json::from_str(r#"{"title": "Intro", "type": "file", "path": "intro.md"}"#)
                .unwrap();

        assert_eq!(node, MenuNode::file("Intro", "intro.md"));
        assert_eq!(node.path(), Some("intro.md"));
        assert!(!node.is_section());
    }

    #[test]
    fn test_deserialize_section_without_children() {
        let node: MenuNode =
            serde_json::from_str(r#"{"title": "Empty", "type": "section"}"#).unwrap();

        assert_eq!(node, MenuNode::section("Empty", vec![]));
        assert!(node.children().is_empty());
        assert!(!node.has_files());
    }

    #[test]
    fn test_deserialize_file_without_path() {
        let node: MenuNode = serde_json::from_str(r#"{"title": "Draft", "type": "file"}"#).unwrap();

        assert_eq!(node.path(), None);
        assert!(!node.has_files());
    }

    #[test]
    fn test_deserialize_unknown_type_fails() {
        let result = serde_json::from_str::<MenuNode>(r#"{"title": "X", "type": "link"}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_type_tag() {
        let json = serde_json::to_value(MenuNode::file("Intro", "intro.md")).unwrap();

        assert_eq!(json["type"], "file");
        assert_eq!(json["path"], "intro.md");
    }

    #[test]
    fn test_has_files_nested() {
        let node = MenuNode::section(
            "Outer",
            vec![MenuNode::section("Inner", vec![MenuNode::file("Doc", "d.md")])],
        );

        assert!(node.has_files());
    }

    #[test]
    fn test_node_key_display_and_parse() {
        let key = NodeKey::root(0).child(2).child(1);

        assert_eq!(key.to_string(), "0.2.1");
        assert_eq!("0.2.1".parse::<NodeKey>().unwrap(), key);
        assert_eq!(key.depth(), 2);
    }

    #[test]
    fn test_node_key_parse_invalid() {
        assert!("".parse::<NodeKey>().is_err());
        assert!("1..2".parse::<NodeKey>().is_err());
        assert!("a.b".parse::<NodeKey>().is_err());
    }

    #[test]
    fn test_node_key_parent() {
        let key = NodeKey::root(3).child(1);

        assert_eq!(key.parent(), Some(NodeKey::root(3)));
        assert_eq!(NodeKey::root(3).parent(), None);
    }

    #[test]
    fn test_node_key_serializes_as_string() {
        let json = serde_json::to_value(NodeKey::root(1).child(4)).unwrap();

        assert_eq!(json, serde_json::json!("1.4"));
    }
}

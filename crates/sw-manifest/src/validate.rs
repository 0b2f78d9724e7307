//! Structural checks for manifests.

use std::collections::HashMap;
use std::fmt;

use crate::node::{MenuNode, NodeKey};

/// Advisory problem found in a manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestIssue {
    /// File node without a path; it can never be selected.
    EmptyPath {
        /// Position of the node.
        key: NodeKey,
        /// Display label.
        title: String,
    },
    /// Section with no children at all.
    EmptySection {
        /// Position of the node.
        key: NodeKey,
        /// Display label.
        title: String,
    },
    /// Section whose subtree has children but no navigable file.
    NoFiles {
        /// Position of the node.
        key: NodeKey,
        /// Display label.
        title: String,
    },
    /// Two siblings share a title.
    DuplicateTitle {
        /// Position of the later sibling.
        key: NodeKey,
        /// Shared label.
        title: String,
    },
    /// A path appears in more than one file node.
    DuplicatePath {
        /// Position of the later occurrence.
        key: NodeKey,
        /// Repeated path.
        path: String,
    },
}

impl ManifestIssue {
    /// Position of the offending node.
    #[must_use]
    pub fn key(&self) -> &NodeKey {
        match self {
            Self::EmptyPath { key, .. }
            | Self::EmptySection { key, .. }
            | Self::NoFiles { key, .. }
            | Self::DuplicateTitle { key, .. }
            | Self::DuplicatePath { key, .. } => key,
        }
    }
}

impl fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath { key, title } => {
                write!(f, "[{key}] file \"{title}\" has no path")
            }
            Self::EmptySection { key, title } => {
                write!(f, "[{key}] section \"{title}\" has no children")
            }
            Self::NoFiles { key, title } => {
                write!(f, "[{key}] section \"{title}\" contains no documentation files")
            }
            Self::DuplicateTitle { key, title } => {
                write!(f, "[{key}] title \"{title}\" is repeated among its siblings")
            }
            Self::DuplicatePath { key, path } => {
                write!(f, "[{key}] path \"{path}\" is listed more than once")
            }
        }
    }
}

/// Collect issues for a list of top-level nodes, in pre-order.
pub(crate) fn validate(sections: &[MenuNode]) -> Vec<ManifestIssue> {
    let mut issues = Vec::new();
    let mut seen_paths: HashMap<&str, NodeKey> = HashMap::new();
    walk(sections, None, &mut seen_paths, &mut issues);
    issues
}

fn walk<'a>(
    nodes: &'a [MenuNode],
    parent: Option<&NodeKey>,
    seen_paths: &mut HashMap<&'a str, NodeKey>,
    issues: &mut Vec<ManifestIssue>,
) {
    let mut sibling_titles: HashMap<&str, usize> = HashMap::new();

    for (i, node) in nodes.iter().enumerate() {
        let key = parent.map_or_else(|| NodeKey::root(i), |p| p.child(i));

        let count = sibling_titles.entry(node.title()).or_default();
        *count += 1;
        if *count == 2 {
            issues.push(ManifestIssue::DuplicateTitle {
                key: key.clone(),
                title: node.title().to_owned(),
            });
        }

        match node {
            MenuNode::File { title, path } => {
                if path.is_empty() {
                    issues.push(ManifestIssue::EmptyPath {
                        key,
                        title: title.clone(),
                    });
                } else if seen_paths.contains_key(path.as_str()) {
                    issues.push(ManifestIssue::DuplicatePath {
                        key,
                        path: path.clone(),
                    });
                } else {
                    seen_paths.insert(path.as_str(), key);
                }
            }
            MenuNode::Section { title, children } => {
                if children.is_empty() {
                    issues.push(ManifestIssue::EmptySection {
                        key: key.clone(),
                        title: title.clone(),
                    });
                } else if !node.has_files() {
                    issues.push(ManifestIssue::NoFiles {
                        key: key.clone(),
                        title: title.clone(),
                    });
                }
                walk(children, Some(&key), seen_paths, issues);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_clean_manifest_has_no_issues() {
        let nodes = vec![
            MenuNode::section("Guide", vec![MenuNode::file("Intro", "intro.md")]),
            MenuNode::file("FAQ", "faq.md"),
        ];

        assert!(validate(&nodes).is_empty());
    }

    #[test]
    fn test_empty_path_reported() {
        let nodes = vec![MenuNode::file("Draft", "")];

        let issues = validate(&nodes);

        assert_eq!(
            issues,
            vec![ManifestIssue::EmptyPath {
                key: NodeKey::root(0),
                title: "Draft".to_owned(),
            }]
        );
    }

    #[test]
    fn test_empty_section_reported() {
        let nodes = vec![MenuNode::section("Soon", vec![])];

        let issues = validate(&nodes);

        assert!(matches!(issues[0], ManifestIssue::EmptySection { .. }));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_section_without_files_reported_once_per_level() {
        let nodes = vec![MenuNode::section(
            "Outer",
            vec![MenuNode::section("Inner", vec![])],
        )];

        let issues = validate(&nodes);

        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], ManifestIssue::NoFiles { .. }));
        assert!(matches!(issues[1], ManifestIssue::EmptySection { .. }));
        assert_eq!(issues[1].key().to_string(), "0.0");
    }

    #[test]
    fn test_duplicate_sibling_titles_reported() {
        let nodes = vec![
            MenuNode::file("Setup", "a.md"),
            MenuNode::file("Setup", "b.md"),
            MenuNode::file("Setup", "c.md"),
        ];

        let issues = validate(&nodes);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key(), &NodeKey::root(1));
    }

    #[test]
    fn test_same_title_in_different_sections_is_fine() {
        let nodes = vec![
            MenuNode::section("Linux", vec![MenuNode::file("Install", "linux.md")]),
            MenuNode::section("Windows", vec![MenuNode::file("Install", "windows.md")]),
        ];

        assert!(validate(&nodes).is_empty());
    }

    #[test]
    fn test_duplicate_paths_reported() {
        let nodes = vec![
            MenuNode::file("One", "same.md"),
            MenuNode::section("Group", vec![MenuNode::file("Two", "same.md")]),
        ];

        let issues = validate(&nodes);

        assert_eq!(
            issues,
            vec![ManifestIssue::DuplicatePath {
                key: NodeKey::root(1).child(0),
                path: "same.md".to_owned(),
            }]
        );
    }

    #[test]
    fn test_issue_display() {
        let issue = ManifestIssue::EmptySection {
            key: NodeKey::root(2),
            title: "Soon".to_owned(),
        };

        assert_eq!(issue.to_string(), r#"[2] section "Soon" has no children"#);
    }
}

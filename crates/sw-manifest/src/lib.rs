//! Documentation manifest model for StackWatch.
//!
//! The manifest is a JSON document describing the documentation navigation
//! tree. Each entry is either a navigable file leaf or a grouping section:
//!
//! ```json
//! {
//!   "sections": [
//!     { "title": "Getting Started", "type": "section", "children": [
//!       { "title": "Overview", "type": "file", "path": "overview.md" }
//!     ]},
//!     { "title": "FAQ", "type": "file", "path": "faq.md" }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use sw_manifest::Manifest;
//!
//! let manifest = Manifest::from_json(
//!     r#"{"sections": [{"title": "FAQ", "type": "file", "path": "faq.md"}]}"#,
//! )?;
//! assert_eq!(manifest.first_file(), Some("faq.md"));
//! # Ok::<(), sw_manifest::ManifestError>(())
//! ```

mod manifest;
mod node;
mod validate;

pub use manifest::{FileEntry, Manifest, ManifestError, find_first_file};
pub use node::{MenuNode, NodeKey, ParseNodeKeyError};
pub use validate::ManifestIssue;

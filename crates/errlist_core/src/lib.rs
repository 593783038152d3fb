//! errlist Core Library
//!
//! Organizes a flat list of diagnostics into three browsable views:
//! - by subject
//! - by file path (a segment trie with collapsed directory chains)
//! - by tag
//!
//! # Quick Start
//!
//! ```
//! use errlist_core::{CancelToken, Explorer, NodeId, NodeKind};
//!
//! let text = r#"{"ImportErrorList": {"version": 1}, "data": [
//!     {"filename": "/a/b/x.ts", "subject": "unused", "row": 5, "level": 2}
//! ]}"#;
//!
//! let mut explorer = Explorer::default();
//! explorer.load_str(text, "inline", None, &CancelToken::new()).unwrap();
//!
//! // "/a" and "b" were collapsed into one directory
//! let dirs = explorer.children(NodeKind::FileGroupRoot, Some(NodeId::FILE)).unwrap();
//! assert_eq!(dirs[0].name, "/a/b");
//! ```
//!
//! # Features
//!
//! ## Lazy queries
//!
//! A tree view asks for the root's children first and then for the children
//! of whatever the user expands:
//!
//! ```
//! use errlist_core::{ClassificationTree, NodeKind};
//!
//! let tree = ClassificationTree::new();
//! for view in tree.children(NodeKind::Root, None).unwrap() {
//!     let children = tree.children(view.kind, Some(view.id)).unwrap();
//!     assert!(children.is_empty());
//! }
//! ```
//!
//! ## Resolving a selection
//!
//! Leaves carry the id of their record, so a selected node maps straight back
//! to the diagnostic it shows:
//!
//! ```
//! use errlist_core::{CancelToken, Explorer, NodeId, NodeKind};
//!
//! let text = r#"{"ImportErrorList": {"version": 1}, "data": [
//!     {"filename": "main.c", "subject": "leak", "row": 12, "column": 3}
//! ]}"#;
//! let mut explorer = Explorer::default();
//! explorer.load_str(text, "inline", None, &CancelToken::new()).unwrap();
//!
//! let group = &explorer.children(NodeKind::SubjectGroupRoot, Some(NodeId::SUBJECT)).unwrap()[0];
//! let leaf = &explorer.children(NodeKind::Node, Some(group.id)).unwrap()[0];
//! let target = explorer.navigation_target(leaf.id).unwrap();
//! assert_eq!((target.line, target.column), (11, 2));
//! ```

mod config;
mod error;
mod explorer;
mod loader;
mod markers;
mod path;
mod record;
mod tree;
mod types;

pub use config::{Config, DisplayConfig, LoaderConfig, CONFIG_FILE_NAME};
pub use error::{ErrListError, Result};
pub use explorer::{Explorer, LoadStatus, NavigationTarget};
pub use loader::{
    file_label, index_record, parse_document, read_document, spawn_load, subject_label,
    tag_label, CancelToken, LoadHandle, LoadOutcome, LoadReport, ProgressCallback,
    SUPPORTED_VERSION,
};
pub use markers::{Marker, MarkerRegistry};
pub use path::{join_segments, split_path};
pub use record::{NewRecord, Record, RecordStore, FIRST_RECORD_ID};
pub use tree::ClassificationTree;
pub use types::*;

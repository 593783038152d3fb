//! Core data types shared by the record store, the classification tree and
//! its consumers.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// Identifier of a node in the classification tree.
///
/// Unique within one tree generation. A reinit starts a fresh id space, so
/// consumers must not hold on to ids across loads.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The single root node.
    pub const ROOT: NodeId = NodeId(1);
    /// Root of the Subject view.
    pub const SUBJECT: NodeId = NodeId(10);
    /// Root of the File view.
    pub const FILE: NodeId = NodeId(11);
    /// Root of the Tag view.
    pub const TAG: NodeId = NodeId(12);
    /// First id handed out to inserted nodes.
    pub const FIRST_USER: u32 = 100;
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a record in the record store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity of a diagnostic.
///
/// Serialized as the numeric `level` used by ImportErrorList documents.
#[repr(u8)]
#[derive(Serialize_repr, Deserialize_repr, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// No classification.
    #[default]
    None = 0,
    /// Error.
    Error = 1,
    /// Warning.
    Warning = 2,
    /// Informational comment.
    Comment = 3,
}

impl Severity {
    /// Maps a document `level` to a severity. Unknown levels read as `Error`.
    pub fn from_level(level: i64) -> Self {
        match level {
            0 => Severity::None,
            1 => Severity::Error,
            2 => Severity::Warning,
            3 => Severity::Comment,
            _ => Severity::Error,
        }
    }

    /// Short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Comment => "comment",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a classification tree node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The single root.
    Root,
    /// Root of the Subject view.
    SubjectGroupRoot,
    /// Root of the File view.
    FileGroupRoot,
    /// Root of the Tag view.
    TagGroupRoot,
    /// One path segment in the File view.
    Directory,
    /// Grouping node: a subject, a tag, or a file name.
    Node,
    /// Leaf referencing a record.
    Data,
}

impl NodeKind {
    /// Parses a kind name as printed by [`NodeKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "root" => Some(NodeKind::Root),
            "subject" | "subjectgrouproot" => Some(NodeKind::SubjectGroupRoot),
            "file" | "filegrouproot" => Some(NodeKind::FileGroupRoot),
            "tag" | "taggrouproot" => Some(NodeKind::TagGroupRoot),
            "directory" | "dir" => Some(NodeKind::Directory),
            "node" | "group" => Some(NodeKind::Node),
            "data" => Some(NodeKind::Data),
            _ => None,
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::SubjectGroupRoot => "subject",
            NodeKind::FileGroupRoot => "file",
            NodeKind::TagGroupRoot => "tag",
            NodeKind::Directory => "directory",
            NodeKind::Node => "node",
            NodeKind::Data => "data",
        }
    }

    /// Whether nodes of this kind can have children.
    pub fn is_container(&self) -> bool {
        !matches!(self, NodeKind::Data)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a view shows for one record: the payload of a Data node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSummary {
    /// Display name of the leaf.
    pub label: String,
    /// 1-based row of the diagnostic.
    pub row: u32,
    /// Record the leaf refers to.
    pub record: RecordId,
    /// Hover text.
    pub tooltip: String,
    /// Severity, drives the icon.
    pub severity: Severity,
}

/// Read-only projection of a tree node, as handed to consumers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    /// Node id.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Referenced record, only for `Data` nodes.
    pub record: Option<RecordId>,
    /// Hover text (empty for non-data nodes).
    pub tooltip: String,
    /// Severity (`None` for non-data nodes).
    pub severity: Severity,
    /// Row (0 for non-data nodes).
    pub row: u32,
    /// Number of immediate children.
    pub child_count: usize,
}

impl NodeView {
    /// Whether a tree view should draw this node as expandable.
    pub fn is_collapsible(&self) -> bool {
        self.child_count > 0
    }
}

/// Per-kind node counts.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Subject groups.
    pub subject_groups: usize,
    /// Tag groups.
    pub tag_groups: usize,
    /// Directory nodes in the File view.
    pub directories: usize,
    /// File nodes in the File view.
    pub files: usize,
    /// Data leaves across all views.
    pub data_nodes: usize,
}

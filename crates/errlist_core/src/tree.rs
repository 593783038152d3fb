//! Classification tree: three views (Subject, File, Tag) over the records.
//!
//! Nodes live in an arena and refer to each other by index handle. Each node
//! owns an ordered list of child handles and knows its parent, so moving the
//! children of a collapsed directory onto its parent is a plain index move.
//!
//! Layout of a tree after a load:
//!
//! ```text
//! Root (1)
//! ├── Subject (10)
//! │   └── <subject>            Node
//! │       └── <label>          Data  ordered by (name, row)
//! ├── File (11)
//! │   └── <dir>/<dir>          Directory (compacted)
//! │       └── <file name>      Node
//! │           └── <label>      Data  ordered by (row, name)
//! └── Tag (12)
//!     └── <tag>                Node
//!         └── <label>          Data  ordered by (name, row)
//! ```

use crate::path::{join_segments, split_path};
use crate::types::{DataSummary, NodeId, NodeKind, NodeView, RecordId, Severity, TreeStats};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::debug;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeHandle(usize);

/// Payload of a tree node. The node kind is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Root,
    SubjectGroupRoot,
    FileGroupRoot,
    TagGroupRoot,
    Directory,
    Node,
    Data {
        record: RecordId,
        row: u32,
        tooltip: String,
        severity: Severity,
    },
}

impl NodeData {
    fn kind(&self) -> NodeKind {
        match self {
            NodeData::Root => NodeKind::Root,
            NodeData::SubjectGroupRoot => NodeKind::SubjectGroupRoot,
            NodeData::FileGroupRoot => NodeKind::FileGroupRoot,
            NodeData::TagGroupRoot => NodeKind::TagGroupRoot,
            NodeData::Directory => NodeKind::Directory,
            NodeData::Node => NodeKind::Node,
            NodeData::Data { .. } => NodeKind::Data,
        }
    }

    fn row(&self) -> u32 {
        match self {
            NodeData::Data { row, .. } => *row,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    id: NodeId,
    name: String,
    data: NodeData,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// How siblings are compared when a child is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiblingOrder {
    /// `(name, row)`: groups, directories, and leaves under a subject or tag.
    NameThenRow,
    /// `(row, name)`: leaves under one file.
    RowThenName,
}

impl SiblingOrder {
    fn compare(self, a: (&str, u32), b: (&str, u32)) -> Ordering {
        match self {
            SiblingOrder::NameThenRow => a.0.cmp(b.0).then(a.1.cmp(&b.1)),
            SiblingOrder::RowThenName => a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)),
        }
    }
}

/// The classification tree.
///
/// # Examples
///
/// ```
/// use errlist_core::{ClassificationTree, DataSummary, NodeKind, RecordId, Severity};
///
/// let mut tree = ClassificationTree::new();
/// let summary = DataSummary {
///     label: "unused variable".into(),
///     row: 5,
///     record: RecordId(1000),
///     tooltip: String::new(),
///     severity: Severity::Warning,
/// };
/// tree.add_subject("lint", summary.clone());
/// tree.add_file("/a/b/x.ts", summary);
/// tree.prune_file();
///
/// let views = tree.children(NodeKind::Root, None).unwrap();
/// assert_eq!(views.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ClassificationTree {
    nodes: Vec<Option<TreeNode>>,
    by_id: HashMap<NodeId, NodeHandle>,
    next_id: u32,
    root: Option<NodeHandle>,
}

impl Default for ClassificationTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationTree {
    /// Creates an initialized tree with the root and its three views.
    pub fn new() -> Self {
        let mut tree = Self::uninitialized();
        tree.init();
        tree
    }

    /// Creates a tree that has not been initialized yet.
    ///
    /// Insertions into it are ignored and queries return `None` until
    /// [`init`](Self::init) is called.
    pub fn uninitialized() -> Self {
        Self {
            nodes: Vec::new(),
            by_id: HashMap::new(),
            next_id: NodeId::FIRST_USER,
            root: None,
        }
    }

    /// Discards every node and rebuilds the root with its three empty views.
    pub fn init(&mut self) {
        self.nodes.clear();
        self.by_id.clear();
        self.next_id = NodeId::FIRST_USER;

        let root = self.alloc(NodeId::ROOT, String::new(), NodeData::Root, None);
        self.root = Some(root);
        for (id, name, data) in [
            (NodeId::SUBJECT, "Subject", NodeData::SubjectGroupRoot),
            (NodeId::FILE, "File", NodeData::FileGroupRoot),
            (NodeId::TAG, "Tag", NodeData::TagGroupRoot),
        ] {
            let handle = self.alloc(id, name.to_string(), data, Some(root));
            self.node_mut(root).children.push(handle);
        }
    }

    /// Whether [`init`](Self::init) has run.
    pub fn is_initialized(&self) -> bool {
        self.root.is_some()
    }

    /// Number of live nodes, including the root and the three views.
    pub fn node_count(&self) -> usize {
        self.by_id.len()
    }

    /// Whether every view is still empty. A fresh tree has no data but
    /// four nodes.
    pub fn has_no_data(&self) -> bool {
        self.view_roots()
            .iter()
            .all(|h| self.node(*h).children.is_empty())
    }

    // ===== Insertion =====

    /// Inserts a leaf for `summary` under the subject group `group`,
    /// creating the group on first use.
    pub fn add_subject(&mut self, group: &str, summary: DataSummary) {
        if let Some(root) = self.handle_of(NodeId::SUBJECT) {
            self.add_grouped(root, group, summary);
        }
    }

    /// Inserts a leaf for `summary` under the tag group `tag`, creating the
    /// group on first use.
    pub fn add_tag(&mut self, tag: &str, summary: DataSummary) {
        if let Some(root) = self.handle_of(NodeId::TAG) {
            self.add_grouped(root, tag, summary);
        }
    }

    fn add_grouped(&mut self, view_root: NodeHandle, group: &str, summary: DataSummary) {
        let group_handle = match self.find_child(view_root, group, NodeKind::Node) {
            Some(h) => h,
            None => self.insert_child(
                view_root,
                group.to_string(),
                NodeData::Node,
                SiblingOrder::NameThenRow,
            ),
        };
        let (name, data) = data_node(summary);
        self.insert_child(group_handle, name, data, SiblingOrder::NameThenRow);
    }

    /// Inserts a leaf for `summary` at `path` in the File view.
    ///
    /// Every segment but the last is a directory, shared with any path that
    /// has the same prefix. The last segment is the file node holding the
    /// leaves of that file. Returns `false` when the path has no segment (the
    /// record then only shows in the Subject and Tag views) or the tree is
    /// not initialized.
    pub fn add_file(&mut self, path: &str, summary: DataSummary) -> bool {
        let Some(file_root) = self.handle_of(NodeId::FILE) else {
            return false;
        };

        let segments = split_path(path);
        let Some((file_name, dirs)) = segments.split_last() else {
            debug!(path = path, record = %summary.record, "path has no segments, skipping file view");
            return false;
        };

        let mut current = file_root;
        let mut matched = 0;
        for dir in dirs {
            match self.find_child(current, dir, NodeKind::Directory) {
                Some(h) => {
                    current = h;
                    matched += 1;
                }
                None => break,
            }
        }
        for dir in &dirs[matched..] {
            current = self.insert_child(
                current,
                dir.clone(),
                NodeData::Directory,
                SiblingOrder::NameThenRow,
            );
        }

        let file = match self.find_child(current, file_name, NodeKind::Node) {
            Some(h) => h,
            None => self.insert_child(
                current,
                file_name.clone(),
                NodeData::Node,
                SiblingOrder::NameThenRow,
            ),
        };
        let (name, data) = data_node(summary);
        self.insert_child(file, name, data, SiblingOrder::RowThenName);
        true
    }

    // ===== Compaction =====

    /// Collapses single-child directory chains in the File view.
    ///
    /// A directory whose only child is another directory absorbs it: the
    /// names are joined with `/` and the grandchildren move up. This repeats
    /// until the directory has several children or its only child is a file.
    /// Returns the number of directories merged away; a second run returns 0.
    pub fn prune_file(&mut self) -> usize {
        let Some(file_root) = self.handle_of(NodeId::FILE) else {
            return 0;
        };

        let mut merged = 0;
        let mut stack: Vec<NodeHandle> = self.node(file_root).children.clone();
        while let Some(handle) = stack.pop() {
            while let Some(only) = self.sole_directory_child(handle) {
                self.absorb_child(handle, only);
                merged += 1;
            }
            stack.extend(self.node(handle).children.iter().copied());
        }

        // Merged names can move a directory relative to its siblings.
        self.resort_by_name(file_root);
        debug!(merged = merged, "compacted file view");
        merged
    }

    fn sole_directory_child(&self, handle: NodeHandle) -> Option<NodeHandle> {
        let node = self.node(handle);
        if node.data != NodeData::Directory {
            return None;
        }
        match node.children.as_slice() {
            [only] if self.node(*only).data == NodeData::Directory => Some(*only),
            _ => None,
        }
    }

    fn absorb_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        let Some(child_node) = self.nodes[child.0].take() else {
            return;
        };
        self.by_id.remove(&child_node.id);
        for grandchild in &child_node.children {
            self.node_mut(*grandchild).parent = Some(parent);
        }
        let parent_node = self.node_mut(parent);
        parent_node.name = join_segments(&parent_node.name, &child_node.name);
        parent_node.children = child_node.children;
    }

    fn resort_by_name(&mut self, from: NodeHandle) {
        let mut stack = vec![from];
        while let Some(handle) = stack.pop() {
            if !matches!(
                self.node(handle).data,
                NodeData::FileGroupRoot | NodeData::Directory
            ) {
                continue;
            }
            let mut children = std::mem::take(&mut self.node_mut(handle).children);
            children.sort_by(|a, b| self.node(*a).name.cmp(&self.node(*b).name));
            stack.extend(children.iter().copied());
            self.node_mut(handle).children = children;
        }
    }

    // ===== Queries =====

    /// Immediate children of the node `(kind, id)`; `id = None` means the root.
    ///
    /// Returns `None` when the id is unknown or the node is not of `kind`.
    pub fn children(&self, kind: NodeKind, id: Option<NodeId>) -> Option<Vec<NodeView>> {
        let id = id.unwrap_or(NodeId::ROOT);
        let handle = self.handle_of(id)?;
        let node = self.node(handle);
        if node.data.kind() != kind {
            return None;
        }
        Some(node.children.iter().map(|h| self.view(*h)).collect())
    }

    /// Projection of the node with this id.
    pub fn get_tree_node(&self, id: NodeId) -> Option<NodeView> {
        self.handle_of(id).map(|h| self.view(h))
    }

    /// Parent of a node; `None` for the root or an unknown id.
    pub fn parent(&self, id: NodeId) -> Option<NodeView> {
        let handle = self.handle_of(id)?;
        self.node(handle).parent.map(|p| self.view(p))
    }

    /// All descendants of a node in depth-first display order, excluding the
    /// node itself.
    pub fn descendants(&self, id: NodeId) -> Option<Vec<NodeView>> {
        let handle = self.handle_of(id)?;
        let mut out = Vec::new();
        let mut stack: Vec<NodeHandle> = self.node(handle).children.iter().rev().copied().collect();
        while let Some(h) = stack.pop() {
            out.push(self.view(h));
            stack.extend(self.node(h).children.iter().rev().copied());
        }
        Some(out)
    }

    /// Records referenced by the data leaves under a node (or the node itself
    /// when it is a leaf), in display order.
    pub fn descendant_records(&self, id: NodeId) -> Option<Vec<RecordId>> {
        let node = self.get_tree_node(id)?;
        if let Some(record) = node.record {
            return Some(vec![record]);
        }
        Some(
            self.descendants(id)?
                .into_iter()
                .filter_map(|v| v.record)
                .collect(),
        )
    }

    /// Per-kind node counts.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for node in self.nodes.iter().flatten() {
            match node.data {
                NodeData::Directory => stats.directories += 1,
                NodeData::Data { .. } => stats.data_nodes += 1,
                NodeData::Node => {
                    match node.parent.map(|p| self.node(p).data.kind()) {
                        Some(NodeKind::SubjectGroupRoot) => stats.subject_groups += 1,
                        Some(NodeKind::TagGroupRoot) => stats.tag_groups += 1,
                        _ => stats.files += 1,
                    }
                }
                _ => {}
            }
        }
        stats
    }

    /// Indented outline of the subtree under `from`, one node per line.
    pub fn render(&self, from: NodeId, indent: usize, show_ids: bool) -> Option<String> {
        let handle = self.handle_of(from)?;
        let mut out = String::new();
        let mut stack: Vec<(NodeHandle, usize)> = self
            .node(handle)
            .children
            .iter()
            .rev()
            .map(|h| (*h, 0))
            .collect();
        while let Some((h, depth)) = stack.pop() {
            let node = self.node(h);
            let pad = " ".repeat(depth * indent);
            match (&node.data, show_ids) {
                (NodeData::Data { record, .. }, true) => {
                    let _ = writeln!(out, "{}{} {} -> {}", pad, node.id, node.name, record);
                }
                (_, true) => {
                    let _ = writeln!(out, "{}{} {}", pad, node.id, node.name);
                }
                (_, false) => {
                    let _ = writeln!(out, "{}{}", pad, node.name);
                }
            }
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        Some(out)
    }

    /// Checks the structural invariants of the arena.
    ///
    /// Returns a description of every violation found; an empty list means
    /// the tree is a well-formed single-rooted tree whose parent links agree
    /// with its child lists and whose directories all lead to data.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let Some(root) = self.root else {
            return problems;
        };

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(h) = stack.pop() {
            if seen[h.0] {
                problems.push(format!("node {} reachable twice", self.node(h).id));
                continue;
            }
            seen[h.0] = true;
            let node = self.node(h);
            if self.by_id.get(&node.id) != Some(&h) {
                problems.push(format!("node {} missing from id index", node.id));
            }
            for child in &node.children {
                match self.nodes.get(child.0).and_then(|n| n.as_ref()) {
                    Some(c) if c.parent == Some(h) => stack.push(*child),
                    Some(c) => problems.push(format!("node {} has wrong parent", c.id)),
                    None => problems.push(format!("node {} links a dropped child", node.id)),
                }
            }
            if node.data == NodeData::Directory && !self.has_data_below(h) {
                problems.push(format!("directory {} has no data below it", node.id));
            }
        }

        for (i, slot) in self.nodes.iter().enumerate() {
            if let Some(node) = slot {
                if !seen[i] {
                    problems.push(format!("node {} unreachable from root", node.id));
                }
            }
        }
        if self.by_id.len() != self.nodes.iter().flatten().count() {
            problems.push("id index size differs from live node count".to_string());
        }
        problems
    }

    fn has_data_below(&self, handle: NodeHandle) -> bool {
        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            let node = self.node(h);
            if matches!(node.data, NodeData::Data { .. }) {
                return true;
            }
            stack.extend(node.children.iter().copied());
        }
        false
    }

    // ===== Arena plumbing =====

    fn alloc(
        &mut self,
        id: NodeId,
        name: String,
        data: NodeData,
        parent: Option<NodeHandle>,
    ) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        self.nodes.push(Some(TreeNode {
            id,
            name,
            data,
            parent,
            children: Vec::new(),
        }));
        self.by_id.insert(id, handle);
        handle
    }

    /// Creates a node under `parent`, placed before the first sibling whose
    /// key is greater than its own.
    fn insert_child(
        &mut self,
        parent: NodeHandle,
        name: String,
        data: NodeData,
        order: SiblingOrder,
    ) -> NodeHandle {
        let key_row = data.row();
        let position = self
            .node(parent)
            .children
            .iter()
            .position(|sibling| {
                let s = self.node(*sibling);
                order.compare((s.name.as_str(), s.data.row()), (name.as_str(), key_row))
                    == Ordering::Greater
            });

        let id = NodeId(self.next_id);
        self.next_id += 1;
        let handle = self.alloc(id, name, data, Some(parent));

        let children = &mut self.node_mut(parent).children;
        match position {
            Some(i) => children.insert(i, handle),
            None => children.push(handle),
        }
        handle
    }

    fn find_child(&self, parent: NodeHandle, name: &str, kind: NodeKind) -> Option<NodeHandle> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|h| {
                let n = self.node(*h);
                n.name == name && n.data.kind() == kind
            })
    }

    fn handle_of(&self, id: NodeId) -> Option<NodeHandle> {
        self.root?;
        self.by_id.get(&id).copied()
    }

    fn view_roots(&self) -> Vec<NodeHandle> {
        [NodeId::SUBJECT, NodeId::FILE, NodeId::TAG]
            .iter()
            .filter_map(|id| self.handle_of(*id))
            .collect()
    }

    fn view(&self, handle: NodeHandle) -> NodeView {
        let node = self.node(handle);
        let (record, tooltip, severity) = match &node.data {
            NodeData::Data {
                record,
                tooltip,
                severity,
                ..
            } => (Some(*record), tooltip.clone(), *severity),
            _ => (None, String::new(), Severity::None),
        };
        NodeView {
            id: node.id,
            name: node.name.clone(),
            kind: node.data.kind(),
            record,
            tooltip,
            severity,
            row: node.data.row(),
            child_count: node.children.len(),
        }
    }

    // Handles stored in child lists and `by_id` always point at live slots;
    // `absorb_child` unlinks a node everywhere before its slot is emptied.
    fn node(&self, handle: NodeHandle) -> &TreeNode {
        self.nodes[handle.0]
            .as_ref()
            .unwrap_or_else(|| unreachable!("dangling node handle {}", handle.0))
    }

    fn node_mut(&mut self, handle: NodeHandle) -> &mut TreeNode {
        self.nodes[handle.0]
            .as_mut()
            .unwrap_or_else(|| unreachable!("dangling node handle {}", handle.0))
    }
}

fn data_node(summary: DataSummary) -> (String, NodeData) {
    (
        summary.label,
        NodeData::Data {
            record: summary.record,
            row: summary.row,
            tooltip: summary.tooltip,
            severity: summary.severity,
        },
    )
}

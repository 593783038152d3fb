//! Explorer handle: the record store and classification tree of one session.

use crate::config::{Config, LoaderConfig};
use crate::error::{ErrListError, Result};
use crate::loader::{self, CancelToken, LoadReport, ProgressCallback};
use crate::record::{NewRecord, Record, RecordStore};
use crate::tree::ClassificationTree;
use crate::types::{NodeId, NodeKind, NodeView};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// State of the explorer after its most recent load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing loaded yet.
    Empty,
    /// The last load completed and the File view is compacted.
    Ready,
    /// The last load was cancelled; the tree is partial and must be reloaded.
    Incomplete,
}

/// Where to take the user for a selected record.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// File to open.
    pub filename: String,
    /// 0-based line.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
    /// Comment to show alongside.
    pub comment: String,
}

impl NavigationTarget {
    fn for_record(record: &Record) -> Self {
        Self {
            filename: record.filename.clone(),
            line: record.row.saturating_sub(1),
            column: record.column.saturating_sub(1),
            comment: record.comment.clone(),
        }
    }
}

/// Owns the records and the classification tree built over them.
///
/// Construct one per session and hand it to whatever needs to query it. Each
/// load replaces both the store and the tree.
///
/// # Examples
///
/// ```
/// use errlist_core::{CancelToken, Explorer, NodeKind};
///
/// let text = r#"{"ImportErrorList": {"version": 1}, "data": [
///     {"filename": "/a/b/x.ts", "subject": "S1", "row": 1},
///     {"filename": "/a/c/y.ts", "subject": "S1", "row": 2}
/// ]}"#;
///
/// let mut explorer = Explorer::default();
/// explorer.load_str(text, "inline", None, &CancelToken::new()).unwrap();
///
/// let views = explorer.tree().children(NodeKind::Root, None).unwrap();
/// let subjects = explorer.tree().children(NodeKind::SubjectGroupRoot, Some(views[0].id)).unwrap();
/// assert_eq!(subjects[0].name, "S1");
/// assert_eq!(subjects[0].child_count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Explorer {
    store: RecordStore,
    tree: ClassificationTree,
    status: LoadStatus,
    loader: LoaderConfig,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Explorer {
    /// Creates an empty explorer.
    pub fn new(config: &Config) -> Self {
        Self {
            store: RecordStore::new(),
            tree: ClassificationTree::new(),
            status: LoadStatus::Empty,
            loader: config.loader.clone(),
        }
    }

    /// The record store.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// The classification tree.
    pub fn tree(&self) -> &ClassificationTree {
        &self.tree
    }

    /// Status of the last load.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Loads a document from disk, replacing everything.
    ///
    /// A file that cannot be read or parsed leaves the current state as it was.
    pub fn load_file(
        &mut self,
        path: &Path,
        progress: Option<&ProgressCallback<'_>>,
        cancel: &CancelToken,
    ) -> Result<LoadReport> {
        let records = loader::read_document(path)?;
        debug!(path = %path.display(), records = records.len(), "parsed document");
        self.load_records(records, progress, cancel)
    }

    /// Loads a document held in memory, replacing everything.
    pub fn load_str(
        &mut self,
        text: &str,
        source_name: &str,
        progress: Option<&ProgressCallback<'_>>,
        cancel: &CancelToken,
    ) -> Result<LoadReport> {
        let records = loader::parse_document(text, source_name)?;
        self.load_records(records, progress, cancel)
    }

    /// Replaces the store and the tree with `records`.
    pub fn load_records(
        &mut self,
        records: Vec<NewRecord>,
        progress: Option<&ProgressCallback<'_>>,
        cancel: &CancelToken,
    ) -> Result<LoadReport> {
        self.store.clear();
        self.tree.init();
        self.status = LoadStatus::Incomplete;

        let report = loader::populate(
            &mut self.store,
            &mut self.tree,
            records,
            self.loader.batch_size,
            progress,
            cancel,
        )?;
        self.status = LoadStatus::Ready;
        Ok(report)
    }

    /// Drops every record not matching `query`; returns how many were removed.
    ///
    /// The tree keeps showing the old records until [`rebuild`](Self::rebuild).
    pub fn filter(&mut self, query: &str) -> usize {
        let removed = self.store.retain_matching(query);
        info!(query = query, removed = removed, kept = self.store.len(), "filtered records");
        removed
    }

    /// Rebuilds the tree from the records currently in the store.
    ///
    /// Fails with [`ErrListError::LoadIncomplete`] after a cancelled load:
    /// the store then holds only part of the document and must be reloaded.
    pub fn rebuild(&mut self) -> Result<LoadReport> {
        self.ensure_ready()?;
        let start = Instant::now();
        self.tree.init();

        let mut report = LoadReport::default();
        for record in self.store.iter() {
            if !loader::index_record(&mut self.tree, record) {
                report.skipped_paths += 1;
            }
            report.records += 1;
        }
        report.merged_directories = self.tree.prune_file();
        report.elapsed = start.elapsed();
        self.status = LoadStatus::Ready;
        Ok(report)
    }

    /// Immediate children of a node; see [`ClassificationTree::children`].
    pub fn children(&self, kind: NodeKind, id: Option<NodeId>) -> Option<Vec<NodeView>> {
        self.tree.children(kind, id)
    }

    /// The record behind a data node.
    pub fn resolve(&self, node: NodeId) -> Result<&Record> {
        self.ensure_ready()?;
        let view = self
            .tree
            .get_tree_node(node)
            .ok_or(ErrListError::NodeNotFound(node.0))?;
        let record_id = view.record.ok_or(ErrListError::NotADataNode(node.0))?;
        self.store
            .get(record_id)
            .ok_or(ErrListError::RecordNotFound(record_id.0))
    }

    /// Every record under a node, in display order. Records that were
    /// filtered out of the store since the last rebuild are skipped.
    pub fn records_under(&self, node: NodeId) -> Result<Vec<&Record>> {
        self.ensure_ready()?;
        let ids = self
            .tree
            .descendant_records(node)
            .ok_or(ErrListError::NodeNotFound(node.0))?;
        Ok(ids.into_iter().filter_map(|id| self.store.get(id)).collect())
    }

    /// Where to navigate for a selected data node.
    pub fn navigation_target(&self, node: NodeId) -> Result<NavigationTarget> {
        self.resolve(node).map(NavigationTarget::for_record)
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.status {
            LoadStatus::Incomplete => Err(ErrListError::LoadIncomplete),
            LoadStatus::Empty | LoadStatus::Ready => Ok(()),
        }
    }
}

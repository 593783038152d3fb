//! Bulk loading of ImportErrorList documents.
//!
//! A load parses the whole document first, so a malformed file never touches
//! the tree. Insertion then runs in batches; between batches the loader reports
//! progress and checks a [`CancelToken`]. A cancelled load leaves a partially
//! populated, uncompacted tree that must be reloaded.

use crate::error::{ErrListError, Result};
use crate::explorer::Explorer;
use crate::record::{NewRecord, Record, RecordStore};
use crate::tree::ClassificationTree;
use crate::types::{DataSummary, Severity};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Document format version this build reads.
pub const SUPPORTED_VERSION: i64 = 1;

/// Progress callback for loads.
/// Called with (processed, total) after every batch. The callback may borrow
/// from the caller for `'a`.
pub type ProgressCallback<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;

/// Cooperative cancellation flag shared between a load and its controller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Takes effect at the next batch boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "ImportErrorList")]
    header: Option<Header>,
    #[serde(default)]
    data: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct Header {
    version: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawRecord {
    filename: Option<String>,
    subject: Option<String>,
    description: Option<String>,
    row: Option<i64>,
    column: Option<i64>,
    level: Option<i64>,
    comment: Option<String>,
    tooltip: Option<String>,
    tags: Option<Vec<String>>,
}

impl RawRecord {
    fn into_new_record(self) -> NewRecord {
        NewRecord {
            filename: self.filename.unwrap_or_default(),
            subject: self.subject.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            row: clamp_position(self.row),
            column: clamp_position(self.column),
            severity: self.level.map_or(Severity::Error, Severity::from_level),
            comment: self.comment.unwrap_or_default(),
            tooltip: self.tooltip.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
        }
    }
}

fn clamp_position(value: Option<i64>) -> u32 {
    value.unwrap_or(0).clamp(0, u32::MAX as i64) as u32
}

/// Parses an ImportErrorList document.
///
/// `source_name` only labels error messages.
///
/// # Examples
///
/// ```
/// use errlist_core::parse_document;
///
/// let text = r#"{"ImportErrorList": {"version": 1},
///                "data": [{"filename": "/a/b/x.ts", "subject": "S1", "row": 5}]}"#;
/// let records = parse_document(text, "inline").unwrap();
/// assert_eq!(records[0].row, 5);
/// ```
pub fn parse_document(text: &str, source_name: &str) -> Result<Vec<NewRecord>> {
    let doc: Document = serde_json::from_str(text).map_err(|e| ErrListError::Parse {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;

    let header = doc.header.ok_or_else(|| ErrListError::Parse {
        source_name: source_name.to_string(),
        reason: "missing ImportErrorList header".to_string(),
    })?;
    let version = header.version.ok_or_else(|| ErrListError::Parse {
        source_name: source_name.to_string(),
        reason: "missing ImportErrorList.version".to_string(),
    })?;
    if version != SUPPORTED_VERSION {
        return Err(ErrListError::UnsupportedVersion {
            found: version,
            expected: SUPPORTED_VERSION,
        });
    }

    Ok(doc.data.into_iter().map(RawRecord::into_new_record).collect())
}

/// Reads and parses an ImportErrorList document from disk.
pub fn read_document(path: &Path) -> Result<Vec<NewRecord>> {
    let text = fs::read_to_string(path)?;
    parse_document(&text, &path.display().to_string())
}

/// Summary of a finished load or rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records inserted into the store and the tree.
    pub records: usize,
    /// Records whose path had no segment and are missing from the File view.
    pub skipped_paths: usize,
    /// Directories merged away by compaction.
    pub merged_directories: usize,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Label of a record in the Subject view.
pub fn subject_label(record: &Record) -> String {
    format!("{}:{}", record.filename, record.row)
}

/// Label of a record in the File view.
pub fn file_label(record: &Record) -> String {
    if record.subject.is_empty() {
        record.description.clone()
    } else {
        record.subject.clone()
    }
}

/// Label of a record in the Tag view.
pub fn tag_label(record: &Record) -> String {
    format!("{} ({}:{})", record.subject, record.filename, record.row)
}

fn summary(record: &Record, label: String) -> DataSummary {
    let tooltip = if record.tooltip.is_empty() {
        record.description.clone()
    } else {
        record.tooltip.clone()
    };
    DataSummary {
        label,
        row: record.row,
        record: record.id,
        tooltip,
        severity: record.severity,
    }
}

/// Inserts one record into all three views. Returns `false` when the File
/// view skipped it.
pub fn index_record(tree: &mut ClassificationTree, record: &Record) -> bool {
    tree.add_subject(&record.subject, summary(record, subject_label(record)));
    for tag in &record.tags {
        tree.add_tag(tag, summary(record, tag_label(record)));
    }
    tree.add_file(&record.filename, summary(record, file_label(record)))
}

/// Fills a freshly initialized store and tree from `records`, then compacts
/// the File view.
///
/// Returns [`ErrListError::Cancelled`] if `cancel` fires; the store and tree
/// then hold only the batches processed so far.
pub(crate) fn populate(
    store: &mut RecordStore,
    tree: &mut ClassificationTree,
    records: Vec<NewRecord>,
    batch_size: usize,
    progress: Option<&ProgressCallback<'_>>,
    cancel: &CancelToken,
) -> Result<LoadReport> {
    let start = Instant::now();
    let total = records.len();
    let batch_size = batch_size.max(1);
    let mut report = LoadReport::default();

    let mut pending = records.into_iter().peekable();
    while pending.peek().is_some() {
        if cancel.is_cancelled() {
            warn!(processed = report.records, total = total, "load cancelled");
            return Err(ErrListError::Cancelled {
                processed: report.records,
                total,
            });
        }

        for new in pending.by_ref().take(batch_size) {
            let id = store.insert(new);
            let Some(record) = store.get(id) else {
                continue;
            };
            if !index_record(tree, record) {
                report.skipped_paths += 1;
            }
            report.records += 1;
        }

        if let Some(cb) = progress {
            cb(report.records, total);
        }
    }

    report.merged_directories = tree.prune_file();
    report.elapsed = start.elapsed();
    info!(
        records = report.records,
        skipped_paths = report.skipped_paths,
        merged = report.merged_directories,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "load complete"
    );
    Ok(report)
}

/// Result of a background load: the explorer comes back either way.
#[derive(Debug)]
pub struct LoadOutcome {
    /// The explorer the load ran against.
    pub explorer: Explorer,
    /// What the load reported.
    pub result: Result<LoadReport>,
}

/// Handle to a load running on a background thread.
#[derive(Debug)]
pub struct LoadHandle {
    cancel: CancelToken,
    processed: Arc<AtomicUsize>,
    total: usize,
    thread: JoinHandle<LoadOutcome>,
}

impl LoadHandle {
    /// Requests cancellation at the next batch boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Records processed so far and the total.
    pub fn progress(&self) -> (usize, usize) {
        (self.processed.load(Ordering::SeqCst), self.total)
    }

    /// Whether the load thread has finished.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the load to finish.
    pub fn join(self) -> Result<LoadOutcome> {
        self.thread
            .join()
            .map_err(|_| ErrListError::LoadThreadPanicked)
    }
}

/// Runs a full load of `records` into `explorer` on a background thread.
///
/// The explorer moves to the load thread and is handed back by
/// [`LoadHandle::join`], so the tree is only ever touched by one thread.
pub fn spawn_load(mut explorer: Explorer, records: Vec<NewRecord>) -> LoadHandle {
    let cancel = CancelToken::new();
    let processed = Arc::new(AtomicUsize::new(0));
    let total = records.len();

    let thread_cancel = cancel.clone();
    let thread_processed = Arc::clone(&processed);
    let thread = std::thread::spawn(move || {
        debug!(total = total, "background load started");
        let progress = move |done: usize, _total: usize| {
            thread_processed.store(done, Ordering::SeqCst);
        };
        let result = explorer.load_records(records, Some(&progress), &thread_cancel);
        LoadOutcome { explorer, result }
    });

    LoadHandle {
        cancel,
        processed,
        total,
        thread,
    }
}

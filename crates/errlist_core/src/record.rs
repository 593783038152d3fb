//! Immutable diagnostic records and the store that owns them.

use crate::types::{RecordId, Severity};
use serde::Serialize;

/// First id handed out by a fresh [`RecordStore`].
pub const FIRST_RECORD_ID: u32 = 1000;

/// One diagnostic entry.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Store-assigned id.
    pub id: RecordId,
    /// Path of the file the diagnostic points at.
    pub filename: String,
    /// Grouping subject (rule name, check id, ...).
    pub subject: String,
    /// Free-form description.
    pub description: String,
    /// 1-based row.
    pub row: u32,
    /// 1-based column.
    pub column: u32,
    /// Severity.
    pub severity: Severity,
    /// Long comment shown when the record is opened.
    pub comment: String,
    /// Hover text.
    pub tooltip: String,
    /// Tags, in document order.
    pub tags: Vec<String>,
}

impl Record {
    /// Whether `query` occurs in the filename, subject, description, or any tag.
    ///
    /// An empty query matches every record.
    pub fn matches(&self, query: &str) -> bool {
        self.filename.contains(query)
            || self.subject.contains(query)
            || self.description.contains(query)
            || self.tags.iter().any(|tag| tag.contains(query))
    }
}

/// Fields of a record before the store assigns its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    /// Path of the file the diagnostic points at, `/` or `\` separated.
    pub filename: String,
    /// Subject group the record is listed under.
    pub subject: String,
    /// Free-form description, searched by [`RecordStore::retain_matching`].
    pub description: String,
    /// 1-based row; 0 when the document gives none.
    pub row: u32,
    /// 1-based column; 0 when the document gives none.
    pub column: u32,
    /// Severity. Documents without a level load as [`Severity::Error`].
    pub severity: Severity,
    /// Long comment shown when the record is opened.
    pub comment: String,
    /// Hover text.
    pub tooltip: String,
    /// Tag groups the record is listed under, in document order.
    pub tags: Vec<String>,
}

/// Ordered list of records with monotonic id assignment.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    next_id: u32,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: FIRST_RECORD_ID,
        }
    }

    /// Appends a record and returns its id.
    pub fn insert(&mut self, new: NewRecord) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        self.records.push(Record {
            id,
            filename: new.filename,
            subject: new.subject,
            description: new.description,
            row: new.row,
            column: new.column,
            severity: new.severity,
            comment: new.comment,
            tooltip: new.tooltip,
            tags: new.tags,
        });
        id
    }

    /// Looks up a record by id.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        // Ids are assigned in insertion order and removal keeps that order.
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record and restarts id assignment.
    pub fn clear(&mut self) {
        self.records.clear();
        self.next_id = FIRST_RECORD_ID;
    }

    /// Keeps only records matching `query`; returns how many were removed.
    pub fn retain_matching(&mut self, query: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.matches(query));
        before - self.records.len()
    }
}

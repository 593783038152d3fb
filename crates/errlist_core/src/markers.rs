//! Bookmarks on diagnostic locations, keyed by `(filename, row)`.

use crate::record::Record;
use crate::types::Severity;
use serde::Serialize;
use std::collections::BTreeMap;

/// One marked location.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// File the marker belongs to.
    pub filename: String,
    /// Row of the marker.
    pub row: u32,
    /// Severity, picks the marker colour.
    pub severity: Severity,
}

/// Deduplicated set of markers, grouped per file.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    files: BTreeMap<String, BTreeMap<u32, Severity>>,
}

impl MarkerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a location. Returns `false` if it was already marked; the first
    /// severity wins.
    pub fn mark(&mut self, filename: &str, row: u32, severity: Severity) -> bool {
        let rows = self.files.entry(filename.to_string()).or_default();
        if rows.contains_key(&row) {
            return false;
        }
        rows.insert(row, severity);
        true
    }

    /// Marks the location of every record; returns how many were new.
    pub fn mark_records<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) -> usize {
        records
            .into_iter()
            .filter(|r| self.mark(&r.filename, r.row, r.severity))
            .count()
    }

    /// Removes a marker. Returns whether it existed.
    pub fn unmark(&mut self, filename: &str, row: u32) -> bool {
        let Some(rows) = self.files.get_mut(filename) else {
            return false;
        };
        let removed = rows.remove(&row).is_some();
        if rows.is_empty() {
            self.files.remove(filename);
        }
        removed
    }

    /// Whether a location is marked.
    pub fn is_marked(&self, filename: &str, row: u32) -> bool {
        self.files
            .get(filename)
            .is_some_and(|rows| rows.contains_key(&row))
    }

    /// Removes every marker.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.files.values().map(|rows| rows.len()).sum()
    }

    /// Whether no location is marked.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Markers to draw in the editor showing `path`, ordered by row.
    ///
    /// A marker filed under a different spelling of the same Windows path
    /// (drive letter in another case) is included.
    pub fn rows_for(&self, path: &str) -> Vec<(u32, Severity)> {
        let mut rows: Vec<(u32, Severity)> = self
            .files
            .iter()
            .filter(|(filename, _)| same_file(filename, path))
            .flat_map(|(_, rows)| rows.iter().map(|(row, sev)| (*row, *sev)))
            .collect();
        rows.sort_by_key(|(row, _)| *row);
        rows.dedup_by_key(|(row, _)| *row);
        rows
    }

    /// All markers, ordered by file then row.
    pub fn iter(&self) -> impl Iterator<Item = Marker> + '_ {
        self.files.iter().flat_map(|(filename, rows)| {
            rows.iter().map(move |(row, severity)| Marker {
                filename: filename.clone(),
                row: *row,
                severity: *severity,
            })
        })
    }
}

fn drive_prefix(path: &str) -> Option<char> {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => Some(letter),
        _ => None,
    }
}

/// Whether two paths name the same file, ignoring the case of a drive letter.
fn same_file(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (drive_prefix(a), drive_prefix(b)) {
        (Some(da), Some(db)) => da.eq_ignore_ascii_case(&db) && a[1..] == b[1..],
        _ => false,
    }
}

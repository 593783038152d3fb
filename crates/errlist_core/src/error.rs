//! Error types for errlist_core operations.

use thiserror::Error;

/// Core error type for errlist_core operations.
///
/// The classification tree itself never returns these; its lookups answer
/// with `Option`. Errors come from the collaborators around it (loading,
/// configuration, resolving a node for navigation).
#[derive(Error, Debug)]
pub enum ErrListError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input document is not valid JSON or does not have the expected shape.
    #[error("failed to parse {}: {}", source_name, reason)]
    Parse {
        /// File name or other label of the input
        source_name: String,
        /// Parser message
        reason: String,
    },

    /// The document header names a format version this build cannot read.
    #[error("unsupported ImportErrorList version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the document
        found: i64,
        /// Version this build reads
        expected: i64,
    },

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The load was cancelled at a batch boundary.
    #[error("load cancelled after {processed} of {total} records")]
    Cancelled {
        /// Records inserted before cancellation took effect
        processed: usize,
        /// Records in the document
        total: usize,
    },

    /// No node with this id exists in the current tree generation.
    #[error("tree node not found: {0}")]
    NodeNotFound(u32),

    /// The node exists but does not reference a record.
    #[error("tree node {0} is not a data node")]
    NotADataNode(u32),

    /// A data node references a record that is no longer in the store.
    #[error("record not found: {0}")]
    RecordNotFound(u32),

    /// The last load was cancelled and the tree is only partially populated.
    #[error("the last load did not complete")]
    LoadIncomplete,

    /// The background load thread panicked.
    #[error("background load thread panicked")]
    LoadThreadPanicked,
}

impl ErrListError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Parse { .. } => {
                Some("Check that the file is an ImportErrorList JSON document with a 'data' array.")
            }
            Self::UnsupportedVersion { .. } => {
                Some("Regenerate the document with ImportErrorList version 1.")
            }
            Self::Cancelled { .. } | Self::LoadIncomplete => {
                Some("Run the load again; a cancelled load leaves no usable tree.")
            }
            Self::RecordNotFound(_) => {
                Some("The record was filtered out. Rebuild the tree after filtering.")
            }
            Self::NodeNotFound(_) => {
                Some("Node ids change on every load. List children again with 'errlist children'.")
            }
            Self::NotADataNode(_) => Some("Only leaf nodes refer to a diagnostic."),
            _ => None,
        }
    }
}

/// Convenience Result type for errlist_core operations.
pub type Result<T> = std::result::Result<T, ErrListError>;

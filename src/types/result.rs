//! Import outcome types
//!
//! A file import yields a `FileImportResult`: the ids of the rows booked before
//! the first failure and the errors that stopped the file. The orchestrator
//! tracks each file through `FileState` and reports it as a `FileReport`.

use crate::types::error::ReconcileError;
use std::fmt;

/// Success id reported when a file failed before any row could be accounted for
pub const DATA_LOST_MARKER: &str = "data lost";

/// A single import failure attributed to a row
///
/// `message` already carries the `<row id>: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub row_id: String,
    pub message: String,
}

impl ImportError {
    /// Attribute an error to the given row id
    pub fn for_row(row_id: &str, error: &ReconcileError) -> Self {
        ImportError {
            row_id: row_id.to_string(),
            message: format!("{}: {}", row_id, error),
        }
    }

    /// An error that belongs to the file rather than a row
    pub fn for_file(error: &ReconcileError) -> Self {
        ImportError {
            row_id: String::new(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of importing one file
///
/// When `errors` is non-empty, `succeeded_row_ids` lists exactly the rows
/// processed before the failing row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileImportResult {
    pub succeeded_row_ids: Vec<String>,
    pub errors: Vec<ImportError>,
}

impl FileImportResult {
    /// Synthetic result for a file that failed outside the row loop
    pub fn data_lost(error: &ReconcileError) -> Self {
        FileImportResult {
            succeeded_row_ids: vec![DATA_LOST_MARKER.to_string()],
            errors: vec![ImportError::for_file(error)],
        }
    }

    /// Whether every row was imported
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Aggregate text used in error reports and failure notifications
    ///
    /// `Imported: <ids joined by ", "> Errors: <messages joined by "; ">`
    pub fn summary(&self) -> String {
        let errors: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        format!(
            "Imported: {} Errors: {}",
            self.succeeded_row_ids.join(", "),
            errors.join("; ")
        )
    }
}

/// Lifecycle of one file within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Selected on the remote store, not yet fetched
    Pending,
    /// Fetched locally and remote marker cleared
    Downloaded,
    /// Rows being applied
    RowProcessing,
    /// Every row applied
    Succeeded,
    /// Stopped at the first failing row
    Failed,
    /// Outcome handled (report uploaded or local file removed)
    Reported,
}

/// Final record of one file of a run
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Remote entry name
    pub name: String,
    /// Last state the file reached
    pub state: FileState,
    /// Import outcome, absent for files the run never processed
    pub result: Option<FileImportResult>,
}

impl FileReport {
    /// Whether the file ended in failure
    pub fn failed(&self) -> bool {
        self.result.as_ref().is_some_and(|r| !r.is_success())
    }
}

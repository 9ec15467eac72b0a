//! Per-file error accumulation
//!
//! The accumulator is created for one file and threaded through its row loop.
//! Once it holds an error the file is failed and the loop stops; it is then
//! turned into the file's `FileImportResult`.

use crate::types::{FileImportResult, ImportError};

/// Collects succeeded row ids and errors for one file
#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    succeeded: Vec<String>,
    errors: Vec<ImportError>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a row that was applied without error
    ///
    /// Ignored once the file has failed, so successes never follow an error.
    pub fn record_success(&mut self, row_id: &str) {
        if self.errors.is_empty() {
            self.succeeded.push(row_id.to_string());
        }
    }

    /// Append an error; the file is failed from now on
    pub fn record_error(&mut self, error: ImportError) {
        self.errors.push(error);
    }

    /// Whether any error has been recorded
    pub fn has_failed(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_result(self) -> FileImportResult {
        FileImportResult {
            succeeded_row_ids: self.succeeded,
            errors: self.errors,
        }
    }
}

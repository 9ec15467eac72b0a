//! Row pipeline module
//!
//! The orchestrator hands each downloaded file to a `RowPipeline`, which runs
//! its rows through validation, classification and application and returns the
//! file's `FileImportResult`. Keeping the pipeline behind a trait lets the
//! orchestrator be driven by a different ledger, or by a stub in tests.

use crate::types::{FileImportResult, ReconcileError};
use std::path::Path;

pub mod ledger_pipeline;

pub use ledger_pipeline::LedgerRowPipeline;

/// Per-file row processing
pub trait RowPipeline {
    /// Import every row of a local file
    ///
    /// Rows are processed in file order and the file stops at the first
    /// failing row. Row-level failures are reported inside the returned result.
    ///
    /// # Arguments
    ///
    /// * `path` - Local import file
    /// * `validation_only` - When true, run every check but persist nothing and
    ///   write no settlement batch
    ///
    /// # Returns
    ///
    /// * `Ok(FileImportResult)` - the succeeded row ids and row errors
    /// * `Err(ReconcileError)` - a file-level failure (unreadable file,
    ///   malformed header or record, settlement batch not writable)
    fn import_file(
        &mut self,
        path: &Path,
        validation_only: bool,
    ) -> Result<FileImportResult, ReconcileError>;
}

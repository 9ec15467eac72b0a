//! Ledger-backed row pipeline
//!
//! `LedgerRowPipeline` owns the ledger collaborator and the settlement sender
//! rules for the lifetime of a run. Each call to `import_file` creates a fresh
//! `ErrorAccumulator` and `SettlementBatchBuilder`, so nothing leaks from one
//! file into the next.
//!
//! # Row loop
//!
//! For each parsed row, in file order:
//! 1. rows without an `ACTIVITY_ID` are skipped
//! 2. the row is validated, and any error is recorded
//! 3. the row is classified; an unclassified row records an error
//! 4. if the file has failed, the loop stops (a row that failed validation is
//!    never applied)
//! 5. the row is applied; an error is recorded and stops the loop, otherwise
//!    the row id is recorded as succeeded
//!
//! A file without errors flushes its settlement batch unless the import is
//! validation-only.

use crate::core::{
    classify, validate, ErrorAccumulator, Ledger, SenderValidator, SettlementBatchBuilder,
    TransactionApplier,
};
use crate::io::parse_rows;
use crate::pipeline::RowPipeline;
use crate::types::{
    FileImportResult, ImportError, ReconcileError, SettlementHeader, TransactionKind,
};
use std::path::{Path, PathBuf};

/// Row pipeline applying rows through a `Ledger`
pub struct LedgerRowPipeline<L: Ledger, V: SenderValidator> {
    ledger: L,
    sender_rules: V,
    header: SettlementHeader,
    settlement_dir: PathBuf,
}

impl<L: Ledger, V: SenderValidator> LedgerRowPipeline<L, V> {
    /// Create a pipeline
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger collaborator the transfers are booked against
    /// * `sender_rules` - Settlement sender check for debit collections
    /// * `header` - Originator record written at the top of settlement batches
    /// * `settlement_dir` - Directory settlement batches are written to
    pub fn new(
        ledger: L,
        sender_rules: V,
        header: SettlementHeader,
        settlement_dir: PathBuf,
    ) -> Self {
        LedgerRowPipeline {
            ledger,
            sender_rules,
            header,
            settlement_dir,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Give the ledger back, e.g. to persist it after a run
    pub fn into_ledger(self) -> L {
        self.ledger
    }
}

impl<L: Ledger, V: SenderValidator> RowPipeline for LedgerRowPipeline<L, V> {
    fn import_file(
        &mut self,
        path: &Path,
        validation_only: bool,
    ) -> Result<FileImportResult, ReconcileError> {
        let rows = parse_rows(path)?;
        tracing::debug!(file = %path.display(), rows = rows.len(), validation_only, "file parsed");

        let mut accumulator = ErrorAccumulator::new();
        let mut batch = SettlementBatchBuilder::new(self.header.clone());
        let mut applier =
            TransactionApplier::new(&mut self.ledger, &self.sender_rules, validation_only);

        for row in &rows {
            if row.has_blank_id() {
                tracing::debug!(file = %path.display(), "row without ACTIVITY_ID skipped");
                continue;
            }

            if let Err(error) = validate(row) {
                accumulator.record_error(error);
            }

            let kind = classify(row);
            if kind == TransactionKind::Unclassified {
                accumulator.record_error(ImportError::for_row(
                    &row.activity_id,
                    &ReconcileError::Classification,
                ));
            }

            if accumulator.has_failed() {
                break;
            }

            match applier.apply(kind, row, &mut batch) {
                Ok(()) => accumulator.record_success(&row.activity_id),
                Err(error) => {
                    accumulator.record_error(ImportError::for_row(&row.activity_id, &error));
                    break;
                }
            }
        }

        let result = accumulator.into_result();

        if result.is_success() && !validation_only {
            batch.flush(&self.settlement_dir)?;
        }

        tracing::info!(
            file = %path.display(),
            imported = result.succeeded_row_ids.len(),
            errors = result.errors.len(),
            "file processed"
        );
        Ok(result)
    }
}

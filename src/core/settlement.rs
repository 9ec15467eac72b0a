//! Settlement batch accumulation
//!
//! One builder exists per processed file. Debit-collection rows append to it;
//! at the end of a successful, non-validation-only file it is flushed to a
//! uniquely named batch file. A failed file simply drops its builder.

use crate::io::csv_format::write_settlement_batch;
use crate::types::{ReconcileError, SettlementEntry, SettlementHeader};
use chrono::Local;
use rust_decimal::Decimal;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Record-type suffix of settlement batch file names
pub const BATCH_FILE_SUFFIX: &str = "_201_mraba.csv";

/// Accumulates the settlement entries of one file
#[derive(Debug)]
pub struct SettlementBatchBuilder {
    header: SettlementHeader,
    entries: Vec<SettlementEntry>,
    total: Decimal,
}

impl SettlementBatchBuilder {
    pub fn new(header: SettlementHeader) -> Self {
        SettlementBatchBuilder {
            header,
            entries: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// Append an entry
    ///
    /// # Errors
    ///
    /// `ReconcileError::Application` if the batch total would overflow. The
    /// entry is not appended in that case.
    pub fn append(&mut self, entry: SettlementEntry) -> Result<(), ReconcileError> {
        self.total = self
            .total
            .checked_add(entry.amount)
            .ok_or_else(|| ReconcileError::application("settlement total overflows"))?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SettlementEntry] {
        &self.entries
    }

    /// Sum of all appended amounts
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Write the batch into `output_dir` if it holds any entry
    ///
    /// The file is named `DTAUS<YYYYmmdd_HHMMSS_ffffff>_201_mraba.csv`. An
    /// existing file is never overwritten; the name is regenerated on the next
    /// microsecond instead.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - the written batch file
    /// * `Ok(None)` - the batch was empty and nothing was written
    pub fn flush(self, output_dir: &Path) -> Result<Option<PathBuf>, ReconcileError> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(output_dir)?;

        let (path, file) = loop {
            let name = format!(
                "DTAUS{}{}",
                Local::now().format("%Y%m%d_%H%M%S_%6f"),
                BATCH_FILE_SUFFIX
            );
            let candidate = output_dir.join(name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
            {
                Ok(file) => break (candidate, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    std::thread::sleep(Duration::from_micros(1));
                }
                Err(e) => return Err(e.into()),
            }
        };

        let mut writer = BufWriter::new(file);
        write_settlement_batch(&self.header, &self.entries, &mut writer)?;
        writer.flush()?;

        tracing::info!(
            path = %path.display(),
            entries = self.entries.len(),
            "settlement batch written"
        );

        Ok(Some(path))
    }
}

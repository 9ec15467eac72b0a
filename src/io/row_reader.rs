//! Import file reader with iterator interface
//!
//! Turns a `;`-delimited import file into typed `ImportRow`s, preserving file
//! order. Column handling is delegated to the csv_format module.
//!
//! # Format
//!
//! - The first line is a header naming the columns; it must name `ACTIVITY_ID`
//! - Blank lines are skipped
//! - Rows may be shorter than the header; missing trailing columns are absent
//! - Files that are not valid UTF-8 are read as ISO-8859-1, the legacy
//!   encoding of the producing system
//!
//! ```no_run
//! use csv_reconciler::io::row_reader::RowReader;
//! use std::path::Path;
//!
//! let reader = RowReader::open(Path::new("mraba.csv")).unwrap();
//! for row in reader {
//!     match row {
//!         Ok(row) => println!("row {}", row.activity_id),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Unreadable files and unusable headers are returned from `open()`
//! - Unreadable data records are yielded as `Err` with their line number

use crate::io::csv_format::{assign_column, COL_ACTIVITY_ID, DELIMITER};
use crate::types::{ImportRow, ReconcileError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Cursor;
use std::path::Path;

/// Reader over the rows of one import file
#[derive(Debug)]
pub struct RowReader {
    reader: csv::Reader<Cursor<String>>,
    headers: StringRecord,
    path: String,
}

/// Decode file content, falling back to ISO-8859-1
fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

impl RowReader {
    /// Open an import file and read its header
    ///
    /// # Errors
    ///
    /// * `ReconcileError::Io` if the file cannot be read
    /// * `ReconcileError::MalformedFile` if the header cannot be read or does
    ///   not name the `ACTIVITY_ID` column
    pub fn open(path: &Path) -> Result<Self, ReconcileError> {
        let bytes = std::fs::read(path)?;
        Self::from_text(decode(bytes), &path.display().to_string())
    }

    /// Read rows from in-memory text
    ///
    /// `origin` names the source in error messages.
    pub fn from_text(text: String, origin: &str) -> Result<Self, ReconcileError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .trim(Trim::All)
            .flexible(true)
            .has_headers(true)
            .from_reader(Cursor::new(text));

        let headers = reader
            .headers()
            .map_err(|e| ReconcileError::malformed_file(origin, &e))?
            .clone();

        // An empty file has no rows to import.
        if !headers.is_empty() && !headers.iter().any(|h| h == COL_ACTIVITY_ID) {
            return Err(ReconcileError::MalformedFile {
                path: origin.to_string(),
                line: Some(1),
                message: format!("header does not name the {} column", COL_ACTIVITY_ID),
            });
        }

        Ok(Self {
            reader,
            headers,
            path: origin.to_string(),
        })
    }

    fn convert(&self, record: &StringRecord) -> ImportRow {
        let mut row = ImportRow::default();
        for (column, value) in self.headers.iter().zip(record.iter()) {
            assign_column(&mut row, column, value);
        }
        row
    }
}

impl Iterator for RowReader {
    type Item = Result<ImportRow, ReconcileError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        loop {
            match self.reader.read_record(&mut record) {
                Ok(false) => return None,
                // A line holding only delimiters carries no data.
                Ok(true) if record.iter().all(str::is_empty) => continue,
                Ok(true) => return Some(Ok(self.convert(&record))),
                Err(e) => return Some(Err(ReconcileError::malformed_file(&self.path, &e))),
            }
        }
    }
}

/// Parse a whole import file into rows, in file order
///
/// # Errors
///
/// Fails on the first unreadable header or record.
pub fn parse_rows(path: &Path) -> Result<Vec<ImportRow>, ReconcileError> {
    RowReader::open(path)?.collect()
}

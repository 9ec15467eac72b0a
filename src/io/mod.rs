//! I/O module
//!
//! Handles import file parsing and settlement batch output.
//!
//! # Components
//!
//! - `csv_format` - Column mapping, row conversion, batch serialization
//! - `row_reader` - Import file reader with iterator interface

pub mod csv_format;
pub mod row_reader;

pub use csv_format::{row_from_columns, write_settlement_batch};
pub use row_reader::{parse_rows, RowReader};

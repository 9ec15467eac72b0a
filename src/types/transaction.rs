//! Row-level types for the reconciliation pipeline
//!
//! This module defines the typed import row produced by the parser and the
//! transaction kinds a row can be classified as.

use crate::types::error::ReconcileError;
use crate::types::ledger::TransferId;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Number of positional description columns (`DESC1`..`DESC14`)
pub const DESCRIPTION_COLUMNS: usize = 14;

/// Transaction keys a row may carry
pub const ALLOWED_TRANSACTION_KEYS: [&str; 2] = ["10", "16"];

/// A column value parsed once when the row is built
///
/// Numeric and date columns keep the raw text of a value that failed to
/// parse, so the failure can be reported against the row that carried it
/// instead of rejecting the whole file.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    /// Column absent or blank
    Missing,
    /// Successfully parsed value
    Valid(T),
    /// Raw text that could not be parsed
    Malformed(String),
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Missing
    }
}

impl<T> FieldValue<T> {
    /// Parse an optional raw value with the given parser
    pub fn parse_with<F>(raw: Option<&str>, parse: F) -> Self
    where
        F: FnOnce(&str) -> Option<T>,
    {
        match raw {
            None => FieldValue::Missing,
            Some(text) => match parse(text) {
                Some(value) => FieldValue::Valid(value),
                None => FieldValue::Malformed(text.to_string()),
            },
        }
    }

    /// Borrow the value, or explain why the named column is unusable
    pub fn require(&self, column: &str) -> Result<&T, ReconcileError> {
        match self {
            FieldValue::Valid(value) => Ok(value),
            FieldValue::Missing => Err(ReconcileError::application(format!(
                "{} is missing",
                column
            ))),
            FieldValue::Malformed(raw) => Err(ReconcileError::application(format!(
                "invalid value '{}' for {}",
                raw, column
            ))),
        }
    }

    /// Whether the column was absent or blank
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }
}

/// One data line of an import file
///
/// Text columns are trimmed and blank values are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRow {
    /// Row identifier (`ACTIVITY_ID`), empty when blank
    pub activity_id: String,

    /// Transaction key (`UMSATZ_KEY`)
    pub transaction_key: Option<String>,

    /// Sender bank code (`SENDER_BLZ`)
    pub sender_bank_code: Option<String>,

    /// Sender account number (`SENDER_KONTO`)
    pub sender_account: Option<String>,

    /// Sender display name (`SENDER_NAME`)
    pub sender_name: Option<String>,

    /// Receiver bank code (`RECEIVER_BLZ`)
    pub receiver_bank_code: Option<String>,

    /// Receiver account number (`RECEIVER_KONTO`)
    pub receiver_account: Option<String>,

    /// Receiver display name (`RECEIVER_NAME`)
    pub receiver_name: Option<String>,

    /// Amount (`AMOUNT`)
    pub amount: FieldValue<Decimal>,

    /// Booking date (`ENTRY_DATE`)
    pub entry_date: FieldValue<NaiveDate>,

    /// Reference to an existing account transfer (`DEPOT_ACTIVITY_ID`)
    pub depot_activity_id: FieldValue<TransferId>,

    /// Description columns, index 0 holds `DESC1`
    pub descriptions: [Option<String>; DESCRIPTION_COLUMNS],
}

impl ImportRow {
    /// Whether the row has no identifier and must be skipped
    pub fn has_blank_id(&self) -> bool {
        self.activity_id.is_empty()
    }

    /// Sender account number, or an error naming the missing column
    pub fn require_sender_account(&self) -> Result<&str, ReconcileError> {
        self.sender_account
            .as_deref()
            .ok_or_else(|| ReconcileError::application("SENDER_KONTO is missing"))
    }
}

/// Transaction kinds a row can be classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Internal transfer; both bank codes are `00000000`
    AccountTransfer,

    /// Outgoing transfer to another bank; sender bank code `00000000`, key `10`
    BankTransfer,

    /// Direct debit collected through the settlement batch;
    /// receiver bank code `70022200`, key `16`
    DebitCollection,

    /// Matches none of the shapes above
    Unclassified,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case::missing(None, FieldValue::Missing)]
    #[case::valid(Some("10.50"), FieldValue::Valid(Decimal::new(1050, 2)))]
    #[case::malformed(Some("ten"), FieldValue::Malformed("ten".to_string()))]
    fn test_parse_with(#[case] raw: Option<&str>, #[case] expected: FieldValue<Decimal>) {
        let parsed = FieldValue::parse_with(raw, |s| Decimal::from_str(s).ok());
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case::missing(FieldValue::Missing, "AMOUNT is missing")]
    #[case::malformed(
        FieldValue::Malformed("ten".to_string()),
        "invalid value 'ten' for AMOUNT"
    )]
    fn test_require_errors(#[case] value: FieldValue<Decimal>, #[case] expected: &str) {
        let error = value.require("AMOUNT").unwrap_err();
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_require_valid() {
        let value = FieldValue::Valid(Decimal::ONE);
        assert_eq!(value.require("AMOUNT").unwrap(), &Decimal::ONE);
    }

    #[test]
    fn test_blank_id() {
        assert!(ImportRow::default().has_blank_id());
        let row = ImportRow {
            activity_id: "7".to_string(),
            ..Default::default()
        };
        assert!(!row.has_blank_id());
    }
}

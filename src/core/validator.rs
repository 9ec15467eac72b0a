//! Structural row validation, independent of the transaction kind

use crate::types::{ImportError, ImportRow, ReconcileError, ALLOWED_TRANSACTION_KEYS};

/// Check the transaction key against the allowed set
///
/// # Errors
///
/// Returns an `ImportError` of the form
/// `<row id>: UMSATZ_KEY <value> is not allowed` when the key is absent or not
/// one of `10`, `16`.
pub fn validate(row: &ImportRow) -> Result<(), ImportError> {
    let key = row.transaction_key.as_deref();
    match key {
        Some(k) if ALLOWED_TRANSACTION_KEYS.contains(&k) => Ok(()),
        _ => Err(ImportError::for_row(
            &row.activity_id,
            &ReconcileError::invalid_key(key),
        )),
    }
}

//! Row classification
//!
//! Maps a row onto a transaction kind from its bank codes and transaction key.

use crate::types::{ImportRow, TransactionKind};

/// Bank code used for accounts held by the institution itself
pub const INTERNAL_BANK_CODE: &str = "00000000";

/// Bank code that routes a debit through the settlement batch
pub const SETTLEMENT_BANK_CODE: &str = "70022200";

const BANK_TRANSFER_KEY: &str = "10";
const DEBIT_COLLECTION_KEY: &str = "16";

/// Classify a row
///
/// Rules are checked in priority order:
/// 1. both bank codes internal → `AccountTransfer`
/// 2. sender internal and key `10` → `BankTransfer`
/// 3. receiver is the settlement bank and key `16` → `DebitCollection`
/// 4. anything else → `Unclassified`
pub fn classify(row: &ImportRow) -> TransactionKind {
    let sender = row.sender_bank_code.as_deref();
    let receiver = row.receiver_bank_code.as_deref();
    let key = row.transaction_key.as_deref();

    if sender == Some(INTERNAL_BANK_CODE) && receiver == Some(INTERNAL_BANK_CODE) {
        TransactionKind::AccountTransfer
    } else if sender == Some(INTERNAL_BANK_CODE) && key == Some(BANK_TRANSFER_KEY) {
        TransactionKind::BankTransfer
    } else if receiver == Some(SETTLEMENT_BANK_CODE) && key == Some(DEBIT_COLLECTION_KEY) {
        TransactionKind::DebitCollection
    } else {
        TransactionKind::Unclassified
    }
}

//! Settlement batch types
//!
//! Debit-collection rows are not booked directly; they are gathered into a
//! DTAUS-style batch file picked up by the downstream clearing process.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One debit to be collected
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementEntry {
    /// Account to debit
    pub sender_account: String,

    /// Bank code of the account to debit
    pub sender_bank_code: String,

    /// Account holder, transliterated to ASCII
    pub sender_name: String,

    /// Amount to collect, never negative
    pub amount: Decimal,

    /// Booking text
    pub subject: String,
}

/// Originator record written at the top of every batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementHeader {
    /// Record type; `RS` marks a debit (Lastschrift) batch
    pub record_type: String,

    /// Originator account number
    pub account: String,

    /// Originator bank code
    pub bank_code: String,

    /// Originator name
    pub name: String,
}

impl Default for SettlementHeader {
    fn default() -> Self {
        SettlementHeader {
            record_type: "RS".to_string(),
            account: "8888888888".to_string(),
            bank_code: "99999999".to_string(),
            name: "Credit collection".to_string(),
        }
    }
}

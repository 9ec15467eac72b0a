//! Ledger-facing record types
//!
//! These are the values exchanged with the ledger collaborator: the accounts
//! rows are booked against and the transfer records built from rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger-assigned transfer identifier
///
/// Rows reference existing account transfers through `DEPOT_ACTIVITY_ID`.
pub type TransferId = u64;

/// An account known to the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Account number as it appears in `SENDER_KONTO`
    pub account_no: String,

    /// Display name of the account holder
    #[serde(default)]
    pub holder: String,
}

impl LedgerAccount {
    /// Create an account with the given number and holder
    pub fn new(account_no: &str, holder: &str) -> Self {
        LedgerAccount {
            account_no: account_no.to_string(),
            holder: holder.to_string(),
        }
    }
}

/// Lifecycle state of an account transfer
///
/// Imports only ever complete transfers that are still `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferState {
    /// Created but not yet authorized
    Initialized,
    /// Waiting for the import to confirm it
    Pending,
    /// Booked
    Completed,
    /// Withdrawn before booking
    Canceled,
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferState::Initialized => "initialized",
            TransferState::Pending => "pending",
            TransferState::Completed => "completed",
            TransferState::Canceled => "canceled",
        };
        f.write_str(name)
    }
}

/// Internal transfer between two accounts held by the same institution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTransfer {
    /// Ledger id, `None` until persisted
    #[serde(default)]
    pub id: Option<TransferId>,

    /// Account the amount is credited from
    pub sender_account_no: String,

    /// Receiving account number (`RECEIVER_KONTO`)
    #[serde(default)]
    pub receiver_account_no: Option<String>,

    /// Transfer amount
    pub amount: Decimal,

    /// Booking text built from the description columns
    #[serde(default)]
    pub subject: String,

    /// Value date taken from `ENTRY_DATE`
    #[serde(default)]
    pub value_date: Option<NaiveDate>,

    /// Current lifecycle state
    pub state: TransferState,
}

/// Transfer to an account at another bank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankTransfer {
    /// Ledger id, `None` until persisted
    #[serde(default)]
    pub id: Option<TransferId>,

    /// Account the amount is debited from
    pub sender_account_no: String,

    /// Transfer amount
    pub amount: Decimal,

    /// Booking text built from the description columns
    #[serde(default)]
    pub subject: String,

    /// Receiving account holder (`RECEIVER_NAME`)
    #[serde(default)]
    pub receiver_holder: Option<String>,

    /// Receiving account number (`RECEIVER_KONTO`)
    #[serde(default)]
    pub receiver_account_no: Option<String>,

    /// Receiving bank code (`RECEIVER_BLZ`)
    #[serde(default)]
    pub receiver_bank_code: Option<String>,
}

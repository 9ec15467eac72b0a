//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Typed import rows and transaction kinds
//! - `ledger`: Records exchanged with the ledger collaborator
//! - `settlement`: Settlement batch entries and header
//! - `result`: Per-file import outcomes and file states
//! - `error`: Error types for the pipeline

pub mod error;
pub mod ledger;
pub mod result;
pub mod settlement;
pub mod transaction;

pub use error::ReconcileError;
pub use ledger::{AccountTransfer, BankTransfer, LedgerAccount, TransferId, TransferState};
pub use result::{FileImportResult, FileReport, FileState, ImportError, DATA_LOST_MARKER};
pub use settlement::{SettlementEntry, SettlementHeader};
pub use transaction::{
    FieldValue, ImportRow, TransactionKind, ALLOWED_TRANSACTION_KEYS, DESCRIPTION_COLUMNS,
};

//! Error types for the reconciliation pipeline
//!
//! This module defines every failure the pipeline can observe. Display strings
//! are part of the operator-facing contract: row-scoped variants are rendered
//! verbatim (behind a `<row id>: ` prefix) into uploaded error reports and
//! failure notifications, so their wording must stay stable.
//!
//! # Error Categories
//!
//! - **Run-level errors**: transport failures, configuration problems, I/O
//! - **File-level errors**: unreadable header or data records
//! - **Row-level errors**: transaction key, classification, sender lookup,
//!   referenced transfer problems, ledger field validation, anything else
//!   raised while applying a row

use crate::types::ledger::TransferState;
use thiserror::Error;

/// Main error type for the reconciliation pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// Remote listing, download, remove or upload failed
    ///
    /// Fatal to the whole run.
    #[error("Transport error during {operation} of '{path}': {message}")]
    Transport {
        /// The remote operation (list, download, remove, upload)
        operation: String,
        /// Remote path the operation targeted
        path: String,
        /// Description reported by the transport
        message: String,
    },

    /// The data file could not be read as delimited text
    ///
    /// Fatal to the file being imported.
    #[error("Malformed file '{path}'{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MalformedFile {
        /// Local path of the file
        path: String,
        /// Line number where reading failed (if known)
        line: Option<u64>,
        /// Description of the failure
        message: String,
    },

    /// Transaction key outside the allowed set
    #[error("UMSATZ_KEY {value} is not allowed")]
    Validation {
        /// The rejected key (empty when the column is absent)
        value: String,
    },

    /// The row matches none of the known transaction shapes
    #[error("Transaction type not found")]
    Classification,

    /// No ledger account carries the sender account number
    #[error("Account {account_no} not found")]
    SenderNotFound {
        /// Sender account number from the row
        account_no: String,
    },

    /// The sender may not be debited through the settlement batch
    ///
    /// The message text is consumed by downstream operators and is kept
    /// byte-for-byte, typo included.
    #[error("BLZ/Konto not valid, csv fiile not written")]
    SenderInvalidForSettlement,

    /// The referenced account transfer does not exist on the sender
    #[error("AccountTransfer not found")]
    TransferNotFound,

    /// The referenced account transfer is not pending
    #[error("AccountTransfer state expected 'pending' but was '{state}'")]
    TransferState {
        /// The state the transfer was actually in
        state: TransferState,
    },

    /// The ledger rejected one or more fields of a transfer
    #[error("{kind} validation error(s): {}", messages.join("; "))]
    CollaboratorValidation {
        /// Record kind (`AccountTransfer` or `BankTransfer`)
        kind: String,
        /// Field-level messages as reported by the ledger
        messages: Vec<String>,
    },

    /// Any other failure while applying a row
    #[error("{message}")]
    Application {
        /// Description of the failure
        message: String,
    },

    /// The ledger collaborator itself failed
    #[error("Ledger error: {message}")]
    Ledger {
        /// Description reported by the ledger
        message: String,
    },

    /// Local file system failure
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        ReconcileError::Io {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(error: serde_json::Error) -> Self {
        ReconcileError::Config {
            message: error.to_string(),
        }
    }
}

impl ReconcileError {
    /// Create a Transport error
    pub fn transport(operation: &str, path: &str, message: impl ToString) -> Self {
        ReconcileError::Transport {
            operation: operation.to_string(),
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a MalformedFile error from a csv failure
    pub fn malformed_file(path: &str, error: &csv::Error) -> Self {
        ReconcileError::MalformedFile {
            path: path.to_string(),
            line: error.position().map(|pos| pos.line()),
            message: error.to_string(),
        }
    }

    /// Create a Validation error for a rejected transaction key
    pub fn invalid_key(value: Option<&str>) -> Self {
        ReconcileError::Validation {
            value: value.unwrap_or_default().to_string(),
        }
    }

    /// Create a SenderNotFound error
    pub fn sender_not_found(account_no: &str) -> Self {
        ReconcileError::SenderNotFound {
            account_no: account_no.to_string(),
        }
    }

    /// Create a TransferState error
    pub fn transfer_state(state: TransferState) -> Self {
        ReconcileError::TransferState { state }
    }

    /// Create a CollaboratorValidation error
    pub fn collaborator_validation(kind: &str, messages: Vec<String>) -> Self {
        ReconcileError::CollaboratorValidation {
            kind: kind.to_string(),
            messages,
        }
    }

    /// Create an Application error
    pub fn application(message: impl ToString) -> Self {
        ReconcileError::Application {
            message: message.to_string(),
        }
    }

    /// Create a Ledger error
    pub fn ledger(message: impl ToString) -> Self {
        ReconcileError::Ledger {
            message: message.to_string(),
        }
    }

    /// Create a Config error
    pub fn config(message: impl ToString) -> Self {
        ReconcileError::Config {
            message: message.to_string(),
        }
    }
}

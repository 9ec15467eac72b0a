//! CSV Reconciler Library
//! # Overview
//!
//! This library implements a batch reconciliation run: marker-guarded
//! transaction files are fetched from a remote file store, their `;`-delimited
//! rows are validated, classified and applied through a ledger collaborator,
//! and every file ends in either a success notification or an uploaded error
//! report. Debit collections are gathered into a settlement batch file.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (rows, ledger records, results, errors)
//! - [`io`] - Row parsing and settlement batch formatting
//! - [`core`] - Business logic components:
//!   - [`core::validator`] - Transaction key validation
//!   - [`core::classifier`] - Transaction kind classification
//!   - [`core::applier`] - Per-kind application against the ledger
//!   - [`core::accumulator`] - Per-file error accumulation
//!   - [`core::settlement`] - Settlement batch building
//! - [`pipeline`] - Per-file row pipeline
//! - [`remote`] - Remote store access and the marker-file protocol
//! - [`orchestrator`] - The transfer-and-import run
//! - [`notify`] - Operator notifications
//! - [`config`] - JSON configuration
//! - [`cli`] - CLI arguments parsing
//!
//! # Transaction Kinds
//!
//! - **AccountTransfer**: both bank codes internal; creates a pending
//!   transfer, or completes a referenced pending one
//! - **BankTransfer**: internal sender, key `10`; books an outgoing transfer
//! - **DebitCollection**: settlement receiver bank, key `16`; adds an entry
//!   to the settlement batch
//!
//! # File Outcome
//!
//! A file stops at its first failing row. The rows imported before it and the
//! errors are reported as
//! `Imported: <ids joined by ", "> Errors: <messages joined by "; ">`.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod notify;
pub mod orchestrator;
pub mod pipeline;
pub mod remote;
pub mod types;

pub use config::ReconcilerConfig;
pub use core::{InMemoryLedger, Ledger, SenderValidator, SettlementSenderRules};
pub use notify::{LogNotifier, Notification, Notifier};
pub use orchestrator::{ImportOrchestrator, RunReport};
pub use pipeline::{LedgerRowPipeline, RowPipeline};
pub use remote::{MirrorTransport, RemoteFileGateway, RemoteTransport};
pub use types::{FileImportResult, ImportError, ImportRow, ReconcileError, TransactionKind};

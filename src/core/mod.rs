//! Core business logic module
//!
//! This module contains the row processing components:
//! - `traits` - Ledger and settlement sender collaborator traits
//! - `validator` - Structural row validation
//! - `classifier` - Transaction kind classification
//! - `applier` - Per-kind application against the ledger and settlement batch
//! - `accumulator` - Per-file error accumulation
//! - `settlement` - Settlement batch building and output
//! - `subject` - Subject and name text helpers
//! - `ledger` - In-memory ledger implementation

pub mod accumulator;
pub mod applier;
pub mod classifier;
pub mod ledger;
pub mod settlement;
pub mod subject;
pub mod traits;
pub mod validator;

pub use accumulator::ErrorAccumulator;
pub use applier::TransactionApplier;
pub use classifier::classify;
pub use ledger::{InMemoryLedger, LedgerSnapshot};
pub use settlement::SettlementBatchBuilder;
pub use subject::{ascii_name, build_subject};
pub use traits::{Ledger, SenderValidator, SettlementSenderRules};
pub use validator::validate;

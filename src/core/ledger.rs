//! In-memory ledger
//!
//! This module provides `InMemoryLedger`, a `Ledger` implementation that keeps
//! accounts and transfers in memory. It backs the command-line tool (seeded
//! from and written back to a JSON snapshot) and the test suites.
//!
//! # Validation
//!
//! Field validation mirrors what the production ledger reports, using the same
//! human-readable messages:
//! - amounts must be positive
//! - account transfers need a receiver and a subject
//! - bank transfers need a holder, an account and an 8-digit bank code

use crate::core::traits::Ledger;
use crate::types::{
    AccountTransfer, BankTransfer, LedgerAccount, ReconcileError, TransferId, TransferState,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Serialized form of an `InMemoryLedger`
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSnapshot {
    pub accounts: Vec<LedgerAccount>,
    pub account_transfers: Vec<AccountTransfer>,
    pub bank_transfers: Vec<BankTransfer>,
}

/// Ledger kept entirely in memory
#[derive(Debug)]
pub struct InMemoryLedger {
    /// Accounts keyed by account number
    accounts: HashMap<String, LedgerAccount>,
    /// Account transfers keyed by id
    account_transfers: BTreeMap<TransferId, AccountTransfer>,
    bank_transfers: Vec<BankTransfer>,
    /// Next free transfer id; `None` once `TransferId::MAX` is taken
    next_id: Option<TransferId>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        InMemoryLedger {
            accounts: HashMap::new(),
            account_transfers: BTreeMap::new(),
            bank_transfers: Vec::new(),
            next_id: Some(1),
        }
    }

    /// Register an account, replacing one with the same number
    pub fn add_account(&mut self, account: LedgerAccount) {
        self.accounts.insert(account.account_no.clone(), account);
    }

    fn allocate_id(&mut self) -> Result<TransferId, ReconcileError> {
        let id = self
            .next_id
            .ok_or_else(|| ReconcileError::ledger("transfer ids exhausted"))?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    /// Keep later allocations above an id that was assigned elsewhere
    fn reserve_id(&mut self, id: TransferId) {
        if self.next_id.is_some_and(|next| id >= next) {
            self.next_id = id.checked_add(1);
        }
    }

    /// Store an account transfer as-is, assigning an id if it has none
    ///
    /// # Errors
    ///
    /// `ReconcileError::Ledger` if an id must be assigned and none is left.
    pub fn insert_account_transfer(
        &mut self,
        mut transfer: AccountTransfer,
    ) -> Result<TransferId, ReconcileError> {
        let id = match transfer.id {
            Some(id) => {
                self.reserve_id(id);
                id
            }
            None => self.allocate_id()?,
        };
        transfer.id = Some(id);
        self.account_transfers.insert(id, transfer);
        Ok(id)
    }

    /// All account transfers, ordered by id
    pub fn account_transfers(&self) -> Vec<&AccountTransfer> {
        self.account_transfers.values().collect()
    }

    /// All bank transfers, in save order
    pub fn bank_transfers(&self) -> &[BankTransfer] {
        &self.bank_transfers
    }

    /// Build a ledger from a snapshot
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, ReconcileError> {
        let mut ledger = InMemoryLedger::new();
        for account in snapshot.accounts {
            ledger.add_account(account);
        }
        for transfer in snapshot.account_transfers {
            ledger.insert_account_transfer(transfer)?;
        }
        for transfer in snapshot.bank_transfers {
            if let Some(id) = transfer.id {
                ledger.reserve_id(id);
            }
            ledger.bank_transfers.push(transfer);
        }
        Ok(ledger)
    }

    /// Capture the current state, accounts sorted by number
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut accounts: Vec<LedgerAccount> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.account_no.cmp(&b.account_no));
        LedgerSnapshot {
            accounts,
            account_transfers: self.account_transfers.values().cloned().collect(),
            bank_transfers: self.bank_transfers.clone(),
        }
    }

    /// Load a ledger from a JSON snapshot file
    pub fn load(path: &Path) -> Result<Self, ReconcileError> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&content)?;
        Self::from_snapshot(snapshot)
    }

    /// Write the ledger to a JSON snapshot file
    pub fn save(&self, path: &Path) -> Result<(), ReconcileError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, format!("{json}\n"))?;
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for InMemoryLedger {
    fn find_account(&self, account_no: &str) -> Result<Option<LedgerAccount>, ReconcileError> {
        Ok(self.accounts.get(account_no).cloned())
    }

    fn find_account_transfer(
        &self,
        sender: &LedgerAccount,
        id: TransferId,
    ) -> Result<Option<AccountTransfer>, ReconcileError> {
        Ok(self
            .account_transfers
            .get(&id)
            .filter(|t| t.sender_account_no == sender.account_no)
            .cloned())
    }

    fn validate_account_transfer(&self, transfer: &AccountTransfer) -> Vec<String> {
        let mut messages = Vec::new();
        if transfer.amount <= Decimal::ZERO {
            messages.push("Amount must be greater than 0".to_string());
        }
        if is_blank(&transfer.receiver_account_no) {
            messages.push("Receiver can't be blank".to_string());
        }
        if transfer.subject.trim().is_empty() {
            messages.push("Subject can't be blank".to_string());
        }
        messages
    }

    fn save_account_transfer(
        &mut self,
        transfer: AccountTransfer,
    ) -> Result<TransferId, ReconcileError> {
        if transfer.id.is_some() {
            return Err(ReconcileError::ledger("account transfer is already saved"));
        }
        self.insert_account_transfer(transfer)
    }

    fn complete_account_transfer(
        &mut self,
        mut transfer: AccountTransfer,
    ) -> Result<(), ReconcileError> {
        let id = transfer
            .id
            .filter(|id| self.account_transfers.contains_key(id))
            .ok_or_else(|| ReconcileError::ledger("account transfer does not exist"))?;
        transfer.state = TransferState::Completed;
        self.account_transfers.insert(id, transfer);
        Ok(())
    }

    fn validate_bank_transfer(&self, transfer: &BankTransfer) -> Vec<String> {
        let mut messages = Vec::new();
        if transfer.amount <= Decimal::ZERO {
            messages.push("Amount must be greater than 0".to_string());
        }
        if is_blank(&transfer.receiver_holder) {
            messages.push("Rec holder can't be blank".to_string());
        }
        if is_blank(&transfer.receiver_account_no) {
            messages.push("Rec account number can't be blank".to_string());
        }
        let bank_code_ok = transfer
            .receiver_bank_code
            .as_deref()
            .is_some_and(|code| code.len() == 8 && code.bytes().all(|b| b.is_ascii_digit()));
        if !bank_code_ok {
            messages.push("Rec bank code is invalid".to_string());
        }
        messages
    }

    fn save_bank_transfer(
        &mut self,
        mut transfer: BankTransfer,
    ) -> Result<TransferId, ReconcileError> {
        let id = self.allocate_id()?;
        transfer.id = Some(id);
        self.bank_transfers.push(transfer);
        Ok(id)
    }
}

//! Transaction application
//!
//! This module provides the TransactionApplier that turns a classified row
//! into its effect: a booking through the ledger collaborator, or an entry in
//! the file's settlement batch.
//!
//! The applier enforces the per-kind rules:
//! - the sender account must exist in the ledger (transfers)
//! - a referenced account transfer must exist and still be pending
//! - ledger field validation runs before anything is persisted
//! - debit collections require a sender accepted by the `SenderValidator`
//!
//! In validation-only mode every check runs but nothing is persisted.

use crate::core::settlement::SettlementBatchBuilder;
use crate::core::subject::{ascii_name, build_subject};
use crate::core::traits::{Ledger, SenderValidator};
use crate::io::csv_format::{COL_AMOUNT, COL_ENTRY_DATE};
use crate::types::{
    AccountTransfer, BankTransfer, FieldValue, ImportRow, LedgerAccount, ReconcileError,
    SettlementEntry, TransactionKind, TransferState,
};

/// Applies classified rows of one file
pub struct TransactionApplier<'a, L: Ledger + ?Sized> {
    ledger: &'a mut L,
    sender_rules: &'a dyn SenderValidator,
    validation_only: bool,
}

impl<'a, L: Ledger + ?Sized> TransactionApplier<'a, L> {
    /// Create an applier for one file
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger the transfers are booked against
    /// * `sender_rules` - Settlement sender check for debit collections
    /// * `validation_only` - When true, nothing is persisted
    pub fn new(
        ledger: &'a mut L,
        sender_rules: &'a dyn SenderValidator,
        validation_only: bool,
    ) -> Self {
        TransactionApplier {
            ledger,
            sender_rules,
            validation_only,
        }
    }

    /// Apply a single classified row
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the row was applied (or would be, in validation-only mode)
    /// * `Err(ReconcileError)` describing why the row was rejected
    ///
    /// # Errors
    ///
    /// `Unclassified` rows always fail with `ReconcileError::Classification`.
    pub fn apply(
        &mut self,
        kind: TransactionKind,
        row: &ImportRow,
        batch: &mut SettlementBatchBuilder,
    ) -> Result<(), ReconcileError> {
        match kind {
            TransactionKind::AccountTransfer => self.apply_account_transfer(row),
            TransactionKind::BankTransfer => self.apply_bank_transfer(row),
            TransactionKind::DebitCollection => self.apply_debit_collection(row, batch),
            TransactionKind::Unclassified => Err(ReconcileError::Classification),
        }
    }

    /// Resolve the sender account of a transfer row
    fn find_sender(&self, row: &ImportRow) -> Result<LedgerAccount, ReconcileError> {
        let account_no = row.require_sender_account()?;
        self.ledger
            .find_account(account_no)?
            .ok_or_else(|| ReconcileError::sender_not_found(account_no))
    }

    /// Apply an account transfer row
    ///
    /// Without `DEPOT_ACTIVITY_ID` a new pending transfer is built and saved.
    /// With it, the referenced pending transfer gets the row's subject and is
    /// completed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sender account is not in the ledger
    /// - Amount or entry date are missing or malformed (new transfers)
    /// - The referenced transfer does not exist or is not pending
    /// - The ledger rejects the transfer's fields
    fn apply_account_transfer(&mut self, row: &ImportRow) -> Result<(), ReconcileError> {
        let sender = self.find_sender(row)?;

        let (transfer, is_new) = match &row.depot_activity_id {
            FieldValue::Missing => {
                let amount = *row.amount.require(COL_AMOUNT)?;
                let value_date = *row.entry_date.require(COL_ENTRY_DATE)?;
                let transfer = AccountTransfer {
                    id: None,
                    sender_account_no: sender.account_no.clone(),
                    receiver_account_no: row.receiver_account.clone(),
                    amount,
                    subject: build_subject(row),
                    value_date: Some(value_date),
                    state: TransferState::Pending,
                };
                (transfer, true)
            }
            FieldValue::Malformed(_) => return Err(ReconcileError::TransferNotFound),
            FieldValue::Valid(id) => {
                let id = *id;
                let mut transfer = self
                    .ledger
                    .find_account_transfer(&sender, id)?
                    .ok_or(ReconcileError::TransferNotFound)?;
                if transfer.state != TransferState::Pending {
                    return Err(ReconcileError::transfer_state(transfer.state));
                }
                transfer.subject = build_subject(row);
                (transfer, false)
            }
        };

        let messages = self.ledger.validate_account_transfer(&transfer);
        if !messages.is_empty() {
            return Err(ReconcileError::collaborator_validation(
                "AccountTransfer",
                messages,
            ));
        }

        if self.validation_only {
            return Ok(());
        }

        if is_new {
            let id = self.ledger.save_account_transfer(transfer)?;
            tracing::debug!(row = %row.activity_id, transfer = id, "account transfer saved");
        } else {
            self.ledger.complete_account_transfer(transfer)?;
            tracing::debug!(row = %row.activity_id, "account transfer completed");
        }

        Ok(())
    }

    /// Apply a bank transfer row
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sender account is not in the ledger
    /// - The amount is missing or malformed
    /// - The ledger rejects the transfer's fields
    fn apply_bank_transfer(&mut self, row: &ImportRow) -> Result<(), ReconcileError> {
        let sender = self.find_sender(row)?;
        let amount = *row.amount.require(COL_AMOUNT)?;

        let transfer = BankTransfer {
            id: None,
            sender_account_no: sender.account_no,
            amount,
            subject: build_subject(row),
            receiver_holder: row.receiver_name.clone(),
            receiver_account_no: row.receiver_account.clone(),
            receiver_bank_code: row.receiver_bank_code.clone(),
        };

        let messages = self.ledger.validate_bank_transfer(&transfer);
        if !messages.is_empty() {
            return Err(ReconcileError::collaborator_validation(
                "BankTransfer",
                messages,
            ));
        }

        if !self.validation_only {
            let id = self.ledger.save_bank_transfer(transfer)?;
            tracing::debug!(row = %row.activity_id, transfer = id, "bank transfer saved");
        }

        Ok(())
    }

    /// Apply a debit collection row
    ///
    /// Appends an entry to the batch with the absolute amount, the ASCII
    /// sender name and the subject. The batch itself is only written at the
    /// end of a successful file, so validation-only runs may append freely.
    ///
    /// # Errors
    ///
    /// Returns `SenderInvalidForSettlement` (leaving the batch untouched) if
    /// the sender account/bank code pair is rejected, or an application error
    /// for a missing or malformed amount or an overflowing batch total.
    fn apply_debit_collection(
        &mut self,
        row: &ImportRow,
        batch: &mut SettlementBatchBuilder,
    ) -> Result<(), ReconcileError> {
        let account = row.sender_account.as_deref().unwrap_or_default();
        let bank_code = row.sender_bank_code.as_deref().unwrap_or_default();

        if !self.sender_rules.valid_sender(account, bank_code) {
            return Err(ReconcileError::SenderInvalidForSettlement);
        }

        let amount = row.amount.require(COL_AMOUNT)?.abs();

        batch.append(SettlementEntry {
            sender_account: account.to_string(),
            sender_bank_code: bank_code.to_string(),
            sender_name: ascii_name(row.sender_name.as_deref().unwrap_or_default()),
            amount,
            subject: build_subject(row),
        })
    }
}

//! Collaborator traits for the row pipeline
//!
//! The pipeline never stores accounts or transfers itself. Everything it books
//! goes through a `Ledger`, and whether a debit may be collected through the
//! settlement batch is decided by a `SenderValidator`.

use crate::types::{AccountTransfer, BankTransfer, LedgerAccount, ReconcileError, TransferId};

/// Account and transfer store the rows are booked against
///
/// Lookups and saves may fail with `ReconcileError::Ledger`; the applier
/// reports such failures against the row being applied.
pub trait Ledger {
    /// Look up an account by its account number
    fn find_account(&self, account_no: &str) -> Result<Option<LedgerAccount>, ReconcileError>;

    /// Look up an account transfer sent from `sender`
    fn find_account_transfer(
        &self,
        sender: &LedgerAccount,
        id: TransferId,
    ) -> Result<Option<AccountTransfer>, ReconcileError>;

    /// Field-level validation; an empty list means the transfer is acceptable
    fn validate_account_transfer(&self, transfer: &AccountTransfer) -> Vec<String>;

    /// Persist a new account transfer and return its id
    fn save_account_transfer(
        &mut self,
        transfer: AccountTransfer,
    ) -> Result<TransferId, ReconcileError>;

    /// Store the updated transfer and mark it completed
    fn complete_account_transfer(
        &mut self,
        transfer: AccountTransfer,
    ) -> Result<(), ReconcileError>;

    /// Field-level validation; an empty list means the transfer is acceptable
    fn validate_bank_transfer(&self, transfer: &BankTransfer) -> Vec<String>;

    /// Persist a bank transfer and return its id
    fn save_bank_transfer(&mut self, transfer: BankTransfer) -> Result<TransferId, ReconcileError>;
}

/// Decides whether an account may be debited through the settlement batch
pub trait SenderValidator {
    fn valid_sender(&self, account_no: &str, bank_code: &str) -> bool;
}

/// Default settlement sender rules
///
/// The account number must be 1 to 10 digits and the bank code exactly 8
/// digits, neither consisting only of zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementSenderRules;

fn digits_not_zero(value: &str) -> bool {
    value.bytes().all(|b| b.is_ascii_digit()) && value.bytes().any(|b| b != b'0')
}

impl SenderValidator for SettlementSenderRules {
    fn valid_sender(&self, account_no: &str, bank_code: &str) -> bool {
        (1..=10).contains(&account_no.len())
            && digits_not_zero(account_no)
            && bank_code.len() == 8
            && digits_not_zero(bank_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::valid("0101881952", "30020900", true)]
    #[case::short_account("1", "30020900", true)]
    #[case::account_too_long("01018819521", "30020900", false)]
    #[case::empty_account("", "30020900", false)]
    #[case::zero_account("0000000000", "30020900", false)]
    #[case::account_not_numeric("01018A1952", "30020900", false)]
    #[case::bank_code_short("0101881952", "3002090", false)]
    #[case::zero_bank_code("0101881952", "00000000", false)]
    fn test_settlement_sender_rules(
        #[case] account: &str,
        #[case] bank_code: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            SettlementSenderRules.valid_sender(account, bank_code),
            expected
        );
    }
}

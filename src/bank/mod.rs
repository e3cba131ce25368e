use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    account::AccountNumber,
    client::{ClientError, LegalId},
    command::TransactionCommand,
    policy::WithdrawalLimits,
    transaction::TransactionRecord,
};

pub mod registry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BankError {
    #[error("A client with CPF {legal_id} already exists")]
    DuplicateIdentity { legal_id: LegalId },
    #[error("No client with CPF {legal_id}")]
    UnknownClient { legal_id: LegalId },
    #[error("No account number {number}")]
    UnknownAccount { number: AccountNumber },
    #[error("No account selected")]
    NoAccountSelected,
    #[error("Account numbers exhausted")]
    AccountNumbersExhausted,
    #[error(transparent)]
    ClientErr(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
    pub branch_code: String,
    pub withdrawal_limits: WithdrawalLimits,
    /// Records an account may hold before the client can no longer route
    /// transactions to it.
    pub routing_cap: usize,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            branch_code: "0001".to_string(),
            withdrawal_limits: WithdrawalLimits::default(),
            routing_cap: 10,
        }
    }
}

/// Hands out account numbers, starting at 1. Numbers are never reused;
/// once `AccountNumber::MAX` has been issued the sequence is spent.
#[derive(Debug)]
pub struct AccountSequence {
    next: Option<AccountNumber>,
}

impl Default for AccountSequence {
    fn default() -> Self {
        Self { next: Some(1) }
    }
}

impl AccountSequence {
    pub fn next_number(&mut self) -> Option<AccountNumber> {
        let number = self.next?;
        self.next = number.checked_add(1);
        Some(number)
    }
}

/// Entry point for client-initiated transactions.
pub trait Teller {
    fn process_transaction(
        &mut self,
        legal_id: &LegalId,
        number: AccountNumber,
        command: TransactionCommand,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, BankError>;
}

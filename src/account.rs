use chrono::NaiveDateTime;
use thiserror::Error;

use crate::{
    client::LegalId,
    command::TransactionCommand,
    money::Money,
    policy::{PolicyError, WithdrawalLimits, WithdrawalPolicy},
    transaction::{Statement, TransactionKind, TransactionLedger, TransactionRecord},
};

pub type AccountNumber = u32;

/// Outcome of a validated command, not yet applied. Carries the absolute
/// resulting balance, so it only makes sense against the state it was
/// handled from and never leaves this module.
#[derive(Debug, PartialEq, Eq)]
struct AccountEvent {
    kind: TransactionKind,
    amount: Money,
    occurred_at: NaiveDateTime,
    balance_after: Money,
}

impl AccountEvent {
    fn record(&self) -> TransactionRecord {
        TransactionRecord::new(
            self.kind,
            self.amount,
            self.occurred_at,
            self.balance_after,
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive")]
    InvalidAmount,
    #[error("Insufficient funds, current balance is R$ {balance}")]
    InsufficientFunds { balance: Money },
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("Balance would overflow")]
    BalanceOverflow,
}

#[derive(Debug)]
pub struct Account {
    number: AccountNumber,
    branch: String,
    owner: LegalId,
    balance: Money,
    ledger: TransactionLedger,
    withdrawal_policy: WithdrawalPolicy,
}

impl Account {
    pub fn new(
        number: AccountNumber,
        branch: impl Into<String>,
        owner: LegalId,
        limits: WithdrawalLimits,
    ) -> Self {
        Self {
            number,
            branch: branch.into(),
            owner,
            balance: Money::ZERO,
            ledger: TransactionLedger::default(),
            withdrawal_policy: WithdrawalPolicy::new(limits),
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn owner(&self) -> &LegalId {
        &self.owner
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn withdrawal_policy(&self) -> &WithdrawalPolicy {
        &self.withdrawal_policy
    }

    pub fn statement(&self, kind: Option<TransactionKind>) -> Statement<'_> {
        self.ledger.statement(kind)
    }

    pub fn deposit(
        &mut self,
        amount: Money,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, AccountError> {
        self.execute(TransactionCommand::deposit(amount), now)
    }

    pub fn withdraw(
        &mut self,
        amount: Money,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, AccountError> {
        self.execute(TransactionCommand::withdrawal(amount), now)
    }

    /// Validates and applies a command. Nothing is touched on error.
    pub fn execute(
        &mut self,
        command: TransactionCommand,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, AccountError> {
        let event = match self.handle_transaction(command, now) {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(
                    account = self.number,
                    kind = ?command.kind,
                    amount = %command.amount,
                    "transaction rejected: {err}"
                );
                return Err(err);
            }
        };
        self.apply(&event);
        tracing::debug!(
            account = self.number,
            kind = ?event.kind,
            amount = %event.amount,
            balance = %event.balance_after,
            "transaction recorded"
        );
        Ok(event.record())
    }

    fn handle_transaction(
        &self,
        command: TransactionCommand,
        now: NaiveDateTime,
    ) -> Result<AccountEvent, AccountError> {
        if command.amount.is_zero() {
            return Err(AccountError::InvalidAmount);
        }

        let balance_after = match command.kind {
            TransactionKind::Deposit => self
                .balance
                .checked_add(command.amount)
                .ok_or(AccountError::BalanceOverflow)?,
            TransactionKind::Withdrawal => {
                self.withdrawal_policy.check(command.amount, now.date())?;
                self.balance
                    .checked_sub(command.amount)
                    .ok_or(AccountError::InsufficientFunds {
                        balance: self.balance,
                    })?
            }
        };

        Ok(AccountEvent {
            kind: command.kind,
            amount: command.amount,
            occurred_at: now,
            balance_after,
        })
    }

    /// Only called by `execute`, right after the event was handled against
    /// the current state.
    fn apply(&mut self, event: &AccountEvent) {
        if event.kind == TransactionKind::Withdrawal {
            self.withdrawal_policy.record(event.occurred_at.date());
        }
        self.balance = event.balance_after;
        self.ledger.push(event.record());
    }
}

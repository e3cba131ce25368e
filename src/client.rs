use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::{
    account::{Account, AccountError, AccountNumber},
    command::TransactionCommand,
    policy::WithdrawalLimits,
    transaction::TransactionRecord,
};

/// Tax identifier of a client, stored as digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegalId(String);

impl LegalId {
    /// Drops every non-digit character, so `123.456.789-01` and
    /// `12345678901` name the same client.
    pub fn new(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 11
    }
}

impl fmt::Display for LegalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_well_formed() {
            return f.write_str(&self.0);
        }
        let d = &self.0;
        write!(f, "{}.{}.{}-{}", &d[..3], &d[3..6], &d[6..9], &d[9..])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub birth_date: NaiveDate,
    pub legal_id: LegalId,
    pub address: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("Limit of {limit} transactions reached for account {number}")]
    TransactionLimitExceeded {
        number: AccountNumber,
        limit: usize,
    },
    #[error("Account {number} does not belong to the client")]
    AccountNotOwned { number: AccountNumber },
    #[error(transparent)]
    Account(#[from] AccountError),
}

#[derive(Debug)]
pub struct Client {
    identity: Identity,
    accounts: Vec<AccountNumber>,
    transaction_limit: usize,
}

impl Client {
    pub fn new(identity: Identity, transaction_limit: usize) -> Self {
        Self {
            identity,
            accounts: Vec::new(),
            transaction_limit,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn legal_id(&self) -> &LegalId {
        &self.identity.legal_id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn accounts(&self) -> &[AccountNumber] {
        &self.accounts
    }

    pub fn owns(&self, number: AccountNumber) -> bool {
        self.accounts.contains(&number)
    }

    pub fn open_account(
        &mut self,
        number: AccountNumber,
        branch: &str,
        limits: WithdrawalLimits,
    ) -> Account {
        self.accounts.push(number);
        Account::new(number, branch, self.legal_id().clone(), limits)
    }

    /// Runs `command` against one of the client's accounts.
    ///
    /// The cap counts the records already in that account's ledger; it is
    /// checked before the command, and the command's own outcome stands.
    pub fn route_transaction(
        &self,
        account: &mut Account,
        command: TransactionCommand,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, ClientError> {
        let number = account.number();
        if !self.owns(number) || account.owner() != self.legal_id() {
            tracing::warn!(
                account = number,
                legal_id = %self.legal_id(),
                "account not owned by client"
            );
            return Err(ClientError::AccountNotOwned { number });
        }
        if account.ledger().len() >= self.transaction_limit {
            tracing::warn!(
                account = number,
                limit = self.transaction_limit,
                "transaction limit reached"
            );
            return Err(ClientError::TransactionLimitExceeded {
                number,
                limit: self.transaction_limit,
            });
        }
        Ok(account.execute(command, now)?)
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - CPF: {}", self.identity.name, self.identity.legal_id)
    }
}

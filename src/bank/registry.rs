use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use chrono::NaiveDateTime;

use crate::{
    account::{Account, AccountNumber},
    client::{Client, Identity, LegalId},
    command::TransactionCommand,
    policy::WithdrawalLimits,
    transaction::TransactionRecord,
};

use super::{AccountSequence, BankConfig, BankError, Teller};

/// In-memory registry of one branch: clients keyed by legal id, accounts
/// keyed by number.
#[derive(Debug, Default)]
pub struct Bank {
    config: BankConfig,
    clients: Vec<Client>,
    client_index: HashMap<LegalId, usize>,
    accounts: BTreeMap<AccountNumber, Account>,
    sequence: AccountSequence,
    selected_account: Option<AccountNumber>,
}

impl Bank {
    pub fn new(config: BankConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    pub fn create_client(&mut self, identity: Identity) -> Result<&Client, BankError> {
        let index = match self.client_index.entry(identity.legal_id.clone()) {
            Entry::Occupied(_) => {
                tracing::warn!(legal_id = %identity.legal_id, "duplicate client");
                return Err(BankError::DuplicateIdentity {
                    legal_id: identity.legal_id,
                });
            }
            Entry::Vacant(entry) => *entry.insert(self.clients.len()),
        };
        tracing::info!(legal_id = %identity.legal_id, name = %identity.name, "client registered");
        self.clients
            .push(Client::new(identity, self.config.routing_cap));
        Ok(&self.clients[index])
    }

    pub fn create_account(&mut self, legal_id: &LegalId) -> Result<&Account, BankError> {
        self.create_account_with_limits(legal_id, self.config.withdrawal_limits)
    }

    pub fn create_account_with_limits(
        &mut self,
        legal_id: &LegalId,
        limits: WithdrawalLimits,
    ) -> Result<&Account, BankError> {
        let Some(&index) = self.client_index.get(legal_id) else {
            tracing::warn!(%legal_id, "cannot open account for unknown client");
            return Err(BankError::UnknownClient {
                legal_id: legal_id.clone(),
            });
        };
        let number = self
            .sequence
            .next_number()
            .ok_or(BankError::AccountNumbersExhausted)?;
        let account = self.clients[index].open_account(number, &self.config.branch_code, limits);
        tracing::info!(%legal_id, account = number, branch = %self.config.branch_code, "account opened");
        Ok(self.accounts.entry(number).or_insert(account))
    }

    pub fn find_client(&self, legal_id: &LegalId) -> Option<&Client> {
        self.client_index
            .get(legal_id)
            .map(|&index| &self.clients[index])
    }

    /// Clients in registration order.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn account(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts.get(&number)
    }

    /// Accounts ordered by number.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn client_accounts(&self, legal_id: &LegalId) -> impl Iterator<Item = &Account> {
        self.find_client(legal_id)
            .into_iter()
            .flat_map(|client| client.accounts())
            .filter_map(move |number| self.accounts.get(number))
    }

    pub fn select_account(&mut self, number: AccountNumber) -> Result<&Account, BankError> {
        let Some(account) = self.accounts.get(&number) else {
            tracing::warn!(account = number, "cannot select unknown account");
            return Err(BankError::UnknownAccount { number });
        };
        self.selected_account = Some(number);
        Ok(account)
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.selected_account
            .and_then(|number| self.accounts.get(&number))
    }

    pub fn clear_selection(&mut self) {
        self.selected_account = None;
    }

    /// Routes `command` to the selected account on behalf of its owner.
    pub fn process_on_current(
        &mut self,
        command: TransactionCommand,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, BankError> {
        let Some(account) = self.current_account() else {
            tracing::warn!("transaction without a selected account");
            return Err(BankError::NoAccountSelected);
        };
        let (owner, number) = (account.owner().clone(), account.number());
        self.process_transaction(&owner, number, command, now)
    }
}

impl Teller for Bank {
    fn process_transaction(
        &mut self,
        legal_id: &LegalId,
        number: AccountNumber,
        command: TransactionCommand,
        now: NaiveDateTime,
    ) -> Result<TransactionRecord, BankError> {
        let Some(client) = self
            .client_index
            .get(legal_id)
            .map(|&index| &self.clients[index])
        else {
            tracing::warn!(%legal_id, account = number, "transaction for unknown client");
            return Err(BankError::UnknownClient {
                legal_id: legal_id.clone(),
            });
        };
        let Some(account) = self.accounts.get_mut(&number) else {
            tracing::warn!(%legal_id, account = number, "transaction for unknown account");
            return Err(BankError::UnknownAccount { number });
        };
        Ok(client.route_transaction(account, command, now)?)
    }
}

//! Replays a teller journal against a fresh [`Bank`] and prints the
//! outcome. Stands in for the interactive teller menu.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::{
    account::AccountNumber,
    bank::{BankConfig, BankError, Teller, registry::Bank},
    client::{Identity, LegalId},
    command::{CommandError, TransactionCommand},
    transaction::TransactionKind,
};
use csv_parser::{CsvJournalParser, JournalAction, JournalEntry};
use csv_printer::{AccountSummary, ClientSummary, print_accounts, print_clients, print_statement};
use text_printer::print_report;
pub mod csv_parser;
pub mod csv_printer;
pub mod text_printer;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Column `{0}` is required for this action")]
    MissingField(&'static str),
    #[error("CPF must have 11 digits, got `{0}`")]
    MalformedLegalId(String),
    #[error("Invalid birth date `{0}`, expected DD/MM/YYYY")]
    InvalidBirthDate(String),
    #[error("Client {0} has several accounts, the account column is required")]
    AmbiguousAccount(LegalId),
    #[error("Client {0} has no account")]
    NoAccount(LegalId),
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    BankErr(#[from] BankError),
}

#[derive(Debug, Clone, Copy, Default)]
pub enum Report {
    /// One row per account.
    #[default]
    Summary,
    /// One row per registered client, including those without accounts.
    Clients,
    /// Ledger of a single account, optionally restricted to one kind.
    Statement {
        account: AccountNumber,
        kind: Option<TransactionKind>,
    },
    /// Plain-text statement of one account with the activity counters of
    /// day `on`.
    Text {
        account: AccountNumber,
        kind: Option<TransactionKind>,
        on: NaiveDate,
    },
}

/// How a rejected journal row is reported to the operator.
pub fn rejection_message(line: u64, err: &JournalError) -> String {
    format!("Error at line {line}: {err}")
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: BankConfig,
    pub report: Report,
    pub error_printer: Box<dyn FnMut(u64, JournalError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvJournalParser::new(self.input);

        let mut bank = Bank::new(self.config);

        for (line, row) in parser {
            let result = row
                .map_err(JournalError::from)
                .and_then(|entry| apply_entry(&mut bank, entry));
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        match self.report {
            Report::Summary => print_accounts(
                self.output,
                bank.accounts().map(|acc| AccountSummary {
                    branch: acc.branch(),
                    account: acc.number(),
                    holder: bank
                        .find_client(acc.owner())
                        .map(|client| client.name())
                        .unwrap_or_default(),
                    legal_id: acc.owner().to_string(),
                    balance: acc.balance(),
                    transactions: acc.ledger().len(),
                }),
            ),
            Report::Clients => print_clients(
                self.output,
                bank.clients().map(|client| {
                    let identity = client.identity();
                    ClientSummary {
                        legal_id: identity.legal_id.to_string(),
                        name: &identity.name,
                        birth_date: identity.birth_date.format("%d/%m/%Y").to_string(),
                        address: &identity.address,
                        accounts: client.accounts().len(),
                    }
                }),
            ),
            Report::Statement { account, kind } => {
                let acc = bank
                    .account(account)
                    .with_context(|| format!("Account {account} does not exist"))?;
                print_statement(self.output, acc.statement(kind))
            }
            Report::Text { account, kind, on } => {
                let acc = bank
                    .account(account)
                    .with_context(|| format!("Account {account} does not exist"))?;
                print_report(self.output, acc, bank.find_client(acc.owner()), kind, on)
            }
        }
    }
}

fn apply_entry(bank: &mut Bank, entry: JournalEntry) -> Result<(), JournalError> {
    match entry.action {
        JournalAction::Register => {
            let legal_id = well_formed_legal_id(entry.legal_id.as_deref())?;
            let name = entry.name.ok_or(JournalError::MissingField("name"))?;
            let raw_date = entry
                .birth_date
                .ok_or(JournalError::MissingField("birth_date"))?;
            let birth_date = NaiveDate::parse_from_str(&raw_date, "%d/%m/%Y")
                .map_err(|_| JournalError::InvalidBirthDate(raw_date))?;
            bank.create_client(Identity {
                name,
                birth_date,
                legal_id,
                address: entry.address.unwrap_or_default(),
            })?;
        }
        JournalAction::Open => {
            let legal_id = well_formed_legal_id(entry.legal_id.as_deref())?;
            bank.create_account(&legal_id)?;
        }
        JournalAction::Select => {
            let number = entry.account.ok_or(JournalError::MissingField("account"))?;
            bank.select_account(number)?;
        }
        JournalAction::Deposit | JournalAction::Withdrawal => {
            let kind = if entry.action == JournalAction::Deposit {
                TransactionKind::Deposit
            } else {
                TransactionKind::Withdrawal
            };
            let command = TransactionCommand::parse_command(kind, entry.amount)?;
            let now = entry.at.unwrap_or_else(|| Local::now().naive_local());

            match (entry.legal_id.as_deref().map(LegalId::new), entry.account) {
                (Some(legal_id), Some(number)) => {
                    bank.process_transaction(&legal_id, number, command, now)?;
                }
                (Some(legal_id), None) => {
                    let number = sole_account(bank, &legal_id)?;
                    bank.process_transaction(&legal_id, number, command, now)?;
                }
                (None, Some(_)) => return Err(JournalError::MissingField("legal_id")),
                (None, None) => {
                    bank.process_on_current(command, now)?;
                }
            }
        }
    }
    Ok(())
}

fn well_formed_legal_id(raw: Option<&str>) -> Result<LegalId, JournalError> {
    let raw = raw.ok_or(JournalError::MissingField("legal_id"))?;
    let legal_id = LegalId::new(raw);
    if !legal_id.is_well_formed() {
        return Err(JournalError::MalformedLegalId(raw.to_string()));
    }
    Ok(legal_id)
}

fn sole_account(bank: &Bank, legal_id: &LegalId) -> Result<AccountNumber, JournalError> {
    let client = bank
        .find_client(legal_id)
        .ok_or_else(|| BankError::UnknownClient {
            legal_id: legal_id.clone(),
        })?;
    match client.accounts() {
        [number] => Ok(*number),
        [] => Err(JournalError::NoAccount(legal_id.clone())),
        _ => Err(JournalError::AmbiguousAccount(legal_id.clone())),
    }
}

#[cfg(test)]
mod tests {
    use crate::money::Money;

    use super::*;

    const HEADER: &str = "action,legal_id,name,birth_date,address,account,amount,at\n";

    fn replay(rows: &str) -> (Bank, Vec<String>) {
        let mut bank = Bank::default();
        let mut errors = Vec::new();
        let journal = format!("{HEADER}{rows}");
        for (_, row) in CsvJournalParser::new(journal.as_bytes()) {
            if let Err(err) = row
                .map_err(JournalError::from)
                .and_then(|entry| apply_entry(&mut bank, entry))
            {
                errors.push(err.to_string());
            }
        }
        (bank, errors)
    }

    #[test]
    fn register_open_and_transact() {
        let (bank, errors) = replay(
            "register,123.456.789-01,João Silva,01/01/1990,Rua A,,,\n\
             open,12345678901,,,,,,\n\
             deposit,12345678901,,,,,1000.00,2025-06-14T09:00:00\n\
             withdrawal,12345678901,,,,1,200,2025-06-14T09:05:00\n",
        );
        assert!(errors.is_empty(), "{errors:?}");
        let account = bank.account(1).unwrap();
        assert_eq!(account.balance(), Money::from_cents(80_000));
        assert_eq!(account.ledger().len(), 2);
        assert_eq!(
            bank.find_client(&LegalId::new("12345678901"))
                .unwrap()
                .identity()
                .birth_date,
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
        );
    }

    #[test]
    fn shell_side_validation() {
        let (bank, errors) = replay(
            "register,1234,João Silva,01/01/1990,Rua A,,,\n\
             register,12345678901,João Silva,1990-01-01,Rua A,,,\n\
             register,12345678901,,01/01/1990,Rua A,,,\n\
             open,,,,,,,\n",
        );
        assert_eq!(bank.client_count(), 0);
        assert_eq!(
            errors,
            vec![
                "CPF must have 11 digits, got `1234`",
                "Invalid birth date `1990-01-01`, expected DD/MM/YYYY",
                "Column `name` is required for this action",
                "Column `legal_id` is required for this action",
            ]
        );
    }

    #[test]
    fn account_resolution() {
        let (bank, errors) = replay(
            "register,11111111111,João Silva,01/01/1990,Rua A,,,\n\
             deposit,11111111111,,,,,10,2025-06-14T09:00:00\n\
             open,11111111111,,,,,,\n\
             open,11111111111,,,,,,\n\
             deposit,11111111111,,,,,10,2025-06-14T09:00:00\n\
             deposit,,,,,2,10,2025-06-14T09:00:00\n\
             select,,,,,2,,\n\
             deposit,,,,,,25.50,2025-06-14T09:00:00\n",
        );
        assert_eq!(
            errors,
            vec![
                "Client 111.111.111-11 has no account",
                "Client 111.111.111-11 has several accounts, the account column is required",
                "Column `legal_id` is required for this action",
            ]
        );
        assert_eq!(bank.account(1).unwrap().balance(), Money::ZERO);
        assert_eq!(bank.account(2).unwrap().balance(), Money::from_cents(2550));
    }

    #[test]
    fn business_rejections_are_reported() {
        let (bank, errors) = replay(
            "register,11111111111,João Silva,01/01/1990,Rua A,,,\n\
             register,111.111.111-11,João Silva,01/01/1990,Rua A,,,\n\
             open,22222222222,,,,,,\n\
             open,11111111111,,,,,,\n\
             withdrawal,11111111111,,,,1,10,2025-06-14T09:00:00\n\
             deposit,11111111111,,,,1,-10,2025-06-14T09:00:00\n",
        );
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], "A client with CPF 111.111.111-11 already exists");
        assert_eq!(errors[1], "No client with CPF 222.222.222-22");
        assert!(errors[2].starts_with("Insufficient funds"));
        assert_eq!(errors[3], "Amount must be positive for Deposit");
        assert!(bank.account(1).unwrap().ledger().is_empty());
    }
}

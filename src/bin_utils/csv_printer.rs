use std::io::Write;

use csv::Writer;
use serde::Serialize;

use crate::{account::AccountNumber, money::Money, transaction::TransactionRecord};

#[derive(Debug, Serialize)]
pub struct AccountSummary<'a> {
    pub branch: &'a str,
    pub account: AccountNumber,
    pub holder: &'a str,
    pub legal_id: String,
    pub balance: Money,
    pub transactions: usize,
}

#[derive(Debug, Serialize)]
pub struct ClientSummary<'a> {
    pub legal_id: String,
    pub name: &'a str,
    pub birth_date: String,
    pub address: &'a str,
    pub accounts: usize,
}

pub fn print_clients<'a, W>(
    output: &mut W,
    clients: impl Iterator<Item = ClientSummary<'a>>,
) -> anyhow::Result<()>
where
    W: Write,
{
    write_rows(output, clients)
}

pub fn print_accounts<'a, W>(
    output: &mut W,
    accounts: impl Iterator<Item = AccountSummary<'a>>,
) -> anyhow::Result<()>
where
    W: Write,
{
    write_rows(output, accounts)
}

pub fn print_statement<'a, W>(
    output: &mut W,
    records: impl Iterator<Item = &'a TransactionRecord>,
) -> anyhow::Result<()>
where
    W: Write,
{
    write_rows(output, records)
}

fn write_rows<W, S>(output: &mut W, rows: impl Iterator<Item = S>) -> anyhow::Result<()>
where
    W: Write,
    S: Serialize,
{
    let mut writer = Writer::from_writer(output);
    for row in rows {
        if let Err(err) = writer.serialize(row) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}

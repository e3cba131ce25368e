use std::io::Write;

use anyhow::Context;
use chrono::NaiveDate;

use crate::{account::Account, client::Client, transaction::TransactionKind};

/// Writes the teller's plain-text statement of one account, followed by
/// its balance and the activity counters for `on`.
pub fn print_report<W>(
    output: &mut W,
    account: &Account,
    holder: Option<&Client>,
    kind: Option<TransactionKind>,
    on: NaiveDate,
) -> anyhow::Result<()>
where
    W: Write,
{
    let day = on.format("%d/%m/%Y");
    let mut text = format!("Account {}/{}", account.branch(), account.number());
    if let Some(client) = holder {
        text.push_str(&format!(" - {client}"));
    }
    text.push('\n');
    text.push_str(&account.ledger().report(kind));
    text.push('\n');
    text.push_str(&format!("Balance: R$ {}\n", account.balance()));
    text.push_str(&format!(
        "Transactions on {day}: {}\n",
        account.ledger().records_on(on).count()
    ));
    text.push_str(&format!(
        "Withdrawals left on {day}: {}\n",
        account.withdrawal_policy().remaining_on(on)
    ));
    output
        .write_all(text.as_bytes())
        .and_then(|_| output.flush())
        .context("Failed to write report")
}

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use branch_ledger::{
    account::AccountNumber,
    bank::BankConfig,
    bin_utils::{Report, Service, rejection_message},
    money::Money,
    policy::WithdrawalLimits,
    transaction::TransactionKind,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Deposit,
    Withdrawal,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Deposit => TransactionKind::Deposit,
            KindArg::Withdrawal => TransactionKind::Withdrawal,
        }
    }
}

/// Replays a teller journal (CSV) against an in-memory branch ledger.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Journal with columns action,legal_id,name,birth_date,address,account,amount,at
    journal: PathBuf,
    #[arg(long, env = "BRANCH_LEDGER_BRANCH", default_value = "0001")]
    branch: String,
    /// Largest single withdrawal, in major units
    #[arg(long, env = "BRANCH_LEDGER_WITHDRAWAL_CAP", default_value = "500.00")]
    per_withdrawal_cap: Money,
    /// Withdrawals allowed per account per day
    #[arg(long, env = "BRANCH_LEDGER_DAILY_WITHDRAWALS", default_value_t = 3)]
    daily_withdrawals: u32,
    /// Records an account may hold before routing is refused
    #[arg(long, env = "BRANCH_LEDGER_ROUTING_CAP", default_value_t = 10)]
    routing_cap: usize,
    /// Print the registered clients instead of the account summary
    #[arg(long, conflicts_with = "statement")]
    clients: bool,
    /// Print the ledger of this account instead of the account summary
    #[arg(long)]
    statement: Option<AccountNumber>,
    #[arg(long, value_enum, requires = "statement")]
    kind: Option<KindArg>,
    /// Print the statement as text, with the day's activity counters
    #[arg(long, requires = "statement")]
    text: bool,
    /// Day the text statement counts activity for (YYYY-MM-DD), today by default
    #[arg(long, requires = "text")]
    on: Option<NaiveDate>,
    #[arg(long, env = "BRANCH_LEDGER_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("branch_ledger={}", args.log_level))
        .with_writer(std::io::stderr)
        .init();

    let file = File::open(&args.journal)
        .with_context(|| format!("Failed to open `{}`", args.journal.display()))?;

    let kind = args.kind.map(Into::into);
    let report = match args.statement {
        Some(account) if args.text => Report::Text {
            account,
            kind,
            on: args.on.unwrap_or_else(|| Local::now().date_naive()),
        },
        Some(account) => Report::Statement { account, kind },
        None if args.clients => Report::Clients,
        None => Report::Summary,
    };

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        config: BankConfig {
            branch_code: args.branch,
            withdrawal_limits: WithdrawalLimits {
                per_operation_cap: args.per_withdrawal_cap,
                daily_count_cap: args.daily_withdrawals,
            },
            routing_cap: args.routing_cap,
        },
        report,
        error_printer: Box::new(|line, err| eprintln!("{}", rejection_message(line, &err))),
    };
    service.run()
}

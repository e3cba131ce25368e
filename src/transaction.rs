use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::money::Money;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("Deposit"),
            TransactionKind::Withdrawal => f.write_str("Withdrawal"),
        }
    }
}

/// A successful account operation. Rejected operations never produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    kind: TransactionKind,
    amount: Money,
    occurred_at: NaiveDateTime,
    balance_after: Money,
}

impl TransactionRecord {
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Money,
        occurred_at: NaiveDateTime,
        balance_after: Money,
    ) -> Self {
        Self {
            kind,
            amount,
            occurred_at,
            balance_after,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn occurred_at(&self) -> NaiveDateTime {
        self.occurred_at
    }

    pub fn balance_after(&self) -> Money {
        self.balance_after
    }
}

/// Append-only history of one account, oldest record first.
#[derive(Debug, Default)]
pub struct TransactionLedger {
    records: Vec<TransactionRecord>,
}

impl TransactionLedger {
    pub(crate) fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Lazily walks the ledger, keeping only records of `kind` when one is given.
    pub fn statement(&self, kind: Option<TransactionKind>) -> Statement<'_> {
        Statement {
            records: self.records.iter(),
            kind,
        }
    }

    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &TransactionRecord> {
        self.records
            .iter()
            .filter(move |record| record.occurred_at.date() == date)
    }

    /// Human readable statement, one line per record.
    pub fn report(&self, kind: Option<TransactionKind>) -> String {
        if self.records.is_empty() {
            return "No transactions recorded.".to_string();
        }
        let lines: Vec<String> = self
            .statement(kind)
            .map(|record| {
                format!(
                    "{} - {}: R$ {}",
                    record.occurred_at.format("%d/%m/%Y %H:%M:%S"),
                    record.kind,
                    record.amount
                )
            })
            .collect();
        match (lines.is_empty(), kind) {
            (true, Some(kind)) => format!("No {kind} transactions found."),
            _ => lines.join("\n"),
        }
    }
}

/// Restartable view over a ledger; clone it to iterate again from the
/// same position.
#[derive(Debug, Clone)]
pub struct Statement<'a> {
    records: std::slice::Iter<'a, TransactionRecord>,
    kind: Option<TransactionKind>,
}

impl<'a> Iterator for Statement<'a> {
    type Item = &'a TransactionRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.kind;
        self.records
            .by_ref()
            .find(|record| kind.is_none_or(|kind| record.kind == kind))
    }
}

use std::io::Read;

use chrono::NaiveDateTime;
use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::account::AccountNumber;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JournalAction {
    Register,
    Open,
    Select,
    Deposit,
    Withdrawal,
}

/// One teller action. Which columns are needed depends on `action`.
#[derive(Debug, Deserialize)]
pub struct JournalEntry {
    pub action: JournalAction,
    pub legal_id: Option<String>,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub address: Option<String>,
    pub account: Option<AccountNumber>,
    pub amount: Option<Decimal>,
    pub at: Option<NaiveDateTime>,
}

/// Parses a teller journal in CSV format, yielding each row with the line
/// it started on.
pub struct CsvJournalParser<R> {
    iter: DeserializeRecordsIntoIter<R, JournalEntry>,
}

impl<R> CsvJournalParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvJournalParser<R>
where
    R: Read,
{
    type Item = (u64, Result<JournalEntry, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

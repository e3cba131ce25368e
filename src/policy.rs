use chrono::NaiveDate;
use thiserror::Error;

use crate::money::Money;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Daily limit of {cap} withdrawals reached")]
    DailyCountExceeded { cap: u32 },
    #[error("Amount exceeds the limit of R$ {cap} per withdrawal")]
    PerOperationCapExceeded { cap: Money },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalLimits {
    pub per_operation_cap: Money,
    pub daily_count_cap: u32,
}

impl Default for WithdrawalLimits {
    fn default() -> Self {
        Self {
            per_operation_cap: Money::from_cents(50_000),
            daily_count_cap: 3,
        }
    }
}

/// Tracks how many withdrawals happened on the current day.
///
/// A day other than the stored one counts as a fresh day with zero
/// withdrawals. Checking never mutates the counter; only [`record`] does,
/// and the account calls it once a withdrawal has fully succeeded.
///
/// [`record`]: WithdrawalPolicy::record
#[derive(Debug, Default)]
pub struct WithdrawalPolicy {
    limits: WithdrawalLimits,
    count_today: u32,
    last_reset_date: Option<NaiveDate>,
}

impl WithdrawalPolicy {
    pub fn new(limits: WithdrawalLimits) -> Self {
        Self {
            limits,
            count_today: 0,
            last_reset_date: None,
        }
    }

    pub fn limits(&self) -> WithdrawalLimits {
        self.limits
    }

    pub fn count_on(&self, today: NaiveDate) -> u32 {
        if self.last_reset_date == Some(today) {
            self.count_today
        } else {
            0
        }
    }

    pub fn remaining_on(&self, today: NaiveDate) -> u32 {
        self.limits
            .daily_count_cap
            .saturating_sub(self.count_on(today))
    }

    pub fn check(&self, amount: Money, today: NaiveDate) -> Result<(), PolicyError> {
        if self.count_on(today) >= self.limits.daily_count_cap {
            return Err(PolicyError::DailyCountExceeded {
                cap: self.limits.daily_count_cap,
            });
        }
        if amount > self.limits.per_operation_cap {
            return Err(PolicyError::PerOperationCapExceeded {
                cap: self.limits.per_operation_cap,
            });
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, today: NaiveDate) {
        if self.last_reset_date != Some(today) {
            self.count_today = 0;
            self.last_reset_date = Some(today);
        }
        self.count_today += 1;
    }
}

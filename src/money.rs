use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must not be negative, got {0}")]
    Negative(Decimal),
    #[error("Amount {0} is out of range")]
    OutOfRange(Decimal),
    #[error("`{0}` is not a decimal amount")]
    Unparsable(String),
}

/// Non-negative amount of money, kept as integer cents.
///
/// Conversions from major units truncate anything below one cent, so
/// `100.999` becomes `10099` cents. Arithmetic is checked and never wraps
/// or goes below zero; callers decide what an underflow means for them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Converts an amount given in major units (e.g. `12.34`) into cents.
    ///
    /// Zero is accepted here; operations that need a strictly positive
    /// amount check [`Money::is_zero`] themselves.
    pub fn from_major(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::Negative(value));
        }
        value
            .checked_mul(Decimal::from(100))
            .map(|cents| cents.trunc())
            .and_then(|cents| cents.to_u64())
            .map(Self)
            .ok_or(MoneyError::OutOfRange(value))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn to_major(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), 2)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Returns `None` instead of going below zero.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| MoneyError::Unparsable(s.to_string()))?;
        Self::from_major(value)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

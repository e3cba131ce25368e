use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::{
    money::{Money, MoneyError},
    transaction::TransactionKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionCommand {
    pub kind: TransactionKind,
    pub amount: Money,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: TransactionKind },
    #[error("Amount must be positive for {kind:?}")]
    InvalidAmount { kind: TransactionKind },
    #[error(transparent)]
    Money(#[from] MoneyError),
}

impl TransactionCommand {
    pub fn deposit(amount: Money) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount,
        }
    }

    pub fn withdrawal(amount: Money) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            amount,
        }
    }

    /// Builds a command from raw teller input given in major units.
    ///
    /// Amounts that truncate to zero cents are rejected like any other
    /// non-positive amount.
    pub fn parse_command(
        kind: TransactionKind,
        amount: Option<Decimal>,
    ) -> Result<Self, CommandError> {
        let Some(amount) = amount else {
            return Err(CommandError::AmountRequired { kind });
        };
        if amount <= Decimal::zero() {
            return Err(CommandError::InvalidAmount { kind });
        }
        let amount = Money::from_major(amount)?;
        if amount.is_zero() {
            return Err(CommandError::InvalidAmount { kind });
        }
        Ok(Self { kind, amount })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn parse_valid_amount() {
        let cmd = TransactionCommand::parse_command(
            TransactionKind::Deposit,
            Some(Decimal::from_str("10.50").unwrap()),
        )
        .unwrap();
        assert_eq!(cmd, TransactionCommand::deposit(Money::from_cents(1050)));
    }

    #[test]
    fn parse_rejects_missing_and_non_positive_amounts() {
        let err =
            TransactionCommand::parse_command(TransactionKind::Withdrawal, None).unwrap_err();
        assert!(matches!(
            err,
            CommandError::AmountRequired {
                kind: TransactionKind::Withdrawal
            }
        ));

        for raw in ["0", "-10", "0.001"] {
            let err = TransactionCommand::parse_command(
                TransactionKind::Deposit,
                Some(Decimal::from_str(raw).unwrap()),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                CommandError::InvalidAmount {
                    kind: TransactionKind::Deposit
                }
            ));
        }
    }
}

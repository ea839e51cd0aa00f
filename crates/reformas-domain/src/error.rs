use std::fmt;

use rust_decimal::Decimal;

use crate::common::MAX_AMOUNT;

/// Invariant violations detected while constructing or mutating domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Quantities must be strictly positive.
    InvalidQuantity(Decimal),
    /// Prices and per-unit material ratios cannot be negative.
    NegativeAmount { field: &'static str, value: Decimal },
    /// Installment percentages live in `[0, 100]`.
    PercentageOutOfRange(Decimal),
    /// `quantity × factor` is larger than any amount a quote can carry.
    AmountOverflow { quantity: Decimal, factor: Decimal },
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::InvalidQuantity(value) => {
                write!(f, "quantity must be greater than zero (got {value})")
            }
            DomainError::NegativeAmount { field, value } => {
                write!(f, "{field} cannot be negative (got {value})")
            }
            DomainError::PercentageOutOfRange(value) => {
                write!(f, "percentage must be between 0 and 100 (got {value})")
            }
            DomainError::AmountOverflow { quantity, factor } => {
                write!(f, "quantity {quantity} is too large (x {factor} exceeds {MAX_AMOUNT})")
            }
        }
    }
}

impl std::error::Error for DomainError {}

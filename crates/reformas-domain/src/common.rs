//! Shared traits and rounding rules for quote arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::DomainError;

/// Number of decimal places kept for currency values.
pub const MONEY_SCALE: u32 = 2;
/// Number of decimal places kept for derived material quantities.
pub const QUANTITY_SCALE: u32 = 2;
/// Largest line total or material quantity a quote accepts (10^15).
///
/// Summing tens of trillions of such lines still fits in a `Decimal`, so quote
/// totals and installment values never overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Exposes a stable identifier for entities stored in a quote.
pub trait Identifiable {
    type Id;

    fn id(&self) -> Self::Id;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Rounds a monetary amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a material quantity up to two decimal places.
///
/// Always rounds toward positive infinity: a contractor would rather buy a
/// little extra than run short on site.
pub fn ceil_quantity(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(QUANTITY_SCALE, RoundingStrategy::ToPositiveInfinity)
}

/// Ensures `quantity` is strictly positive.
pub fn ensure_positive_quantity(quantity: Decimal) -> Result<Decimal, DomainError> {
    if quantity > Decimal::ZERO {
        Ok(quantity)
    } else {
        Err(DomainError::InvalidQuantity(quantity))
    }
}

/// `quantity × factor`, rejected when it overflows or passes [`MAX_AMOUNT`].
pub fn checked_product(quantity: Decimal, factor: Decimal) -> Result<Decimal, DomainError> {
    quantity
        .checked_mul(factor)
        .filter(|product| product.abs() <= MAX_AMOUNT)
        .ok_or(DomainError::AmountOverflow { quantity, factor })
}

/// Ensures `value` is zero or greater.
pub fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value < Decimal::ZERO {
        Err(DomainError::NegativeAmount { field, value })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ceil_quantity_never_rounds_down() {
        assert_eq!(ceil_quantity(dec!(0.999)), dec!(1.00));
        assert_eq!(ceil_quantity(dec!(1.001)), dec!(1.01));
        assert_eq!(ceil_quantity(dec!(0.1)), dec!(0.10));
        assert_eq!(ceil_quantity(dec!(5)), dec!(5));
    }

    #[test]
    fn round_money_uses_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(2.344)), dec!(2.34));
    }

    #[test]
    fn quantity_guard_rejects_zero_and_negative() {
        assert!(ensure_positive_quantity(dec!(0)).is_err());
        assert!(ensure_positive_quantity(dec!(-1)).is_err());
        assert_eq!(ensure_positive_quantity(dec!(0.5)), Ok(dec!(0.5)));
    }
}

//! Payment schedule installments and their derived values.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{common::*, DomainError};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A named share of the quote total, expressed as a percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "InstallmentRecord")]
pub struct PaymentInstallment {
    pub description: String,
    percentage: Decimal,
}

impl PaymentInstallment {
    pub fn new(description: impl Into<String>, percentage: Decimal) -> Result<Self, DomainError> {
        Ok(Self {
            description: description.into(),
            percentage: ensure_percentage(percentage)?,
        })
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    pub fn set_percentage(&mut self, percentage: Decimal) -> Result<(), DomainError> {
        self.percentage = ensure_percentage(percentage)?;
        Ok(())
    }

    /// Value of this installment against `total`, rounded to cents.
    pub fn value_for(&self, total: Decimal) -> Decimal {
        round_money(total * self.percentage / ONE_HUNDRED)
    }

    pub fn materialize(&self, total: Decimal) -> MaterializedInstallment {
        MaterializedInstallment {
            description: self.description.clone(),
            percentage: self.percentage,
            value: self.value_for(total),
        }
    }
}

impl NamedEntity for PaymentInstallment {
    fn name(&self) -> &str {
        &self.description
    }
}

/// Installment paired with the value computed from the current total.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterializedInstallment {
    pub description: String,
    pub percentage: Decimal,
    pub value: Decimal,
}

impl Amounted for MaterializedInstallment {
    fn amount(&self) -> Decimal {
        self.value
    }
}

/// Advisory summary of a payment schedule's percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentScheduleStatus {
    pub total_percentage: Decimal,
    pub balanced: bool,
}

impl PaymentScheduleStatus {
    pub fn of(installments: &[PaymentInstallment]) -> Self {
        let total_percentage: Decimal = installments.iter().map(|p| p.percentage).sum();
        Self {
            total_percentage,
            balanced: total_percentage == ONE_HUNDRED,
        }
    }
}

/// Entrada 30% / Após 15 dias 40% / Na entrega final 30%.
pub fn default_payment_schedule() -> Vec<PaymentInstallment> {
    vec![
        PaymentInstallment {
            description: "Entrada (início da obra)".into(),
            percentage: Decimal::from(30),
        },
        PaymentInstallment {
            description: "Após 15 dias de trabalho".into(),
            percentage: Decimal::from(40),
        },
        PaymentInstallment {
            description: "Na entrega final".into(),
            percentage: Decimal::from(30),
        },
    ]
}

#[derive(Deserialize)]
struct InstallmentRecord {
    description: String,
    percentage: Decimal,
}

impl TryFrom<InstallmentRecord> for PaymentInstallment {
    type Error = DomainError;

    fn try_from(record: InstallmentRecord) -> Result<Self, Self::Error> {
        Self::new(record.description, record.percentage)
    }
}

fn ensure_percentage(value: Decimal) -> Result<Decimal, DomainError> {
    if value < Decimal::ZERO || value > ONE_HUNDRED {
        Err(DomainError::PercentageOutOfRange(value))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn value_tracks_total() {
        let installment = PaymentInstallment::new("Entrada", dec!(30)).unwrap();
        assert_eq!(installment.value_for(dec!(1000)), dec!(300.00));
        assert_eq!(installment.value_for(dec!(2000)), dec!(600.00));
        assert_eq!(installment.value_for(dec!(0.05)), dec!(0.02));
    }

    #[test]
    fn percentage_bounds_are_enforced() {
        assert!(PaymentInstallment::new("a", dec!(100)).is_ok());
        assert!(PaymentInstallment::new("a", dec!(0)).is_ok());
        assert_eq!(
            PaymentInstallment::new("a", dec!(100.5)),
            Err(DomainError::PercentageOutOfRange(dec!(100.5)))
        );
        assert!(PaymentInstallment::new("a", dec!(-1)).is_err());
    }

    #[test]
    fn default_schedule_is_balanced() {
        let status = PaymentScheduleStatus::of(&default_payment_schedule());
        assert!(status.balanced);
        assert_eq!(status.total_percentage, dec!(100));
    }

    #[test]
    fn unbalanced_schedule_is_reported_not_rejected() {
        let schedule = vec![
            PaymentInstallment::new("Entrada", dec!(50)).unwrap(),
            PaymentInstallment::new("Final", dec!(30)).unwrap(),
        ];
        let status = PaymentScheduleStatus::of(&schedule);
        assert!(!status.balanced);
        assert_eq!(status.total_percentage, dec!(80));
    }
}

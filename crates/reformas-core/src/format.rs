use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Formats quantities and percentages for presentation.
pub trait QuantityFormatter: Send + Sync {
    fn format_quantity(&self, value: Decimal) -> String;

    fn format_percentage(&self, value: Decimal) -> String {
        format!("{}%", self.format_quantity(value))
    }
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

//! Locale-aware display formatting for money, quantities, percentages and dates.

use chrono::NaiveDate;
use reformas_core::{CurrencyFormatter, DateFormatter, QuantityFormatter};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Non-breaking space placed between a currency symbol and the amount.
pub const NBSP: char = '\u{a0}';

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("BRL")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    /// `31/12/2024`
    DayMonthYear,
    /// `12/31/2024`
    MonthDayYear,
    /// `2024-12-31`
    Iso,
}

/// Separators and date layout for one locale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl LocaleConfig {
    pub fn pt_br() -> Self {
        Self {
            language_tag: "pt-BR".into(),
            decimal_separator: ',',
            grouping_separator: '.',
            date_format: DateFormatStyle::DayMonthYear,
        }
    }

    pub fn en_us() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::MonthDayYear,
        }
    }

    /// Preset for a BCP 47 tag; unknown tags fall back to `pt-BR`.
    pub fn for_tag(tag: &str) -> Self {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" | "en" => Self::en_us(),
            _ => Self::pt_br(),
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::pt_br()
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "BRL" => "R$".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Formats `value` with exactly `precision` decimals, rounding half away from zero.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    localize(locale, &rounded.abs().to_string(), rounded.is_sign_negative() && !rounded.is_zero())
}

/// Formats a quantity with up to two decimals, dropping trailing zeros (`2,5`, `10`).
pub fn format_quantity(locale: &LocaleConfig, value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    localize(locale, &rounded.abs().to_string(), rounded.is_sign_negative() && !rounded.is_zero())
}

pub fn format_percentage(locale: &LocaleConfig, value: Decimal) -> String {
    format!("{}%", format_quantity(locale, value))
}

/// `R$ 1.234,56` for pt-BR/BRL, `$1,234.56` for en-US/USD.
pub fn format_currency_value(amount: Decimal, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let body = format_number(locale, amount.abs(), minor_units_for(code.as_str()));
    let symbol = symbol_for(code.as_str());
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    if locale.decimal_separator == ',' || symbol.chars().count() > 1 {
        format!("{sign}{symbol}{NBSP}{body}")
    } else {
        format!("{sign}{symbol}{body}")
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::DayMonthYear => date.format("%d/%m/%Y").to_string(),
        DateFormatStyle::MonthDayYear => date.format("%m/%d/%Y").to_string(),
        DateFormatStyle::Iso => date.format("%Y-%m-%d").to_string(),
    }
}

fn localize(locale: &LocaleConfig, plain: &str, negative: bool) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (plain, None),
    };
    let mut body = group_digits(int_part, locale.grouping_separator);
    if let Some(frac) = frac_part {
        body.push(locale.decimal_separator);
        body.push_str(frac);
    }
    if negative {
        body.insert(0, '-');
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Locale plus currency, implementing the presentation traits used by the document.
#[derive(Debug, Clone, PartialEq)]
pub struct LocaleFormatter {
    pub locale: LocaleConfig,
    pub currency: CurrencyCode,
}

impl LocaleFormatter {
    pub fn new(locale: LocaleConfig, currency: CurrencyCode) -> Self {
        Self { locale, currency }
    }

    /// Builds a formatter from `{locale, currency}` settings such as `pt-BR` / `BRL`.
    pub fn from_settings(locale: &str, currency: &str) -> Self {
        Self::new(LocaleConfig::for_tag(locale), CurrencyCode::new(currency))
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::new(LocaleConfig::pt_br(), CurrencyCode::default())
    }
}

impl CurrencyFormatter for LocaleFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        format_currency_value(amount, &self.currency, &self.locale)
    }
}

impl QuantityFormatter for LocaleFormatter {
    fn format_quantity(&self, value: Decimal) -> String {
        format_quantity(&self.locale, value)
    }
}

impl DateFormatter for LocaleFormatter {
    fn format_date(&self, date: NaiveDate) -> String {
        format_date(&self.locale, date)
    }
}

use chrono::NaiveDate;
use pg_reformas::currency::{
    format_currency_value, format_number, format_quantity, CurrencyCode, LocaleConfig,
    LocaleFormatter, NBSP,
};
use reformas_core::{CurrencyFormatter, DateFormatter, QuantityFormatter};
use rust_decimal_macros::dec;

#[test]
fn formats_brazilian_reais() {
    let locale = LocaleConfig::pt_br();
    let code = CurrencyCode::new("BRL");
    assert_eq!(
        format_currency_value(dec!(1234.56), &code, &locale),
        format!("R${NBSP}1.234,56")
    );
    assert_eq!(
        format_currency_value(dec!(0.005), &code, &locale),
        format!("R${NBSP}0,01")
    );
    assert_eq!(
        format_currency_value(dec!(-1500), &code, &locale),
        format!("-R${NBSP}1.500,00")
    );
}

#[test]
fn formats_us_dollars() {
    let formatter = LocaleFormatter::from_settings("en-US", "USD");
    assert_eq!(formatter.format_amount(dec!(1234.5)), "$1,234.50");
    assert_eq!(
        formatter.format_date(NaiveDate::from_ymd_opt(2024, 3, 15).expect("date")),
        "03/15/2024"
    );
}

#[test]
fn quantities_drop_trailing_zeros() {
    let locale = LocaleConfig::pt_br();
    assert_eq!(format_quantity(&locale, dec!(2.50)), "2,5");
    assert_eq!(format_quantity(&locale, dec!(10)), "10");
    assert_eq!(format_quantity(&locale, dec!(1234.567)), "1.234,57");
    assert_eq!(format_number(&locale, dec!(2.5), 2), "2,50");
}

#[test]
fn default_formatter_is_brazilian() {
    let formatter = LocaleFormatter::default();
    assert_eq!(
        formatter.format_date(NaiveDate::from_ymd_opt(2024, 3, 15).expect("date")),
        "15/03/2024"
    );
    assert_eq!(formatter.format_percentage(dec!(30)), "30%");
    assert_eq!(formatter.format_quantity(dec!(0.3)), "0,3");
}

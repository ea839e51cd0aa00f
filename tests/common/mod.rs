#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use pg_reformas::catalog::seed_catalog;
use reformas_core::{BudgetAggregator, ServiceCatalog};
use reformas_domain::{ClientInfo, ProjectInfo, Quote, QuoteDefaults};
use reformas_storage_json::{JsonQuoteStorage, StoragePaths};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated JSON quote store keeping `retention` backups per quote.
pub fn setup_store(retention: usize) -> (JsonQuoteStorage, PathBuf) {
    let base = temp_home();
    let paths = StoragePaths {
        quote_root: base.join("quotes"),
        backup_root: base.join("backups"),
    };
    let store = JsonQuoteStorage::with_retention(paths, retention).expect("create json quote store");
    (store, base)
}

pub fn catalog() -> &'static ServiceCatalog {
    seed_catalog().expect("seed catalog parses")
}

/// Client and project filled in, no items yet. Dates are pinned for stable output.
pub fn blank_quote(number: &str) -> BudgetAggregator {
    let mut aggregator = BudgetAggregator::create(number, &QuoteDefaults::default());
    aggregator.set_client(Some(
        ClientInfo::new("client-1", "Maria Silva")
            .with_phone("(51) 98888-7777")
            .with_address("Av. Ipiranga, 1000"),
    ));
    aggregator.set_project(ProjectInfo::new("Reforma do apartamento", "Apto 302"));
    pin_dates(aggregator)
}

/// Painting (10 m²) plus electrical points (2): 180 + 240.
pub fn sample_quote(number: &str) -> BudgetAggregator {
    let mut aggregator = blank_quote(number);
    aggregator
        .add_item_by_id(catalog(), "2", Decimal::from(10))
        .expect("painting");
    aggregator
        .add_item_by_id(catalog(), "3", Decimal::from(2))
        .expect("electrical");
    aggregator
}

fn pin_dates(aggregator: BudgetAggregator) -> BudgetAggregator {
    let mut quote: Quote = aggregator.into_quote();
    let created = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
    quote.created_at = Utc.from_utc_datetime(&created.and_hms_opt(9, 0, 0).expect("time"));
    quote.valid_until = NaiveDate::from_ymd_opt(2024, 4, 14).expect("date");
    BudgetAggregator::new(quote)
}

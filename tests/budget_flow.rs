mod common;

use pg_reformas::init;
use reformas_core::{
    parse_quantity_lenient, quote_warnings, BudgetAggregator, CoreError, InstallmentChanges,
    QuoteFilter, QuoteIndexService, QuoteStore,
};
use reformas_domain::QuoteStatus;
use rust_decimal_macros::dec;

#[test]
fn painting_quote_grows_and_reschedules_payments() {
    init();
    let (store, _) = common::setup_store(3);
    let catalog = common::catalog();

    let mut aggregator = common::blank_quote("ORC-2024-001");
    let painting = aggregator
        .add_item_by_id(catalog, "2", dec!(10))
        .expect("add painting");
    assert_eq!(aggregator.compute_totals().total, dec!(180));

    let materials = aggregator.quote().item(painting).expect("item").materials();
    let quantities: Vec<_> = materials.iter().map(|m| m.quantity).collect();
    assert_eq!(quantities, vec![dec!(2), dec!(3), dec!(1)]);

    aggregator
        .update_item_quantity(painting, dec!(15.5))
        .expect("update quantity");
    let materials = aggregator.quote().item(painting).expect("item").materials();
    assert_eq!(materials[0].quantity, dec!(3.1));
    assert_eq!(materials[2].quantity, dec!(1.55));
    assert_eq!(aggregator.compute_totals().total, dec!(279));

    aggregator
        .update_item_quantity(painting, dec!(10))
        .expect("restore quantity");
    aggregator
        .add_item_by_id(catalog, "7", dec!(0.5))
        .expect("add labour");
    assert_eq!(aggregator.compute_totals().total, dec!(280));

    aggregator
        .update_installment(
            0,
            InstallmentChanges {
                percentage: Some(dec!(50)),
                ..Default::default()
            },
        )
        .expect("update installment");
    let installments = aggregator.materialize_installments();
    assert_eq!(installments[0].value, dec!(140));
    assert!(!aggregator.payment_status().balanced);

    aggregator.save(&store, "ORC-2024-001").expect("save");
    let reloaded = BudgetAggregator::load(&store, "ORC-2024-001").expect("load");
    assert_eq!(reloaded.compute_totals().total, dec!(280));
    assert_eq!(reloaded.materialize_installments()[0].value, dec!(140));
    assert!(quote_warnings(reloaded.quote())
        .iter()
        .any(|warning| warning.contains("120")));
}

#[test]
fn failed_updates_leave_quote_untouched() {
    let mut aggregator = common::sample_quote("ORC-2024-002");
    let before = aggregator.quote().clone();
    let first = aggregator.items()[0].id;

    let err = aggregator
        .update_item_quantity(first, dec!(0))
        .expect_err("zero quantity");
    assert!(matches!(err, CoreError::InvalidQuantity(_)));

    let err = aggregator
        .add_item_by_id(common::catalog(), "99", dec!(1))
        .expect_err("unknown service");
    assert!(err.is_not_found());

    let err = aggregator
        .update_installment(
            1,
            InstallmentChanges {
                description: Some("Nova".into()),
                percentage: Some(dec!(-5)),
            },
        )
        .expect_err("negative percentage");
    assert!(matches!(err, CoreError::Validation(_)));

    assert_eq!(aggregator.quote(), &before);
}

#[test]
fn lenient_quantity_input_falls_back_to_one() {
    assert_eq!(parse_quantity_lenient("2,5"), dec!(2.5));
    assert_eq!(parse_quantity_lenient("abc"), dec!(1));
    assert_eq!(parse_quantity_lenient("-3"), dec!(1));
}

#[test]
fn quote_list_numbers_filters_and_tracks_status() {
    let (store, _) = common::setup_store(2);

    let mut first = common::sample_quote("ORC-2024-001");
    first.save(&store, "ORC-2024-001").expect("save first");
    let mut second = common::blank_quote("ORC-2024-007");
    second.set_client(Some(reformas_domain::ClientInfo::new("c-2", "Carlos Souza")));
    second
        .add_item_by_id(common::catalog(), "6", dec!(4))
        .expect("demolition");
    second.save(&store, "ORC-2024-007").expect("save second");

    let summaries = QuoteIndexService::summaries(&store).expect("summaries");
    assert_eq!(summaries.len(), 2);
    assert_eq!(
        QuoteIndexService::next_number(&summaries, 2024),
        "ORC-2024-008"
    );
    assert_eq!(
        QuoteIndexService::next_number(&summaries, 2025),
        "ORC-2025-001"
    );

    let filter = QuoteFilter {
        search: "carlos".into(),
        status: None,
    };
    let found = QuoteIndexService::filter(&summaries, &filter);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].value, dec!(140));

    QuoteIndexService::change_status(&store, "ORC-2024-001", QuoteStatus::Sent)
        .expect("send");
    QuoteIndexService::change_status(&store, "ORC-2024-007", QuoteStatus::Approved)
        .expect("approve");
    let summaries = QuoteIndexService::summaries(&store).expect("summaries");
    let stats = QuoteIndexService::stats(&summaries);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.total_value, dec!(560));

    QuoteIndexService::delete(&store, "ORC-2024-001").expect("delete");
    assert!(store.load("ORC-2024-001").expect("load").is_none());
    let err = QuoteIndexService::delete(&store, "ORC-2024-001").expect_err("already gone");
    assert!(err.is_not_found());
}

use rust_decimal_macros::dec;

use crate::{quote_warnings, BudgetAggregator, CatalogResolver, InMemoryQuoteStore, QuoteStore};
use reformas_domain::{
    ClientInfo, MaterialInstance, MaterialTemplate, ProjectInfo, Quote, QuoteDefaults,
    ServiceCatalogEntry,
};

fn pintura() -> ServiceCatalogEntry {
    ServiceCatalogEntry::new("pintura", "Pintura", "m²", dec!(18))
        .expect("entry")
        .with_material(MaterialTemplate::new("Tinta", "litro", dec!(0.2)).expect("template"))
}

fn empty_schedule() -> QuoteDefaults {
    QuoteDefaults {
        payment_schedule: Vec::new(),
        ..QuoteDefaults::default()
    }
}

#[test]
fn painting_scenario_end_to_end() {
    let mut agg = BudgetAggregator::new(Quote::new("ORC-2024-010", &empty_schedule()));

    let id = agg.add_item(&pintura(), dec!(10)).expect("add painting");
    let item = agg.quote().item(id).expect("item exists");
    assert_eq!(item.quantity(), dec!(10));
    assert_eq!(item.unit_price(), dec!(18));
    assert_eq!(item.total(), dec!(180));
    assert_eq!(
        item.materials(),
        &[MaterialInstance {
            name: "Tinta".into(),
            unit: "litro".into(),
            quantity: dec!(2.00),
        }]
    );

    let outlet = ServiceCatalogEntry::new("tomada", "Tomada", "un", dec!(50)).expect("entry");
    agg.add_item(&outlet, dec!(2)).expect("add outlet");
    assert_eq!(agg.compute_totals().total, dec!(280));

    agg.add_installment("Metade", dec!(50)).expect("installment");
    assert_eq!(agg.materialize_installments()[0].value, dec!(140.00));
}

#[test]
fn totals_match_line_items_after_each_step() {
    let mut agg = BudgetAggregator::create("ORC-2024-011", &QuoteDefaults::default());
    let check = |agg: &BudgetAggregator| {
        let sum: rust_decimal::Decimal = agg.items().iter().map(|i| i.total()).sum();
        assert_eq!(agg.compute_totals().total, sum);
        for item in agg.items() {
            assert_eq!(item.total(), item.quantity() * item.unit_price());
        }
    };

    let a = agg.add_item(&pintura(), dec!(12.5)).expect("add");
    check(&agg);
    let b = agg.add_item(&pintura(), dec!(3)).expect("add");
    check(&agg);
    agg.update_item_quantity(a, dec!(0.75)).expect("update");
    check(&agg);
    agg.remove_item(b).expect("remove");
    check(&agg);
}

#[test]
fn resolver_matches_aggregator_output() {
    let resolved = CatalogResolver::resolve(&pintura(), dec!(4)).expect("resolve");
    let mut agg = BudgetAggregator::create("ORC-2024-012", &QuoteDefaults::default());
    let id = agg.add_item(&pintura(), dec!(4)).expect("add");
    assert_eq!(
        agg.quote().item(id).expect("item").materials(),
        resolved.materials()
    );
}

#[test]
fn store_round_trip_keeps_quote_intact() {
    let store = InMemoryQuoteStore::new();
    let mut agg = BudgetAggregator::create("ORC-2024-013", &QuoteDefaults::default());
    agg.set_client(Some(ClientInfo::new("c1", "Carlos").with_phone("(11) 99999-0000")));
    agg.set_project(ProjectInfo::new("Sala", "Rua das Flores, 10"));
    agg.add_item(&pintura(), dec!(7.3)).expect("add");
    agg.generate_execution_schedule();
    agg.save(&store, "ORC-2024-013").expect("save");

    let json = store.snapshot("ORC-2024-013").expect("read").expect("present");
    assert!(json.contains("\"unitPrice\":18"));
    assert!(!json.contains("\"unitPrice\":\"18\""));

    let reloaded = BudgetAggregator::load(&store, "ORC-2024-013").expect("load");
    assert_eq!(reloaded.quote(), agg.quote());
    assert!(store.list().expect("list").contains(&"ORC-2024-013".to_string()));

    let missing = BudgetAggregator::load(&store, "nope").unwrap_err();
    assert!(missing.is_not_found());
}

#[test]
fn warnings_flag_incomplete_quotes() {
    let quote = Quote::new("ORC-2024-014", &empty_schedule());
    let warnings = quote_warnings(&quote);
    assert!(warnings.iter().any(|w| w.contains("no client")));
    assert!(warnings.iter().any(|w| w.contains("no items")));
    assert!(warnings.iter().any(|w| w.contains("sums to 0%")));

    let mut agg = BudgetAggregator::create("ORC-2024-015", &QuoteDefaults::default());
    agg.set_client(Some(ClientInfo::new("c", "Ana")));
    agg.add_item(&pintura(), dec!(1)).expect("add");
    assert!(quote_warnings(agg.quote()).is_empty());
}

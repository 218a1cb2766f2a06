/// End-to-end dashboard tests.
///
/// Drives the session the way the frontend does (click batches followed by
/// signal-reset echoes) and checks the rendered KPIs, charts, and status line.
use serde_json::json;
use salesboard::analytics::Journal;
use salesboard::config::SalesboardConfig;
use salesboard::data::{CanonicalTable, OrderLine};
use salesboard::engine::{self, DashboardView, IgnoreSet, Kpis};
use salesboard::filter::machine::EventBatch;
use salesboard::filter::{Dimension, FilterState};
use salesboard::render::{self, RenderedDashboard};
use salesboard::web::{EventOutcome, Session};

fn line(order: &str, sub: &str, state: &str, customer: &str, amount: f64, profit: f64) -> OrderLine {
    OrderLine {
        order_id: order.to_string(),
        sub_category: sub.to_string(),
        state: state.to_string(),
        customer: customer.to_string(),
        amount,
        profit,
        quantity: 1,
    }
}

fn chairs_and_tables() -> CanonicalTable {
    CanonicalTable::from_rows(vec![
        line("1", "Chairs", "CA", "Alice", 100.0, 10.0),
        line("2", "Tables", "CA", "Bob", 200.0, 20.0),
    ])
}

fn updated(outcome: EventOutcome) -> RenderedDashboard {
    match outcome {
        EventOutcome::Updated { dashboard, .. } => dashboard,
        EventOutcome::Skipped => panic!("expected an update"),
    }
}

fn click_sub_category(label: &str) -> EventBatch {
    EventBatch::click(
        Dimension::SubCategory,
        json!({ "points": [{ "x": 1.0, "y": label }] }),
    )
}

// ===========================================================================
// Worked example
// ===========================================================================

#[test]
fn clicking_chairs_twice_filters_then_restores() {
    let table = chairs_and_tables();
    let config = SalesboardConfig::default();
    let mut session = Session::new(&table, &config, Journal::disabled());

    let initial = updated(session.handle(&EventBatch::initial()));
    assert_eq!(initial.kpis.amount, "$300");

    let filtered = updated(session.handle(&click_sub_category("Chairs")));
    assert_eq!(filtered.kpis.amount, "$100");
    let state = filtered.chart(Dimension::State).unwrap();
    assert_eq!(state.bars().len(), 1);
    assert_eq!(state.bars()[0].label, "CA");
    assert_eq!(state.bars()[0].value, 100.0);
    assert_eq!(
        filtered.status,
        "Filters | Sub-Cat: Chairs | State: All | Customer: All"
    );

    // The frontend reports the signal reset; nothing changes.
    assert_eq!(
        session.handle(&EventBatch::echo(Dimension::SubCategory)),
        EventOutcome::Skipped
    );

    let restored = updated(session.handle(&click_sub_category("Chairs")));
    assert_eq!(restored.kpis.amount, "$300");
    assert_eq!(
        restored.status,
        "Filters | Sub-Cat: All | State: All | Customer: All"
    );
}

#[test]
fn own_chart_keeps_context_while_filtered() {
    let table = chairs_and_tables();
    let config = SalesboardConfig::default();
    let mut session = Session::new(&table, &config, Journal::disabled());

    let dashboard = updated(session.handle(&click_sub_category("Chairs")));
    let sub = dashboard.chart(Dimension::SubCategory).unwrap();
    let labels: Vec<&str> = sub.bars().iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Tables", "Chairs"]);

    let chairs = sub.bars().iter().find(|b| b.label == "Chairs").unwrap();
    let tables = sub.bars().iter().find(|b| b.label == "Tables").unwrap();
    assert!(chairs.highlighted);
    assert_eq!(chairs.color, "#764ba2");
    assert!(!tables.highlighted);
    assert_eq!(tables.color, "#e0e0e0");
}

// ===========================================================================
// Aggregation properties
// ===========================================================================

#[test]
fn kpis_are_zero_when_nothing_matches() {
    let table = chairs_and_tables();
    let filters = FilterState::default()
        .toggled(Dimension::SubCategory, "Chairs")
        .toggled(Dimension::Customer, "Bob");

    let view = DashboardView::compute(&table, &filters, 6);
    assert_eq!(view.kpis, Kpis::default());

    let rendered = render::render(&view, &SalesboardConfig::default().charts);
    assert_eq!(rendered.kpis.amount, "$0");
    assert_eq!(rendered.kpis.profit, "$0");
    assert_eq!(rendered.kpis.quantity, "0");
    assert_eq!(rendered.kpis.orders, "0");
}

#[test]
fn conflicting_filters_leave_other_charts_empty() {
    let table = chairs_and_tables();
    let filters = FilterState::default()
        .toggled(Dimension::SubCategory, "Chairs")
        .toggled(Dimension::Customer, "Bob");

    let view = DashboardView::compute(&table, &filters, 6);
    // Sub-category ignores its own filter: Bob bought Tables.
    assert_eq!(view.sub_category.groups().len(), 1);
    assert_eq!(view.sub_category.groups()[0].key, "Tables");
    // State sees both filters and nothing survives.
    assert!(view.state.is_no_data());

    let rendered = render::render(&view, &SalesboardConfig::default().charts);
    assert!(rendered.chart(Dimension::State).unwrap().is_no_data());
}

#[test]
fn chart_summary_ignores_only_its_own_filter() {
    let table = CanonicalTable::from_rows(vec![
        line("1", "Chairs", "CA", "Alice", 100.0, 10.0),
        line("2", "Tables", "NY", "Alice", 50.0, 5.0),
        line("3", "Chairs", "NY", "Bob", 70.0, 7.0),
    ]);
    let filters = FilterState::default()
        .toggled(Dimension::State, "NY")
        .toggled(Dimension::Customer, "Alice");

    let manual = engine::filtered(&table, &filters, IgnoreSet::only(Dimension::State));
    let summary = engine::top_groups(&table, &filters, Dimension::State, 6);
    let keys: Vec<&str> = summary.groups().iter().map(|g| g.key.as_str()).collect();

    assert_eq!(manual.len(), 2);
    assert_eq!(keys, vec!["CA", "NY"]);
}

#[test]
fn customer_chart_keeps_top_six_by_amount() {
    let rows = (0..9)
        .map(|i| {
            line(
                &i.to_string(),
                "Phones",
                "TX",
                &format!("Customer {i}"),
                (i * 10) as f64,
                1.0,
            )
        })
        .collect();
    let table = CanonicalTable::from_rows(rows);

    let view = DashboardView::compute(&table, &FilterState::default(), 6);
    let keys: Vec<&str> = view.customer.groups().iter().map(|g| g.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "Customer 8",
            "Customer 7",
            "Customer 6",
            "Customer 5",
            "Customer 4",
            "Customer 3"
        ]
    );
    assert_eq!(view.kpis.orders, 9);
}

// ===========================================================================
// Clear and malformed input
// ===========================================================================

#[test]
fn clear_resets_every_dimension() {
    let table = chairs_and_tables();
    let config = SalesboardConfig::default();
    let mut session = Session::new(&table, &config, Journal::disabled());

    session.handle(&click_sub_category("Tables"));
    session.handle(&EventBatch::click(
        Dimension::Customer,
        json!({ "points": [{ "x": "Bob", "y": 200 }] }),
    ));
    assert!(!session.filters().is_unfiltered());

    let cleared = updated(session.handle(&EventBatch::clear()));
    assert!(session.filters().is_unfiltered());
    assert_eq!(cleared.kpis.amount, "$300");

    // Clearing twice is the same as clearing once.
    let again = updated(session.handle(&EventBatch::clear()));
    assert_eq!(again, cleared);
}

#[test]
fn malformed_click_leaves_filters_unchanged() {
    let table = chairs_and_tables();
    let config = SalesboardConfig::default();
    let mut session = Session::new(&table, &config, Journal::disabled());

    session.handle(&click_sub_category("Chairs"));
    let before = session.filters().clone();

    let outcome = session.handle(&EventBatch::click(Dimension::State, json!({ "points": [] })));
    let EventOutcome::Updated { signals, dashboard } = outcome else {
        panic!("expected an update");
    };
    assert_eq!(session.filters(), &before);
    assert_eq!(dashboard.filters, before);
    assert!(signals.all_absent());
}

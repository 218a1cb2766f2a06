//! The single dashboard session driven by the web server.
//!
//! Holds the canonical table (borrowed, read-only) and the current filter
//! snapshot. Each event batch runs the filter state machine, swaps in the
//! new snapshot, and re-renders every view from scratch.

use crate::analytics::{FilterEvent, Journal};
use crate::config::{LogLevel, SalesboardConfig};
use crate::data::CanonicalTable;
use crate::engine::DashboardView;
use crate::filter::FilterState;
use crate::filter::machine::{self, ChartSignals, EventBatch, Transition};
use crate::render::{self, RenderedDashboard};

/// Result of one event batch.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Echo of a signal reset; nothing changed and nothing was rendered.
    Skipped,
    Updated {
        signals: ChartSignals,
        dashboard: RenderedDashboard,
    },
}

pub struct Session<'a> {
    table: &'a CanonicalTable,
    config: &'a SalesboardConfig,
    journal: Journal,
    filters: FilterState,
}

impl<'a> Session<'a> {
    pub fn new(table: &'a CanonicalTable, config: &'a SalesboardConfig, journal: Journal) -> Self {
        Self {
            table,
            config,
            journal,
            filters: FilterState::default(),
        }
    }

    pub fn table(&self) -> &CanonicalTable {
        self.table
    }

    pub fn config(&self) -> &SalesboardConfig {
        self.config
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Render the current snapshot.
    pub fn render(&self) -> RenderedDashboard {
        let view = DashboardView::compute(self.table, &self.filters, self.config.charts.top_n);
        render::render(&view, &self.config.charts)
    }

    /// Process one event batch from the frontend.
    pub fn handle(&mut self, batch: &EventBatch) -> EventOutcome {
        let transition = machine::process(&self.filters, batch);
        self.journal
            .record(&FilterEvent::new(batch, &self.filters, &transition));

        match transition {
            Transition::Skip => {
                if self.config.logging.allows(LogLevel::Debug) {
                    println!("  event skipped (signal reset)");
                }
                EventOutcome::Skipped
            }
            Transition::Update {
                filters,
                signals,
                cause,
            } => {
                if self.config.logging.allows(LogLevel::Debug) {
                    println!("  event {cause}: {}", filters.status_line());
                }
                self.filters = filters;
                EventOutcome::Updated {
                    signals,
                    dashboard: self.render(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::data::OrderLine;
    use crate::filter::Dimension;

    fn table() -> CanonicalTable {
        let line = |order: &str, sub: &str, state: &str, cust: &str, amount: f64| OrderLine {
            order_id: order.to_string(),
            sub_category: sub.to_string(),
            state: state.to_string(),
            customer: cust.to_string(),
            amount,
            profit: amount / 10.0,
            quantity: 1,
        };
        CanonicalTable::from_rows(vec![
            line("1", "Chairs", "CA", "Alice", 100.0),
            line("2", "Tables", "CA", "Bob", 200.0),
        ])
    }

    fn dashboard(outcome: EventOutcome) -> RenderedDashboard {
        match outcome {
            EventOutcome::Updated { dashboard, .. } => dashboard,
            EventOutcome::Skipped => panic!("expected update"),
        }
    }

    #[test]
    fn click_then_echo_then_repeat_click() {
        let table = table();
        let config = SalesboardConfig::default();
        let mut session = Session::new(&table, &config, Journal::disabled());
        let click = EventBatch::click(
            Dimension::SubCategory,
            json!({ "points": [{ "x": 10.0, "y": "Chairs" }] }),
        );

        let first = dashboard(session.handle(&click));
        assert_eq!(first.kpis.amount, "$100");

        assert_eq!(
            session.handle(&EventBatch::echo(Dimension::SubCategory)),
            EventOutcome::Skipped
        );
        assert_eq!(session.filters().sub_category.as_value(), Some("Chairs"));

        let second = dashboard(session.handle(&click));
        assert_eq!(second.kpis.amount, "$300");
        assert!(session.filters().is_unfiltered());
    }

    #[test]
    fn updates_always_reset_signals() {
        let table = table();
        let config = SalesboardConfig::default();
        let mut session = Session::new(&table, &config, Journal::disabled());

        let outcome = session.handle(&EventBatch::click(
            Dimension::State,
            json!({ "points": [{ "x": "CA" }] }),
        ));
        let EventOutcome::Updated { signals, .. } = outcome else {
            panic!("expected update");
        };
        assert!(signals.all_absent());
    }
}

//! Aggregation engine — pure views over the canonical table.
//!
//! Every chart is computed from the rows that pass all active filters
//! *except its own dimension's*, so the clicked chart keeps showing the
//! alternatives next to the highlighted selection. KPIs use every filter.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::data::{CanonicalTable, OrderLine};
use crate::filter::{Dimension, FilterState};

// ---------------------------------------------------------------------------
// Ignore-set filtering
// ---------------------------------------------------------------------------

/// Dimensions whose active filter is skipped when selecting rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreSet(u8);

impl IgnoreSet {
    pub const NONE: IgnoreSet = IgnoreSet(0);

    pub fn only(dimension: Dimension) -> Self {
        Self(dimension.bit())
    }

    pub fn with(self, dimension: Dimension) -> Self {
        Self(self.0 | dimension.bit())
    }

    pub fn contains(self, dimension: Dimension) -> bool {
        self.0 & dimension.bit() != 0
    }
}

/// Rows matching every active filter whose dimension is not in `ignore`.
pub fn filtered<'a>(
    table: &'a CanonicalTable,
    filters: &FilterState,
    ignore: IgnoreSet,
) -> Vec<&'a OrderLine> {
    let active: Vec<(Dimension, &str)> = Dimension::ALL
        .into_iter()
        .filter(|&d| !ignore.contains(d))
        .filter_map(|d| filters.get(d).as_value().map(|v| (d, v)))
        .collect();

    table
        .rows()
        .iter()
        .filter(|row| active.iter().all(|&(d, v)| d.key(row) == v))
        .collect()
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline totals of the fully filtered rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub amount: f64,
    pub profit: f64,
    pub quantity: i64,
    /// Distinct order ids.
    pub orders: usize,
}

impl Kpis {
    pub fn from_rows(rows: &[&OrderLine]) -> Self {
        let orders: HashSet<&str> = rows.iter().map(|r| r.order_id.as_str()).collect();
        Self {
            amount: rows.iter().map(|r| r.amount).sum(),
            profit: rows.iter().map(|r| r.profit).sum(),
            quantity: rows.iter().map(|r| r.quantity).sum(),
            orders: orders.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-N summaries
// ---------------------------------------------------------------------------

/// One bar: a group key and its summed metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// A chart's data, or the placeholder when no rows are in context.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    NoData,
    Groups(Vec<GroupTotal>),
}

impl Summary {
    pub fn groups(&self) -> &[GroupTotal] {
        match self {
            Self::NoData => &[],
            Self::Groups(groups) => groups,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Group rows by `dimension`, sum its metric, keep the `limit` largest.
///
/// Ties keep ascending key order.
pub fn summarize(rows: &[&OrderLine], dimension: Dimension, limit: usize) -> Summary {
    if rows.is_empty() {
        return Summary::NoData;
    }

    let metric = dimension.metric();
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        *totals.entry(dimension.key(row)).or_default() += metric.of(row);
    }

    let mut groups: Vec<GroupTotal> = totals
        .into_iter()
        .map(|(key, value)| GroupTotal {
            key: key.to_string(),
            value,
        })
        .collect();

    // Stable sort keeps the map's key order among equal totals
    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    groups.truncate(limit);

    Summary::Groups(groups)
}

/// The chart summary for `dimension`, ignoring only its own filter.
pub fn top_groups(
    table: &CanonicalTable,
    filters: &FilterState,
    dimension: Dimension,
    limit: usize,
) -> Summary {
    let rows = filtered(table, filters, IgnoreSet::only(dimension));
    summarize(&rows, dimension, limit)
}

// ---------------------------------------------------------------------------
// Full dashboard view
// ---------------------------------------------------------------------------

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub filters: FilterState,
    pub kpis: Kpis,
    pub sub_category: Summary,
    pub state: Summary,
    pub customer: Summary,
}

impl DashboardView {
    pub fn compute(table: &CanonicalTable, filters: &FilterState, limit: usize) -> Self {
        let rows = filtered(table, filters, IgnoreSet::NONE);
        Self {
            filters: filters.clone(),
            kpis: Kpis::from_rows(&rows),
            sub_category: top_groups(table, filters, Dimension::SubCategory, limit),
            state: top_groups(table, filters, Dimension::State, limit),
            customer: top_groups(table, filters, Dimension::Customer, limit),
        }
    }

    pub fn summary(&self, dimension: Dimension) -> &Summary {
        match dimension {
            Dimension::SubCategory => &self.sub_category,
            Dimension::State => &self.state,
            Dimension::Customer => &self.customer,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;

    fn line(order: &str, sub: &str, state: &str, cust: &str, amount: f64, profit: f64) -> OrderLine {
        OrderLine {
            order_id: order.to_string(),
            sub_category: sub.to_string(),
            state: state.to_string(),
            customer: cust.to_string(),
            amount,
            profit,
            quantity: 2,
        }
    }

    fn sample() -> CanonicalTable {
        CanonicalTable::from_rows(vec![
            line("1", "Chairs", "CA", "Alice", 100.0, 10.0),
            line("1", "Tables", "CA", "Alice", 50.0, -5.0),
            line("2", "Tables", "NY", "Bob", 200.0, 20.0),
            line("3", "Phones", "TX", "Cara", 300.0, 40.0),
        ])
    }

    fn value(s: &str) -> Selection {
        Selection::Value(s.to_string())
    }

    #[test]
    fn ignore_set_membership() {
        let set = IgnoreSet::only(Dimension::State).with(Dimension::Customer);
        assert!(set.contains(Dimension::State));
        assert!(set.contains(Dimension::Customer));
        assert!(!set.contains(Dimension::SubCategory));
        assert!(!IgnoreSet::NONE.contains(Dimension::State));
    }

    #[test]
    fn filtered_applies_all_active_dimensions() {
        let table = sample();
        let filters = FilterState::new(value("Tables"), value("CA"), Selection::All);
        let rows = filtered(&table, &filters, IgnoreSet::NONE);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 50.0);
    }

    #[test]
    fn filtered_skips_ignored_dimension() {
        let table = sample();
        let filters = FilterState::new(value("Tables"), value("CA"), Selection::All);
        let rows = filtered(&table, &filters, IgnoreSet::only(Dimension::SubCategory));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.state == "CA"));
    }

    #[test]
    fn kpis_count_distinct_orders() {
        let table = sample();
        let rows = filtered(&table, &FilterState::default(), IgnoreSet::NONE);
        let kpis = Kpis::from_rows(&rows);
        assert_eq!(kpis.amount, 650.0);
        assert_eq!(kpis.profit, 65.0);
        assert_eq!(kpis.quantity, 8);
        assert_eq!(kpis.orders, 3);
    }

    #[test]
    fn kpis_zero_on_empty() {
        assert_eq!(Kpis::from_rows(&[]), Kpis::default());
    }

    #[test]
    fn summarize_sorts_descending_by_metric() {
        let table = sample();
        let rows = filtered(&table, &FilterState::default(), IgnoreSet::NONE);

        // Sub-category sums profit
        let subs = summarize(&rows, Dimension::SubCategory, 6);
        let keys: Vec<&str> = subs.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Phones", "Tables", "Chairs"]);
        assert_eq!(subs.groups()[1].value, 15.0);

        // State sums amount
        let states = summarize(&rows, Dimension::State, 6);
        let keys: Vec<&str> = states.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["TX", "NY", "CA"]);
    }

    #[test]
    fn summarize_truncates_and_breaks_ties_by_key() {
        let rows: Vec<OrderLine> = ["G", "F", "E", "D", "C", "B", "A"]
            .iter()
            .enumerate()
            .map(|(i, s)| line(&i.to_string(), "X", s, "Z", 10.0, 1.0))
            .collect();
        let table = CanonicalTable::from_rows(rows);
        let all = filtered(&table, &FilterState::default(), IgnoreSet::NONE);

        let summary = summarize(&all, Dimension::State, 6);
        let keys: Vec<&str> = summary.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn summarize_empty_is_no_data() {
        assert!(summarize(&[], Dimension::Customer, 6).is_no_data());
    }

    #[test]
    fn own_filter_does_not_change_own_chart_rows() {
        let table = sample();
        let before = top_groups(&table, &FilterState::default(), Dimension::State, 6);
        let after = top_groups(
            &table,
            &FilterState::default().toggled(Dimension::State, "NY"),
            Dimension::State,
            6,
        );
        assert_eq!(before, after);
    }

    #[test]
    fn dashboard_view_uses_context_per_chart() {
        let table = sample();
        let filters = FilterState::default().toggled(Dimension::SubCategory, "Tables");
        let view = DashboardView::compute(&table, &filters, 6);

        assert_eq!(view.kpis.amount, 250.0);
        assert_eq!(view.kpis.orders, 2);
        // Sub-category chart still shows every sub-category
        assert_eq!(view.sub_category.groups().len(), 3);
        // State chart is narrowed by the sub-category filter
        let states: Vec<&str> = view.state.groups().iter().map(|g| g.key.as_str()).collect();
        assert_eq!(states, vec!["NY", "CA"]);
    }

    #[test]
    fn impossible_combination_yields_no_data_and_zero_kpis() {
        let table = sample();
        let filters = FilterState::new(value("Phones"), value("CA"), value("Bob"));
        let view = DashboardView::compute(&table, &filters, 6);

        assert_eq!(view.kpis, Kpis::default());
        // Ignoring customer still leaves Phones in CA: nothing
        assert!(view.customer.is_no_data());
        // Ignoring sub-category leaves CA + Bob: nothing
        assert!(view.sub_category.is_no_data());
        // Ignoring state leaves Phones + Bob: nothing
        assert!(view.state.is_no_data());
    }
}

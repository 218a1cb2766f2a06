//! The canonical in-memory sales table.
//!
//! Built once at startup by [`loader`] (or by an external provisioner through
//! [`CanonicalTable::from_rows`]) and read-only afterwards.

pub mod loader;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::filter::Dimension;

pub use loader::{load_from_readers, load_table};

/// One joined order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// Not unique: an order has one line per product.
    pub order_id: String,
    pub sub_category: String,
    pub state: String,
    pub customer: String,
    pub amount: f64,
    pub profit: f64,
    pub quantity: i64,
}

/// Row counts observed while joining the two sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub detail_rows: usize,
    pub order_rows: usize,
    pub joined_rows: usize,
    /// Line items whose order id has no header row.
    pub unmatched_details: usize,
}

/// The immutable joined dataset every view is computed from.
#[derive(Debug, Clone, Default)]
pub struct CanonicalTable {
    rows: Vec<OrderLine>,
    stats: JoinStats,
}

impl CanonicalTable {
    /// Build a table from already-joined rows, normalizing sub-categories.
    pub fn from_rows(rows: Vec<OrderLine>) -> Self {
        let len = rows.len();
        Self::with_stats(
            rows,
            JoinStats {
                detail_rows: len,
                order_rows: len,
                joined_rows: len,
                unmatched_details: 0,
            },
        )
    }

    pub(crate) fn with_stats(mut rows: Vec<OrderLine>, stats: JoinStats) -> Self {
        for row in &mut rows {
            let trimmed = row.sub_category.trim();
            if trimmed.len() != row.sub_category.len() {
                row.sub_category = trimmed.to_string();
            }
        }
        Self { rows, stats }
    }

    pub fn rows(&self) -> &[OrderLine] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn join_stats(&self) -> JoinStats {
        self.stats
    }

    /// Sorted distinct values of one dimension.
    pub fn distinct(&self, dimension: Dimension) -> Vec<&str> {
        self.rows
            .iter()
            .map(|r| dimension.key(r))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

//! Cross-filter state: the three filter dimensions and their selections.
//!
//! A [`FilterState`] is an immutable snapshot. Every interaction produces a
//! new snapshot via [`FilterState::toggled`] or [`FilterState::cleared`];
//! aggregation and rendering only ever read the snapshot they are given.

pub mod machine;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::data::OrderLine;

/// Sentinel shown for a dimension with no active filter.
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// One of the three filterable columns, each backing one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    SubCategory,
    State,
    Customer,
}

/// The summed column shown on a dimension's chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Profit,
    Amount,
}

impl Metric {
    pub fn of(self, row: &OrderLine) -> f64 {
        match self {
            Self::Profit => row.profit,
            Self::Amount => row.amount,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Profit => "Profit",
            Self::Amount => "Amount",
        }
    }
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::SubCategory, Self::State, Self::Customer];

    /// Grouping key of a row for this dimension.
    pub fn key(self, row: &OrderLine) -> &str {
        match self {
            Self::SubCategory => &row.sub_category,
            Self::State => &row.state,
            Self::Customer => &row.customer,
        }
    }

    /// Sub-category charts profit; state and customer chart sales.
    pub fn metric(self) -> Metric {
        match self {
            Self::SubCategory => Metric::Profit,
            Self::State | Self::Customer => Metric::Amount,
        }
    }

    /// Element id of the chart that filters on this dimension.
    pub fn chart_id(self) -> &'static str {
        match self {
            Self::SubCategory => "chart-subcat",
            Self::State => "chart-state",
            Self::Customer => "chart-customer",
        }
    }

    pub fn from_chart_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.chart_id() == id)
    }

    /// Click payload axis holding the bar's category label.
    ///
    /// The sub-category chart is horizontal, so its categories run along `y`.
    pub fn label_axis(self) -> &'static str {
        match self {
            Self::SubCategory => "y",
            Self::State | Self::Customer => "x",
        }
    }

    /// Short name used in the status line.
    pub fn status_label(self) -> &'static str {
        match self {
            Self::SubCategory => "Sub-Cat",
            Self::State => "State",
            Self::Customer => "Customer",
        }
    }

    pub(crate) fn bit(self) -> u8 {
        match self {
            Self::SubCategory => 0b001,
            Self::State => 0b010,
            Self::Customer => 0b100,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubCategory => write!(f, "sub-category"),
            Self::State => write!(f, "state"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A single-select filter value: either everything or one exact value.
///
/// Serializes as a plain string, with `"All"` standing for [`Selection::All`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    /// Build a selection from user text; `"All"` and blank text select all.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL {
            Self::All
        } else {
            Self::Value(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Value(v) => Some(v),
        }
    }

    /// Whether a row key passes this filter.
    pub fn admits(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Value(v) => v == key,
        }
    }

    /// Whether a bar with this label should carry the accent color.
    pub fn highlights(&self, label: &str) -> bool {
        self.admits(label)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Value(v) => f.write_str(v),
        }
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// FilterState
// ---------------------------------------------------------------------------

/// The three active filters. Initialized to all-"All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub sub_category: Selection,
    pub state: Selection,
    pub customer: Selection,
}

impl FilterState {
    pub fn new(sub_category: Selection, state: Selection, customer: Selection) -> Self {
        Self {
            sub_category,
            state,
            customer,
        }
    }

    pub fn get(&self, dimension: Dimension) -> &Selection {
        match dimension {
            Dimension::SubCategory => &self.sub_category,
            Dimension::State => &self.state,
            Dimension::Customer => &self.customer,
        }
    }

    /// A copy with one dimension replaced; the other two are kept.
    pub fn with(&self, dimension: Dimension, selection: Selection) -> Self {
        let mut next = self.clone();
        match dimension {
            Dimension::SubCategory => next.sub_category = selection,
            Dimension::State => next.state = selection,
            Dimension::Customer => next.customer = selection,
        }
        next
    }

    /// Toggle `value` on `dimension`.
    ///
    /// Re-selecting the active value returns the dimension to "All";
    /// anything else replaces the selection. A label equal to the sentinel,
    /// or an empty one, selects "All".
    pub fn toggled(&self, dimension: Dimension, value: &str) -> Self {
        let selection = match self.get(dimension) {
            Selection::Value(current) if current == value => Selection::All,
            _ if value == ALL || value.is_empty() => Selection::All,
            _ => Selection::Value(value.to_string()),
        };
        self.with(dimension, selection)
    }

    /// All three dimensions reset to "All".
    pub fn cleared(&self) -> Self {
        Self::default()
    }

    pub fn is_unfiltered(&self) -> bool {
        Dimension::ALL.iter().all(|&d| self.get(d).is_all())
    }

    /// `Filters | Sub-Cat: … | State: … | Customer: …`
    pub fn status_line(&self) -> String {
        let parts: Vec<String> = Dimension::ALL
            .iter()
            .map(|&d| format!("{}: {}", d.status_label(), self.get(d)))
            .collect();
        format!("Filters | {}", parts.join(" | "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

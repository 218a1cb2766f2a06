//! The filter state machine.
//!
//! Consumes one UI event batch (which inputs fired, plus the current click
//! payload of every chart) and produces the next [`FilterState`] snapshot.
//!
//! The frontend reacts to *changes* of a chart's click payload, so clicking
//! the same bar twice in a row would otherwise go unnoticed. Every update
//! therefore drives all three click signals back to absent. The frontend
//! reports those resets as events of their own ("echoes"); they are
//! recognized here and skipped so they neither change state nor re-render.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Dimension, FilterState};

/// Element id of the "Clear All Filters" button.
pub const CLEAR_ID: &str = "clear-btn";

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// An input that fired in this batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Clear,
    Chart(Dimension),
}

impl Trigger {
    /// Resolve a frontend element id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        if id == CLEAR_ID {
            Some(Self::Clear)
        } else {
            Dimension::from_chart_id(id).map(Self::Chart)
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Clear => CLEAR_ID,
            Self::Chart(d) => d.chart_id(),
        }
    }
}

/// Last-clicked payload per chart, or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSignals {
    #[serde(rename = "chart-subcat")]
    pub sub_category: Option<Value>,
    #[serde(rename = "chart-state")]
    pub state: Option<Value>,
    #[serde(rename = "chart-customer")]
    pub customer: Option<Value>,
}

impl ChartSignals {
    /// All three signals absent.
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: Dimension) -> Option<&Value> {
        match dimension {
            Dimension::SubCategory => self.sub_category.as_ref(),
            Dimension::State => self.state.as_ref(),
            Dimension::Customer => self.customer.as_ref(),
        }
        .filter(|v| !v.is_null())
    }

    pub fn set(&mut self, dimension: Dimension, payload: Option<Value>) {
        let slot = match dimension {
            Dimension::SubCategory => &mut self.sub_category,
            Dimension::State => &mut self.state,
            Dimension::Customer => &mut self.customer,
        };
        *slot = payload;
    }

    pub fn all_absent(&self) -> bool {
        Dimension::ALL.iter().all(|&d| self.get(d).is_none())
    }
}

/// One interaction as delivered by the frontend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    pub triggered: Vec<Trigger>,
    pub signals: ChartSignals,
}

impl EventBatch {
    /// The very first render: nothing has fired yet.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn clear() -> Self {
        Self {
            triggered: vec![Trigger::Clear],
            signals: ChartSignals::reset(),
        }
    }

    /// A click on one chart carrying `payload`.
    pub fn click(dimension: Dimension, payload: Value) -> Self {
        let mut signals = ChartSignals::reset();
        signals.set(dimension, Some(payload));
        Self {
            triggered: vec![Trigger::Chart(dimension)],
            signals,
        }
    }

    /// A chart's signal going back to absent after a processed event.
    pub fn echo(dimension: Dimension) -> Self {
        Self {
            triggered: vec![Trigger::Chart(dimension)],
            signals: ChartSignals::reset(),
        }
    }

    /// Build a batch from frontend element ids, dropping unknown ids.
    pub fn from_ids<S: AsRef<str>>(ids: &[S], signals: ChartSignals) -> Self {
        Self {
            triggered: ids
                .iter()
                .filter_map(|id| Trigger::from_id(id.as_ref()))
                .collect(),
            signals,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// What caused an update, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    Initial,
    Cleared,
    Toggled { dimension: Dimension, label: String },
    /// The click payload had no usable label; the filter was kept.
    Malformed { dimension: Dimension },
}

impl std::fmt::Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Cleared => write!(f, "cleared"),
            Self::Toggled { dimension, label } => write!(f, "toggled {dimension} '{label}'"),
            Self::Malformed { dimension } => write!(f, "malformed {dimension} click"),
        }
    }
}

/// Result of processing one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// New snapshot to aggregate and render. `signals` are always all absent.
    Update {
        filters: FilterState,
        signals: ChartSignals,
        cause: Cause,
    },
    /// Echo of a signal reset: keep the current state, do not re-render.
    Skip,
}

impl Transition {
    fn update(filters: FilterState, cause: Cause) -> Self {
        Self::Update {
            filters,
            signals: ChartSignals::reset(),
            cause,
        }
    }

    /// The snapshot after this transition, given the one before it.
    pub fn resolve(&self, current: &FilterState) -> FilterState {
        match self {
            Self::Update { filters, .. } => filters.clone(),
            Self::Skip => current.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Compute the next state for `batch` given the `current` snapshot.
///
/// Precedence: no trigger (initial render) → clear → first chart trigger
/// with a payload. Chart triggers without a payload are echoes; a batch made
/// only of echoes is skipped.
pub fn process(current: &FilterState, batch: &EventBatch) -> Transition {
    if batch.triggered.is_empty() {
        return Transition::update(FilterState::default(), Cause::Initial);
    }

    if batch.triggered.contains(&Trigger::Clear) {
        return Transition::update(current.cleared(), Cause::Cleared);
    }

    let clicked = batch.triggered.iter().find_map(|trigger| match *trigger {
        Trigger::Chart(d) => batch.signals.get(d).map(|payload| (d, payload)),
        Trigger::Clear => None,
    });

    let Some((dimension, payload)) = clicked else {
        return Transition::Skip;
    };

    match extract_label(payload, dimension.label_axis()) {
        Some(label) => {
            let next = current.toggled(dimension, &label);
            Transition::update(next, Cause::Toggled { dimension, label })
        }
        None => Transition::update(current.clone(), Cause::Malformed { dimension }),
    }
}

/// Pull the clicked bar's category label out of a click payload.
///
/// Payloads look like `{"points": [{"x": "CA", "y": 1234.5}]}`; `axis`
/// names the field holding the category. Strings and numbers are accepted,
/// trimmed. `null`, booleans, and labels that trim to nothing are treated as
/// malformed rather than stringified, so no filter value is ever empty.
pub fn extract_label(payload: &Value, axis: &str) -> Option<String> {
    let raw = payload.get("points")?.get(0)?.get(axis)?;
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Presentation layer — turns a [`DashboardView`] into display-ready output.
//!
//! The web frontend draws exactly what is described here: formatted KPI
//! strings, one bar specification per chart (with per-bar colors already
//! resolved), and the status line. The CLI report renders the same
//! structures to the terminal.

pub mod format;

use serde::Serialize;

use crate::config::ChartsConfig;
use crate::engine::{DashboardView, Kpis, Summary};
use crate::filter::{Dimension, FilterState};

/// Text shown in place of an empty chart.
pub const NO_DATA_TEXT: &str = "No Data";

// ---------------------------------------------------------------------------
// Render surface
// ---------------------------------------------------------------------------

/// The four KPI card values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiStrings {
    pub amount: String,
    pub profit: String,
    pub quantity: String,
    pub orders: String,
}

impl KpiStrings {
    pub fn from_kpis(kpis: &Kpis) -> Self {
        Self {
            amount: format::currency(kpis.amount),
            profit: format::currency(kpis.profit),
            quantity: format::count(kpis.quantity),
            orders: format::count(kpis.orders as i64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Short SI label drawn on the bar.
    pub text: String,
    pub color: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub orientation: Orientation,
    /// Categories listed top-down (largest first) on horizontal charts.
    pub reversed_categories: bool,
    pub value_axis_title: String,
    /// Category axes are left untitled.
    pub category_axis_title: Option<String>,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    pub opacity: f64,
    pub axes_visible: bool,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            text: NO_DATA_TEXT.to_string(),
            font_size: 20,
            color: "gray".to_string(),
            opacity: 0.6,
            axes_visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Bars(BarChart),
    NoData(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFigure {
    pub id: &'static str,
    pub title: String,
    pub figure: Figure,
}

impl ChartFigure {
    pub fn is_no_data(&self) -> bool {
        matches!(self.figure, Figure::NoData(_))
    }

    pub fn bars(&self) -> &[Bar] {
        match &self.figure {
            Figure::Bars(chart) => &chart.bars,
            Figure::NoData(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDashboard {
    pub filters: FilterState,
    pub kpis: KpiStrings,
    pub charts: Vec<ChartFigure>,
    pub status: String,
}

impl RenderedDashboard {
    pub fn chart(&self, dimension: Dimension) -> Option<&ChartFigure> {
        self.charts.iter().find(|c| c.id == dimension.chart_id())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Card header for a dimension's chart.
pub fn chart_title(dimension: Dimension, top_n: usize) -> String {
    match dimension {
        Dimension::SubCategory => "Total Profit by Sub-Category".to_string(),
        Dimension::State => "Total Sales by State".to_string(),
        Dimension::Customer => format!("Top {top_n} Customers by Sales"),
    }
}

pub fn accent_color(dimension: Dimension, charts: &ChartsConfig) -> &str {
    match dimension {
        Dimension::SubCategory => &charts.sub_category_color,
        Dimension::State => &charts.state_color,
        Dimension::Customer => &charts.customer_color,
    }
}

pub fn render(view: &DashboardView, charts: &ChartsConfig) -> RenderedDashboard {
    RenderedDashboard {
        filters: view.filters.clone(),
        kpis: KpiStrings::from_kpis(&view.kpis),
        charts: Dimension::ALL
            .into_iter()
            .map(|d| render_chart(d, view.summary(d), &view.filters, charts))
            .collect(),
        status: view.filters.status_line(),
    }
}

fn render_chart(
    dimension: Dimension,
    summary: &Summary,
    filters: &FilterState,
    charts: &ChartsConfig,
) -> ChartFigure {
    let figure = match summary {
        Summary::NoData => Figure::NoData(Placeholder::default()),
        Summary::Groups(groups) => {
            let selection = filters.get(dimension);
            let accent = accent_color(dimension, charts);
            let bars = groups
                .iter()
                .map(|g| {
                    let highlighted = selection.highlights(&g.key);
                    Bar {
                        label: g.key.clone(),
                        value: g.value,
                        text: format::si(g.value),
                        color: if highlighted {
                            accent.to_string()
                        } else {
                            charts.neutral_color.clone()
                        },
                        highlighted,
                    }
                })
                .collect();

            let horizontal = dimension == Dimension::SubCategory;
            Figure::Bars(BarChart {
                orientation: if horizontal {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                },
                reversed_categories: horizontal,
                value_axis_title: dimension.metric().label().to_string(),
                category_axis_title: None,
                bars,
            })
        }
    };

    ChartFigure {
        id: dimension.chart_id(),
        title: chart_title(dimension, charts.top_n),
        figure,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

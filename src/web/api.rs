//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::config;
use crate::data::JoinStats;
use crate::filter::machine::{ChartSignals, EventBatch};
use crate::filter::{Dimension, FilterState};
use crate::render::RenderedDashboard;

use super::content_type_json;
use super::session::{EventOutcome, Session};

// ---------------------------------------------------------------------------
// JSON request/response types
// ---------------------------------------------------------------------------

/// Event batch as posted by the frontend.
///
/// `{"triggered": ["chart-state"], "signals": {"chart-state": {"points": [...]}}}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EventRequest {
    triggered: Vec<String>,
    signals: ChartSignals,
}

impl EventRequest {
    fn into_batch(self) -> EventBatch {
        EventBatch::from_ids(&self.triggered, self.signals)
    }
}

#[derive(Debug, Serialize)]
struct EventResponse {
    skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<FilterState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    signals: Option<ChartSignals>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dashboard: Option<RenderedDashboard>,
}

impl From<EventOutcome> for EventResponse {
    fn from(outcome: EventOutcome) -> Self {
        match outcome {
            EventOutcome::Skipped => Self {
                skipped: true,
                filters: None,
                signals: None,
                dashboard: None,
            },
            EventOutcome::Updated { signals, dashboard } => Self {
                skipped: false,
                filters: Some(dashboard.filters.clone()),
                signals: Some(signals),
                dashboard: Some(dashboard),
            },
        }
    }
}

/// Health API response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    rows: usize,
    join: JoinStats,
    details_path: String,
    orders_path: String,
    sub_categories: usize,
    states: usize,
    customers: usize,
    config_exists: bool,
    journal_enabled: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/dashboard` — render the current filter snapshot.
pub fn get_dashboard(session: &Session) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&session.render())
}

/// `POST /api/events` — run one event batch through the filter state machine.
pub fn post_events(session: &mut Session, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let request: EventRequest =
        serde_json::from_str(body).context("invalid JSON in event request")?;
    let outcome = session.handle(&request.into_batch());
    json_response(&EventResponse::from(outcome))
}

/// `GET /api/health` — dataset and configuration summary.
pub fn get_health(session: &Session) -> Result<Response<Cursor<Vec<u8>>>> {
    let table = session.table();
    let cfg = session.config();
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    let resp = HealthResponse {
        rows: table.len(),
        join: table.join_stats(),
        details_path: cfg.data.details_path.clone(),
        orders_path: cfg.data.orders_path.clone(),
        sub_categories: table.distinct(Dimension::SubCategory).len(),
        states: table.distinct(Dimension::State).len(),
        customers: table.distinct(Dimension::Customer).len(),
        config_exists,
        journal_enabled: cfg.logging.enabled,
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

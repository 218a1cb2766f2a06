//! Interaction journal — one JSONL line per processed dashboard event.
//!
//! Records which inputs fired, what the filter state machine decided, and
//! the filter snapshot before and after. The journal is write-only: it is
//! never read back into session state.
//!
//! Log file: `~/.salesboard/events.jsonl` (see `[logging]`).

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::config::schema::LoggingConfig;
use crate::config::expand_home;
use crate::filter::FilterState;
use crate::filter::machine::{EventBatch, Transition};

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// One processed event batch.
#[derive(Debug, Serialize)]
pub struct FilterEvent {
    pub timestamp: String,
    /// Element ids that fired, e.g. `["chart-state"]`.
    pub triggered: Vec<&'static str>,
    /// `"update"` or `"skip"`.
    pub outcome: &'static str,
    /// Human-readable cause of an update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    pub before: FilterState,
    pub after: FilterState,
}

impl FilterEvent {
    pub fn new(batch: &EventBatch, before: &FilterState, transition: &Transition) -> Self {
        let (outcome, cause) = match transition {
            Transition::Update { cause, .. } => ("update", Some(cause.to_string())),
            Transition::Skip => ("skip", None),
        };
        Self {
            timestamp: Utc::now().to_rfc3339(),
            triggered: batch.triggered.iter().map(|t| t.id()).collect(),
            outcome,
            cause,
            before: before.clone(),
            after: transition.resolve(before),
        }
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

/// Appends [`FilterEvent`]s to a JSONL file. Disabled journals drop events.
#[derive(Debug, Clone)]
pub struct Journal {
    path: Option<PathBuf>,
}

impl Journal {
    pub fn from_config(logging: &LoggingConfig) -> Self {
        Self {
            path: logging.enabled.then(|| expand_home(&logging.path)),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Best-effort — failures are silently ignored.
    pub fn record(&self, event: &FilterEvent) {
        let _ = self.append(event);
    }

    fn append(&self, event: &FilterEvent) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(event)?;
        writeln!(file, "{json}")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::filter::Dimension;
    use crate::filter::machine::process;

    #[test]
    fn event_captures_transition() {
        let before = FilterState::default();
        let batch = EventBatch::click(Dimension::State, json!({ "points": [{ "x": "CA" }] }));
        let transition = process(&before, &batch);

        let event = FilterEvent::new(&batch, &before, &transition);
        assert_eq!(event.triggered, vec!["chart-state"]);
        assert_eq!(event.outcome, "update");
        assert_eq!(event.cause.as_deref(), Some("toggled state 'CA'"));
        assert_eq!(event.after.state.as_value(), Some("CA"));
    }

    #[test]
    fn skip_event_keeps_state() {
        let before = FilterState::default().toggled(Dimension::Customer, "Bob");
        let batch = EventBatch::echo(Dimension::Customer);
        let transition = process(&before, &batch);

        let event = FilterEvent::new(&batch, &before, &transition);
        assert_eq!(event.outcome, "skip");
        assert!(event.cause.is_none());
        assert_eq!(event.after, before);

        let line = serde_json::to_string(&event).unwrap();
        assert!(!line.contains("\"cause\""));
    }

    #[test]
    fn journal_appends_lines() {
        let path = std::env::temp_dir()
            .join(format!("salesboard-journal-{}", std::process::id()))
            .join("events.jsonl");
        let _ = std::fs::remove_file(&path);
        let journal = Journal::at(&path);

        let before = FilterState::default();
        let batch = EventBatch::clear();
        let transition = process(&before, &batch);
        journal.record(&FilterEvent::new(&batch, &before, &transition));
        journal.record(&FilterEvent::new(&batch, &before, &transition));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"clear-btn\""));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn disabled_journal_writes_nothing() {
        let logging = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert!(Journal::from_config(&logging).path().is_none());
        Journal::disabled().record(&FilterEvent::new(
            &EventBatch::clear(),
            &FilterState::default(),
            &Transition::Skip,
        ));
    }
}

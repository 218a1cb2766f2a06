//! Interaction analytics: the JSONL journal of dashboard events.

pub mod events;

pub use events::{FilterEvent, Journal};

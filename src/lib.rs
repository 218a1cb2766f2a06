//! salesboard: an interactive cross-filtering sales dashboard.
//!
//! Two CSV sources are joined once into an immutable [`data::CanonicalTable`];
//! the [`filter`] state machine turns chart clicks into filter snapshots, the
//! [`engine`] aggregates them, [`render`] formats the result, and [`web`]
//! serves it.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod filter;
pub mod render;
pub mod web;

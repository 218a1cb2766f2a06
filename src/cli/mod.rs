//! CLI command implementations for salesboard.
//!
//! Provides subcommand handlers for:
//! - `salesboard serve` — load the data and run the web dashboard
//! - `salesboard report` — print the dashboard views for a filter selection
//! - `salesboard config show|init|set|path` — configuration management

use std::io;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{self, LogLevel, SalesboardConfig};
use crate::data::{self, CanonicalTable};
use crate::engine::DashboardView;
use crate::filter::{Dimension, FilterState, Selection};
use crate::render::{self, ChartFigure, RenderedDashboard};
use crate::web;

/// Output format for the report command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Data source paths given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub details: Option<String>,
    pub orders: Option<String>,
}

impl SourceOverrides {
    /// Command-line flags are the highest configuration layer.
    pub fn apply(self, config: &mut SalesboardConfig) {
        if let Some(path) = self.details {
            config.data.details_path = path;
        }
        if let Some(path) = self.orders {
            config.data.orders_path = path;
        }
    }
}

/// Load and join the two CSV sources, printing a one-line summary.
pub fn load_dataset(config: &SalesboardConfig) -> Result<CanonicalTable> {
    let table = data::load_table(&config.data, &config.columns).with_context(|| {
        format!(
            "failed to load {} + {}",
            config.data.details_path, config.data.orders_path
        )
    })?;

    let stats = table.join_stats();
    if config.logging.allows(LogLevel::Info) {
        println!(
            "{} {} rows ({} line items x {} orders)",
            "Loaded".green().bold(),
            format_number(stats.joined_rows),
            format_number(stats.detail_rows),
            format_number(stats.order_rows),
        );
    }
    if stats.unmatched_details > 0 && config.logging.allows(LogLevel::Warn) {
        eprintln!(
            "{} {} line items have no matching order and were dropped",
            "warning:".yellow().bold(),
            format_number(stats.unmatched_details)
        );
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// salesboard serve
// ---------------------------------------------------------------------------

/// Load the data and serve the dashboard until interrupted.
pub fn run_serve(
    addr: Option<String>,
    sources: SourceOverrides,
    no_open: bool,
) -> Result<()> {
    let mut cfg = config::load();
    sources.apply(&mut cfg);
    if let Some(addr) = addr {
        cfg.server.addr = addr;
    }
    if no_open {
        cfg.server.open_browser = false;
    }

    let table = load_dataset(&cfg)?;
    web::serve(&cfg, &table)
}

// ---------------------------------------------------------------------------
// salesboard report
// ---------------------------------------------------------------------------

/// Print KPIs, the three charts, and the status line for one filter selection.
pub fn run_report(filters: FilterState, sources: SourceOverrides, format: OutputFormat) -> Result<()> {
    let mut cfg = config::load();
    sources.apply(&mut cfg);
    if format != OutputFormat::Table {
        // Keep machine-readable output clean.
        cfg.logging.level = LogLevel::Warn;
    }

    let table = load_dataset(&cfg)?;
    let view = DashboardView::compute(&table, &filters, cfg.charts.top_n);
    let rendered = render::render(&view, &cfg.charts);

    match format {
        OutputFormat::Json => print_report_json(&rendered)?,
        OutputFormat::Csv => print_report_csv(&rendered)?,
        OutputFormat::Table => print_report_table(&rendered),
    }

    Ok(())
}

/// Build a filter snapshot from optional `--sub-category/--state/--customer` values.
pub fn filters_from_args(
    sub_category: Option<&str>,
    state: Option<&str>,
    customer: Option<&str>,
) -> FilterState {
    let select = |v: Option<&str>| v.map(Selection::parse).unwrap_or_default();
    FilterState::new(select(sub_category), select(state), select(customer))
}

fn print_report_table(rendered: &RenderedDashboard) {
    println!("{}", "Sales Dashboard".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    let kpis = &rendered.kpis;
    println!("  {} {}", "Total Sales:  ".bold(), kpis.amount);
    println!("  {} {}", "Total Profit: ".bold(), kpis.profit);
    println!("  {} {}", "Quantity Sold:".bold(), kpis.quantity);
    println!("  {} {}", "Total Orders: ".bold(), kpis.orders);
    println!();

    for chart in &rendered.charts {
        print_chart_table(chart);
        println!();
    }

    println!("{}", rendered.status.dimmed());
}

fn print_chart_table(chart: &ChartFigure) {
    println!("{}", chart.title.bold().cyan());
    if chart.is_no_data() {
        println!("  {}", render::NO_DATA_TEXT.dimmed());
        return;
    }

    let bars = chart.bars();
    let max = bars
        .iter()
        .map(|b| b.value.abs())
        .fold(0.0_f64, f64::max)
        .max(f64::EPSILON);

    for bar in bars {
        let width = ((bar.value.abs() / max) * 30.0).round() as usize;
        let line = format!(
            "  {:<22} {:>8} {}",
            truncate(&bar.label, 22),
            bar.text,
            "█".repeat(width.max(1))
        );
        if bar.highlighted {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_report_json(rendered: &RenderedDashboard) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rendered)?);
    Ok(())
}

fn print_report_csv(rendered: &RenderedDashboard) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["chart", "rank", "label", "value", "highlighted"])?;
    for dimension in Dimension::ALL {
        let Some(chart) = rendered.chart(dimension) else {
            continue;
        };
        for (rank, bar) in chart.bars().iter().enumerate() {
            writer.write_record([
                dimension.to_string(),
                (rank + 1).to_string(),
                bar.label.clone(),
                format!("{:.2}", bar.value),
                bar.highlighted.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// salesboard config show | init | set | path
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective salesboard Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.salesboard/config.toml", global_exists);
    print_source(".salesboard.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SALESBOARD_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.salesboard/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Print the global and project config file locations.
pub fn run_config_path() -> Result<()> {
    let global = config::global_config_file().context("could not determine home directory")?;
    println!("{}", global.display());
    if let Some(project) = config::project_config_file() {
        println!("{}", project.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    render::format::count(n as i64)
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

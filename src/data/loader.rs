//! CSV loading and the order-id inner join.
//!
//! Expected sources:
//!   Details.csv: Order ID, Amount, Profit, Quantity, Category, Sub-Category, ...
//!   Orders.csv:  Order ID, Order Date, CustomerName, State, City, ...
//!
//! Fields other than the order id may live on either side; the line-item
//! row is consulted first.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::StringRecord;

use super::{CanonicalTable, JoinStats, OrderLine};
use crate::config::{ColumnsConfig, DataConfig};

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Load and join the two configured CSV files.
pub fn load_table(data: &DataConfig, columns: &ColumnsConfig) -> Result<CanonicalTable> {
    let details = open(&data.details_path)?;
    let orders = open(&data.orders_path)?;

    let details = Source::read("details", details)
        .with_context(|| format!("failed to read {}", data.details_path))?;
    let orders = Source::read("orders", orders)
        .with_context(|| format!("failed to read {}", data.orders_path))?;

    join(&details, &orders, columns)
}

/// Load and join from arbitrary readers (used by tests and embedders).
pub fn load_from_readers<D: Read, O: Read>(
    details: D,
    orders: O,
    columns: &ColumnsConfig,
) -> Result<CanonicalTable> {
    let details = Source::read("details", details)?;
    let orders = Source::read("orders", orders)?;
    join(&details, &orders, columns)
}

fn open(path: &str) -> Result<File> {
    File::open(Path::new(path)).with_context(|| format!("failed to open '{path}'"))
}

// ---------------------------------------------------------------------------
// Raw sources
// ---------------------------------------------------------------------------

/// A header-keyed CSV file held as raw records.
struct Source {
    name: &'static str,
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Source {
    fn read<R: Read>(name: &'static str, reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .with_context(|| format!("{name}: missing header row"))?
            .clone();

        let mut rows = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record =
                record.with_context(|| format!("{name}: CSV parse error at line {}", i + 2))?;
            rows.push(record);
        }

        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Side {
    Detail,
    Order,
}

#[derive(Debug, Clone, Copy)]
struct Field {
    side: Side,
    index: usize,
}

impl Field {
    fn get<'a>(&self, detail: &'a StringRecord, order: &'a StringRecord) -> &'a str {
        let record = match self.side {
            Side::Detail => detail,
            Side::Order => order,
        };
        record.get(self.index).unwrap_or("")
    }
}

fn resolve(details: &Source, orders: &Source, header: &str) -> Result<Field> {
    if let Some(index) = details.column(header) {
        return Ok(Field {
            side: Side::Detail,
            index,
        });
    }
    if let Some(index) = orders.column(header) {
        return Ok(Field {
            side: Side::Order,
            index,
        });
    }
    bail!(
        "column '{header}' not found in {} or {} source",
        details.name,
        orders.name
    )
}

struct Layout {
    sub_category: Field,
    state: Field,
    customer: Field,
    amount: Field,
    profit: Field,
    quantity: Field,
}

impl Layout {
    fn resolve(details: &Source, orders: &Source, columns: &ColumnsConfig) -> Result<Self> {
        Ok(Self {
            sub_category: resolve(details, orders, &columns.sub_category)?,
            state: resolve(details, orders, &columns.state)?,
            customer: resolve(details, orders, &columns.customer)?,
            amount: resolve(details, orders, &columns.amount)?,
            profit: resolve(details, orders, &columns.profit)?,
            quantity: resolve(details, orders, &columns.quantity)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Inner join on order id: one output row per matching (detail, order) pair,
/// in detail order then order order. Unmatched rows are dropped.
fn join(details: &Source, orders: &Source, columns: &ColumnsConfig) -> Result<CanonicalTable> {
    let detail_key = details.column(&columns.order_id).with_context(|| {
        format!("column '{}' not found in details source", columns.order_id)
    })?;
    let order_key = orders.column(&columns.order_id).with_context(|| {
        format!("column '{}' not found in orders source", columns.order_id)
    })?;
    let layout = Layout::resolve(details, orders, columns)?;

    let mut by_id: HashMap<&str, Vec<&StringRecord>> = HashMap::new();
    for record in &orders.rows {
        by_id
            .entry(record.get(order_key).unwrap_or(""))
            .or_default()
            .push(record);
    }

    let mut rows = Vec::new();
    let mut unmatched_details = 0;
    for (i, detail) in details.rows.iter().enumerate() {
        let id = detail.get(detail_key).unwrap_or("");
        let Some(matches) = by_id.get(id) else {
            unmatched_details += 1;
            continue;
        };
        for order in matches {
            let line = build_line(id, &layout, detail, order, columns)
                .with_context(|| format!("details: invalid row at line {}", i + 2))?;
            rows.push(line);
        }
    }

    let stats = JoinStats {
        detail_rows: details.rows.len(),
        order_rows: orders.rows.len(),
        joined_rows: rows.len(),
        unmatched_details,
    };
    Ok(CanonicalTable::with_stats(rows, stats))
}

fn build_line(
    id: &str,
    layout: &Layout,
    detail: &StringRecord,
    order: &StringRecord,
    columns: &ColumnsConfig,
) -> Result<OrderLine> {
    let text = |field: &Field| field.get(detail, order).to_string();
    Ok(OrderLine {
        order_id: id.to_string(),
        sub_category: layout.sub_category.get(detail, order).trim().to_string(),
        state: text(&layout.state),
        customer: text(&layout.customer),
        amount: parse_number(layout.amount.get(detail, order), &columns.amount)?,
        profit: parse_number(layout.profit.get(detail, order), &columns.profit)?,
        quantity: parse_integer(layout.quantity.get(detail, order), &columns.quantity)?,
    })
}

fn parse_number(raw: &str, column: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("expected number in '{column}', got '{raw}'"))
}

/// Integers written as `3.0` are accepted.
fn parse_integer(raw: &str, column: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(f as i64),
        _ => bail!("expected integer in '{column}', got '{raw}'"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

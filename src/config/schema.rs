/// Configuration schema and defaults for salesboard.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[data]`, `[columns]`, `[server]`, `[charts]`, and `[logging]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level salesboard configuration.
///
/// Maps directly to the `~/.salesboard/config.toml` and `.salesboard.toml`
/// file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalesboardConfig {
    pub data: DataConfig,
    pub columns: ColumnsConfig,
    pub server: ServerConfig,
    pub charts: ChartsConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [data]
// ---------------------------------------------------------------------------

/// Source file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Order line-item CSV (one row per product line).
    pub details_path: String,
    /// Order header CSV (one row per order).
    pub orders_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            details_path: "Details.csv".to_string(),
            orders_path: "Orders.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [columns]
// ---------------------------------------------------------------------------

/// CSV header names for the fields the dashboard reads.
///
/// Each field other than the order id is looked up on the line-item row
/// first and then on the joined order header row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub order_id: String,
    pub sub_category: String,
    pub state: String,
    pub customer: String,
    pub amount: String,
    pub profit: String,
    pub quantity: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            order_id: "Order ID".to_string(),
            sub_category: "Sub-Category".to_string(),
            state: "State".to_string(),
            customer: "CustomerName".to_string(),
            amount: "Amount".to_string(),
            profit: "Profit".to_string(),
            quantity: "Quantity".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Web dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for the dashboard.
    pub addr: String,
    /// Open the dashboard in the default browser on startup.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8050".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [charts]
// ---------------------------------------------------------------------------

/// Chart sizing and palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartsConfig {
    /// Number of bars kept per chart after sorting.
    pub top_n: usize,
    /// Accent color for the sub-category profit chart.
    pub sub_category_color: String,
    /// Accent color for the state sales chart.
    pub state_color: String,
    /// Accent color for the top customers chart.
    pub customer_color: String,
    /// Color of bars that are shown for context but not selected.
    pub neutral_color: String,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            top_n: 6,
            sub_category_color: "#764ba2".to_string(),
            state_color: "#667eea".to_string(),
            customer_color: "#182848".to_string(),
            neutral_color: "#e0e0e0".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Console verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether the interaction journal is written.
    pub enabled: bool,
    /// Path to the interaction journal. `~` is expanded to the home directory.
    pub path: String,
    /// Console log level: `"error"`, `"warn"`, `"info"`, `"debug"`.
    pub level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.salesboard/events.jsonl".to_string(),
            level: LogLevel::default(),
        }
    }
}

impl LoggingConfig {
    /// Whether console messages at `level` should be printed.
    pub fn allows(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl SalesboardConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `salesboard config init`.
    pub fn default_toml() -> String {
        r##"# salesboard Configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Command-line flags
#   2. Environment variables (SALESBOARD_*)
#   3. Project config (.salesboard.toml in current directory)
#   4. User global config (~/.salesboard/config.toml)
#   5. Built-in defaults

[data]
details_path = "Details.csv"          # Order line items
orders_path = "Orders.csv"            # Order headers, joined on order id

[columns]
order_id = "Order ID"
sub_category = "Sub-Category"
state = "State"
customer = "CustomerName"
amount = "Amount"
profit = "Profit"
quantity = "Quantity"

[server]
addr = "127.0.0.1:8050"
open_browser = true

[charts]
top_n = 6
sub_category_color = "#764ba2"
state_color = "#667eea"
customer_color = "#182848"
neutral_color = "#e0e0e0"

[logging]
enabled = true
path = "~/.salesboard/events.jsonl"
level = "info"                        # error | warn | info | debug
"##
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = SalesboardConfig::default();
        assert_eq!(config.data.details_path, "Details.csv");
        assert_eq!(config.data.orders_path, "Orders.csv");
        assert_eq!(config.columns.order_id, "Order ID");
        assert_eq!(config.columns.customer, "CustomerName");
        assert_eq!(config.server.addr, "127.0.0.1:8050");
        assert_eq!(config.charts.top_n, 6);
        assert_eq!(config.charts.neutral_color, "#e0e0e0");
        assert!(config.logging.enabled);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn deserialize_minimal_toml() {
        let toml_str = r#"
[charts]
top_n = 10
"#;
        let config: SalesboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.charts.top_n, 10);
        // Unset fields keep their defaults
        assert_eq!(config.charts.state_color, "#667eea");
        assert_eq!(config.data.details_path, "Details.csv");
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: SalesboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.addr, "127.0.0.1:8050");
        assert!(config.server.open_browser);
    }

    #[test]
    fn default_toml_parses_back() {
        let config: SalesboardConfig = toml::from_str(&SalesboardConfig::default_toml()).unwrap();
        assert_eq!(config.charts.top_n, 6);
        assert_eq!(config.columns.sub_category, "Sub-Category");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_gates_by_severity() {
        let mut logging = LoggingConfig::default();
        assert!(logging.allows(LogLevel::Error));
        assert!(logging.allows(LogLevel::Info));
        assert!(!logging.allows(LogLevel::Debug));

        logging.level = LogLevel::Error;
        assert!(!logging.allows(LogLevel::Warn));

        logging.level = LogLevel::Debug;
        assert!(logging.allows(LogLevel::Debug));
    }

    #[test]
    fn log_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }
}

/// Configuration system for salesboard.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::SalesboardConfig::default()`]
/// 2. **User global config** — `~/.salesboard/config.toml`
/// 3. **Project local config** — `.salesboard.toml` in the current working directory
/// 4. **Environment variables** — `SALESBOARD_*` overrides
///
/// Command-line flags are applied on top by the caller. Missing sections in
/// a TOML file fall back to defaults.
///
/// # Usage
///
/// ```rust,ignore
/// use salesboard::config;
///
/// let cfg = config::load();
/// let table = salesboard::data::load_table(&cfg.data, &cfg.columns)?;
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::{ChartsConfig, ColumnsConfig, DataConfig, LogLevel, SalesboardConfig};

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved salesboard configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> SalesboardConfig {
    let mut config = SalesboardConfig::default();

    // Layer 2: user global config (~/.salesboard/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    // Layer 3: project local config (.salesboard.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        config = project;
    }

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Returns `None` if the path is `None`, the file doesn't exist, or the
/// content is malformed. A later layer fully replaces an earlier one; since
/// every file is deserialized with defaults, unset keys match the defaults.
fn load_toml_file(path: Option<PathBuf>) -> Option<SalesboardConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match parse_config(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("warning: ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

/// Deserialize a config file and check values serde cannot express.
fn parse_config(content: &str) -> Result<SalesboardConfig> {
    let config: SalesboardConfig = toml::from_str(content)?;
    if config.charts.top_n == 0 {
        anyhow::bail!("charts.top_n must be at least 1");
    }
    Ok(config)
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.salesboard/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".salesboard").join("config.toml"))
}

/// Path to the project local config: `.salesboard.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".salesboard.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest file-independent layer).
///
/// Supported variables:
/// - `SALESBOARD_DETAILS` — line-item CSV path
/// - `SALESBOARD_ORDERS` — order header CSV path
/// - `SALESBOARD_ADDR` — dashboard listen address
/// - `SALESBOARD_TOP_N` — bars per chart
/// - `SALESBOARD_LOG_LEVEL` — `error`, `warn`, `info`, `debug`
/// - `SALESBOARD_LOGGING` — interaction journal on/off (`1`/`true`/`yes`/`on`)
fn apply_env_overrides<F>(config: &mut SalesboardConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = var("SALESBOARD_DETAILS")
        && !val.is_empty()
    {
        config.data.details_path = val;
    }
    if let Some(val) = var("SALESBOARD_ORDERS")
        && !val.is_empty()
    {
        config.data.orders_path = val;
    }
    if let Some(val) = var("SALESBOARD_ADDR")
        && !val.is_empty()
    {
        config.server.addr = val;
    }
    if let Some(val) = var("SALESBOARD_TOP_N")
        && let Ok(n) = val.parse::<usize>()
        && n > 0
    {
        config.charts.top_n = n;
    }
    if let Some(val) = var("SALESBOARD_LOG_LEVEL")
        && let Some(level) = parse_level(&val)
    {
        config.logging.level = level;
    }
    if let Some(val) = var("SALESBOARD_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a log level string.
fn parse_level(val: &str) -> Option<LogLevel> {
    match val.to_ascii_lowercase().as_str() {
        "error" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.salesboard/config.toml`.
///
/// Creates the `~/.salesboard/` directory if it doesn't exist. Returns an
/// error if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.salesboard/ directory")?;
    }

    fs::write(&path, SalesboardConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `charts.top_n`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SalesboardConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject edits that would no longer deserialize into the schema
    let updated = toml::to_string_pretty(&root).context("failed to serialize config")?;
    parse_config(&updated).with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, updated).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((section_path, leaf)) = key.rsplit_once('.') else {
        anyhow::bail!("config key must be of the form section.field, got '{key}'");
    };

    let mut current = root;
    for part in section_path.split('.') {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{section_path}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("config key '{key}' cannot be set from the command line"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use anyhow::Result;
use clap::{Parser, Subcommand};

use salesboard::cli::{self, SourceOverrides};

#[derive(Debug, Parser)]
#[command(name = "salesboard")]
#[command(about = "Interactive cross-filtering sales dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the CSV sources and serve the web dashboard
    Serve {
        /// Listen address (default: 127.0.0.1:8050)
        #[arg(long)]
        addr: Option<String>,
        /// Line-item CSV (default: Details.csv)
        #[arg(long)]
        details: Option<String>,
        /// Order header CSV (default: Orders.csv)
        #[arg(long)]
        orders: Option<String>,
        /// Don't open a browser window
        #[arg(long)]
        no_open: bool,
    },
    /// Print KPIs and chart summaries for a filter selection
    Report {
        #[arg(long)]
        sub_category: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        #[arg(long)]
        details: Option<String>,
        #[arg(long)]
        orders: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective merged configuration
    Show,
    /// Write an annotated default config to ~/.salesboard/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set one dotted key, e.g. `charts.top_n 10`
    Set { key: String, value: String },
    /// Print config file locations
    Path,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve {
            addr,
            details,
            orders,
            no_open,
        } => cli::run_serve(addr, SourceOverrides { details, orders }, no_open),
        Commands::Report {
            sub_category,
            state,
            customer,
            format,
            details,
            orders,
        } => {
            let filters = cli::filters_from_args(
                sub_category.as_deref(),
                state.as_deref(),
                customer.as_deref(),
            );
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_report(filters, SourceOverrides { details, orders }, fmt)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Path => cli::run_config_path(),
        },
    }
}

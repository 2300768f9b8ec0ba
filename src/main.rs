//! RevDash - industry revenue statistics and dashboard
//!
//! A CLI tool that reads a CSV of companies, reports per-industry revenue
//! statistics and renders revenue per industry as an HTML bar chart.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (invalid arguments, unreadable dataset, write failure, etc.)

mod analysis;
mod cli;
mod config;
mod dashboard;
mod data;
mod models;
mod report;

use analysis::Aggregations;
use anyhow::{Context, Result};
use cli::{Args, Command, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("RevDash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Run failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .revdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the dataset path, report and dashboard options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the selected command.
fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let aggregations = Aggregations::new(config.data.path.clone());
    info!("Dataset: {}", aggregations.data_path().display());

    match args.command {
        Some(Command::Report { .. }) => run_report(&aggregations, &config),
        Some(Command::Dashboard { .. }) => run_dashboard(&aggregations, &config),
        // Rejected by Args::validate
        None => Ok(()),
    }
}

/// Print every statistic to stdout.
fn run_report(aggregations: &Aggregations, config: &Config) -> Result<()> {
    let report = report::build_report(aggregations, config.report.top_n)?;

    let output = match config.report.format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    println!("{}", output.trim_end());
    Ok(())
}

/// Write the dashboard HTML and open it.
fn run_dashboard(aggregations: &Aggregations, config: &Config) -> Result<()> {
    let options = config.dashboard.options();
    let chart = dashboard::render_dashboard(aggregations, &options)?;

    println!(
        "Dashboard with {} industries saved to: {}",
        chart.bars.len(),
        options.output.display()
    );
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

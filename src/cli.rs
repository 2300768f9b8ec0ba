//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// RevDash - industry revenue statistics for company datasets
///
/// Reads a CSV of companies and reports revenue per industry, top
/// companies, market share, quartiles and year-over-year growth, or
/// renders revenue per industry as an interactive HTML dashboard.
///
/// Examples:
///   revdash report
///   revdash --data data/companies.csv report --top 10 --format json
///   revdash dashboard --output revenue.html --no-open
///   revdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the company dataset (CSV)
    ///
    /// Defaults to data/data.csv, or the path in .revdash.toml.
    #[arg(short, long, value_name = "FILE", env = "REVDASH_DATA", global = true)]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .revdash.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Generate a default .revdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// What to produce.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print every industry statistic to standard output
    Report {
        /// Number of top companies to list
        #[arg(long, value_name = "COUNT")]
        top: Option<usize>,

        /// Output format (text, json)
        #[arg(long, value_name = "FORMAT")]
        format: Option<OutputFormat>,
    },

    /// Render revenue per industry as an HTML bar chart
    Dashboard {
        /// Output file path for the dashboard
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum number of industries to plot
        #[arg(long, value_name = "COUNT")]
        max_bars: Option<usize>,

        /// Write the file without opening a viewer
        #[arg(long)]
        no_open: bool,
    },
}

/// Output format for the report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("A command is required: `report` or `dashboard`".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match self.command {
            Some(Command::Report { top: Some(0), .. }) => {
                return Err("--top must be at least 1".to_string());
            }
            Some(Command::Dashboard {
                max_bars: Some(0), ..
            }) => {
                return Err("--max-bars must be at least 1".to_string());
            }
            _ => {}
        }

        if let Some(ref data) = self.data {
            if data.is_dir() {
                return Err(format!("Data path is a directory: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.revdash.toml` files.

use crate::analysis::DEFAULT_TOP_N;
use crate::cli::{Args, Command, OutputFormat};
use crate::dashboard::{DashboardOptions, DEFAULT_DASHBOARD_OUTPUT, DEFAULT_MAX_BARS};
use crate::data::DEFAULT_DATA_PATH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".revdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the company CSV file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of companies in the top performers section.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Output format written to stdout.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            format: OutputFormat::default(),
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Output HTML file.
    #[serde(default = "default_dashboard_output")]
    pub output: PathBuf,

    /// Maximum number of industries plotted.
    #[serde(default = "default_max_bars")]
    pub max_bars: usize,

    /// Open the written file in the platform viewer.
    #[serde(default = "default_true")]
    pub open_viewer: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output: default_dashboard_output(),
            max_bars: default_max_bars(),
            open_viewer: true,
        }
    }
}

fn default_dashboard_output() -> PathBuf {
    PathBuf::from(DEFAULT_DASHBOARD_OUTPUT)
}

fn default_max_bars() -> usize {
    DEFAULT_MAX_BARS
}

fn default_true() -> bool {
    true
}

impl DashboardConfig {
    /// Options for a dashboard run.
    pub fn options(&self) -> DashboardOptions {
        DashboardOptions {
            output: self.output.clone(),
            max_bars: self.max_bars,
            open_viewer: self.open_viewer,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }

        match args.command {
            Some(Command::Report { top, format }) => {
                if let Some(top) = top {
                    self.report.top_n = top;
                }
                if let Some(format) = format {
                    self.report.format = format;
                }
            }
            Some(Command::Dashboard {
                ref output,
                max_bars,
                no_open,
            }) => {
                if let Some(output) = output {
                    self.dashboard.output = output.clone();
                }
                if let Some(max_bars) = max_bars {
                    self.dashboard.max_bars = max_bars;
                }
                if no_open {
                    self.dashboard.open_viewer = false;
                }
            }
            None => {}
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

//! Revenue dashboard rendering.
//!
//! Builds a bar chart of revenue per industry, writes it to a standalone
//! HTML file and optionally opens it in the platform viewer.

pub mod chart;

pub use chart::{DashboardError, RevenueChart, DEFAULT_MAX_BARS};

use crate::analysis::Aggregations;
use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Default location of the generated dashboard.
pub const DEFAULT_DASHBOARD_OUTPUT: &str = "revenue_dashboard.html";

/// Options for a dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Where the HTML file is written (overwritten on each run).
    pub output: PathBuf,
    /// Maximum number of industries plotted.
    pub max_bars: usize,
    /// Open the written file in the platform viewer.
    pub open_viewer: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_DASHBOARD_OUTPUT),
            max_bars: DEFAULT_MAX_BARS,
            open_viewer: true,
        }
    }
}

/// Render the revenue dashboard and return the chart that was written.
pub fn render_dashboard(
    aggregations: &Aggregations,
    options: &DashboardOptions,
) -> Result<RevenueChart> {
    let revenue = aggregations.revenue_per_industry()?;
    debug!("Plotting up to {} of {} industries", options.max_bars, revenue.len());

    let chart = RevenueChart::from_revenue(&revenue, options.max_bars, Local::now())?;
    let html = chart.to_html()?;

    std::fs::write(&options.output, html)
        .with_context(|| format!("Failed to write dashboard to {}", options.output.display()))?;
    info!("Dashboard written to {}", options.output.display());

    if options.open_viewer {
        if let Err(e) = open_in_viewer(&options.output) {
            warn!("Could not open {}: {}", options.output.display(), e);
        }
    }

    Ok(chart)
}

/// Launch the platform's default viewer for `path` without waiting for it.
fn open_in_viewer(path: &Path) -> std::io::Result<()> {
    let mut command = viewer_command(path);
    debug!("Launching viewer: {:?}", command);
    command.spawn().map(|_| ())
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

//! Data models for the revenue reporter.
//!
//! This module contains the core data structures shared by the loader,
//! the aggregation layer, the report generator and the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column holding the 0/1 "publicly traded" flag.
pub const COL_PUBLIC: &str = "Public?";
/// Column holding the grouping key.
pub const COL_INDUSTRY: &str = "Industry";
/// Column holding the current revenue.
pub const COL_REVENUE: &str = "Revenue";
/// Column holding the company name.
pub const COL_COMPANY_NAME: &str = "CompanyName";
/// Optional column holding a per-company growth rate.
pub const COL_GROWTH_RATE: &str = "GrowthRate";
/// Optional column holding last year's revenue.
pub const COL_PREV_YEAR_REVENUE: &str = "PrevYearRevenue";

/// A per-industry statistic, iterated in ascending industry order.
pub type IndustryMap = BTreeMap<String, f64>;

/// A single company row from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Company name (not guaranteed unique).
    pub name: String,
    /// Industry the company belongs to.
    pub industry: String,
    /// Current revenue.
    pub revenue: f64,
    /// Whether the company is publicly traded.
    pub public: bool,
    /// Growth rate, if the column exists and the cell is filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    /// Previous year's revenue, if the column exists and the cell is filled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_year_revenue: Option<f64>,
}

/// The loaded dataset: rows in file order plus the header it was read with.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Company>,
}

impl Table {
    /// Creates a table from its header names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Company>) -> Self {
        Self { columns, rows }
    }

    /// Header names as they appeared in the file.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[Company] {
        &self.rows
    }

    /// Whether the header contains the given column (case-sensitive).
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Descriptive statistics for one numeric column within a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `NaN` for a single value.
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub p25: f64,
    #[serde(rename = "50%")]
    pub p50: f64,
    #[serde(rename = "75%")]
    pub p75: f64,
    pub max: f64,
}

/// Per-industry revenue statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndustryStatistics {
    pub mean_revenue: IndustryMap,
    pub median_revenue: IndustryMap,
    pub std_revenue: IndustryMap,
    /// Mean growth rate; `None` when the dataset has no `GrowthRate` column.
    pub growth_rate: Option<IndustryMap>,
}

impl IndustryStatistics {
    /// Metric name / values pairs in display order.
    pub fn metrics(&self) -> Vec<(&'static str, Option<&IndustryMap>)> {
        vec![
            ("mean_revenue", Some(&self.mean_revenue)),
            ("median_revenue", Some(&self.median_revenue)),
            ("std_revenue", Some(&self.std_revenue)),
            ("growth_rate", self.growth_rate.as_ref()),
        ]
    }
}

/// A row of the top performing companies view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCompany {
    pub company_name: String,
    pub industry: String,
    pub revenue: f64,
}

impl From<&Company> for TopCompany {
    fn from(company: &Company) -> Self {
        Self {
            company_name: company.name.clone(),
            industry: company.industry.clone(),
            revenue: company.revenue,
        }
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Path of the dataset the report was computed from.
    pub data_path: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of companies listed in the top performers section.
    pub top_n: usize,
}

/// The complete statistics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub public_organizations: usize,
    pub revenue_per_industry: IndustryMap,
    pub highest_revenue_industry: String,
    pub industry_statistics: IndustryStatistics,
    pub top_companies: Vec<TopCompany>,
    pub year_over_year_growth: IndustryMap,
    pub market_share: IndustryMap,
    pub revenue_quartiles: BTreeMap<String, DescriptiveStats>,
}

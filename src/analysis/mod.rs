//! Aggregation layer.
//!
//! [`Aggregations`] exposes one method per statistic. Each method reloads the
//! dataset from disk, so consecutive calls always reflect the current file.

pub mod aggregator;
pub mod descriptive;

pub use aggregator::{StatsError, DEFAULT_TOP_N};

use crate::data::{load_table, require_columns};
use crate::models::{
    DescriptiveStats, IndustryMap, IndustryStatistics, Table, TopCompany, COL_COMPANY_NAME,
    COL_INDUSTRY, COL_PUBLIC, COL_REVENUE,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns read by the per-industry revenue statistics.
const INDUSTRY_REVENUE: &[&str] = &[COL_INDUSTRY, COL_REVENUE];

/// Query entry point bound to a dataset path.
#[derive(Debug, Clone)]
pub struct Aggregations {
    data_path: PathBuf,
}

impl Aggregations {
    /// Create an aggregation handle for the dataset at `data_path`.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Reload the dataset and check that the columns `operation` reads exist.
    fn load(&self, operation: &str, columns: &[&str]) -> Result<Table> {
        debug!("{}: loading {}", operation, self.data_path.display());
        let table = load_table(&self.data_path).with_context(|| {
            format!(
                "{} failed to load dataset {}",
                operation,
                self.data_path.display()
            )
        })?;
        require_columns(&table, columns).with_context(|| {
            format!(
                "{} cannot run on dataset {}",
                operation,
                self.data_path.display()
            )
        })?;
        Ok(table)
    }

    /// Number of publicly traded organizations.
    pub fn count_public_organizations(&self) -> Result<usize> {
        let table = self.load("count_public_organizations", &[COL_PUBLIC])?;
        let count = aggregator::count_public_organizations(&table);
        info!("There are {} public organizations.", count);
        Ok(count)
    }

    /// Average revenue per row, per industry.
    pub fn revenue_per_industry(&self) -> Result<IndustryMap> {
        let table = self.load("revenue_per_industry", INDUSTRY_REVENUE)?;
        Ok(aggregator::revenue_per_industry(&table))
    }

    /// Industry with the largest total revenue.
    pub fn highest_revenue_industry(&self) -> Result<String> {
        let table = self.load("highest_revenue_industry", INDUSTRY_REVENUE)?;
        aggregator::highest_revenue_industry(&table)
            .context("highest_revenue_industry: no industries to compare")
    }

    /// Mean, median and std of revenue, and mean growth rate, per industry.
    pub fn industry_statistics(&self) -> Result<IndustryStatistics> {
        let table = self.load("industry_statistics", INDUSTRY_REVENUE)?;
        Ok(aggregator::industry_statistics(&table))
    }

    /// The `n` companies with the largest revenue.
    pub fn top_performing_companies(&self, n: usize) -> Result<Vec<TopCompany>> {
        let table = self.load(
            "top_performing_companies",
            &[COL_COMPANY_NAME, COL_INDUSTRY, COL_REVENUE],
        )?;
        Ok(aggregator::top_performing_companies(&table, n))
    }

    /// Year-over-year revenue growth per industry; empty without previous-year data.
    pub fn year_over_year_growth(&self) -> Result<IndustryMap> {
        let table = self.load("year_over_year_growth", INDUSTRY_REVENUE)?;
        Ok(aggregator::year_over_year_growth(&table))
    }

    /// Descriptive revenue statistics per industry.
    pub fn revenue_quartiles(&self) -> Result<BTreeMap<String, DescriptiveStats>> {
        let table = self.load("revenue_quartiles", INDUSTRY_REVENUE)?;
        Ok(aggregator::revenue_quartiles(&table))
    }

    /// Percentage of total revenue per industry.
    pub fn market_share(&self) -> Result<IndustryMap> {
        let table = self.load("market_share", INDUSTRY_REVENUE)?;
        Ok(aggregator::market_share(&table))
    }
}

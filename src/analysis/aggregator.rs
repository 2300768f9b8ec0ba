//! Industry aggregation over a loaded table.
//!
//! These functions are pure: they take a [`Table`] and derive one statistic.
//! Grouped results only contain industries that occur in the table. Rows
//! with an empty `Industry` cell belong to no group.

use crate::analysis::descriptive::{self, sum};
use crate::models::{
    Company, DescriptiveStats, IndustryMap, IndustryStatistics, Table, TopCompany,
    COL_GROWTH_RATE, COL_PREV_YEAR_REVENUE,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Number of companies listed by default in the top performers view.
pub const DEFAULT_TOP_N: usize = 5;

/// Errors raised by aggregations that need at least one row.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("dataset contains no rows with an industry")]
    EmptyTable,
}

/// Rows that carry an industry, in file order.
fn grouped_rows(table: &Table) -> impl Iterator<Item = &Company> {
    table.rows().iter().filter(|r| !r.industry.is_empty())
}

/// Group a per-row value by industry, keeping row order within each group.
pub fn group_by_industry<F>(table: &Table, value: F) -> BTreeMap<String, Vec<f64>>
where
    F: Fn(&Company) -> Option<f64>,
{
    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for row in grouped_rows(table) {
        let entry = grouped.entry(row.industry.clone()).or_default();
        if let Some(v) = value(row) {
            entry.push(v);
        }
    }

    grouped
}

/// Reduce each industry group to a single value.
fn reduce_groups<F>(grouped: &BTreeMap<String, Vec<f64>>, reduce: F) -> IndustryMap
where
    F: Fn(&[f64]) -> f64,
{
    grouped
        .iter()
        .map(|(industry, values)| (industry.clone(), reduce(values)))
        .collect()
}

/// Total revenue per industry.
pub fn revenue_sum_by_industry(table: &Table) -> IndustryMap {
    reduce_groups(&group_by_industry(table, |r| Some(r.revenue)), sum)
}

/// Count rows flagged as publicly traded.
pub fn count_public_organizations(table: &Table) -> usize {
    table.rows().iter().filter(|r| r.public).count()
}

/// Revenue sum divided by row count, per industry.
pub fn revenue_per_industry(table: &Table) -> IndustryMap {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in grouped_rows(table) {
        *counts.entry(row.industry.as_str()).or_default() += 1;
    }

    revenue_sum_by_industry(table)
        .into_iter()
        .map(|(industry, total)| {
            let count = counts.get(industry.as_str()).copied().unwrap_or(0);
            let ratio = total / count as f64;
            (industry, ratio)
        })
        .collect()
}

/// Industry with the largest revenue sum.
///
/// Ties resolve to the first industry in ascending key order.
pub fn highest_revenue_industry(table: &Table) -> Result<String, StatsError> {
    let mut best: Option<(String, f64)> = None;

    for (industry, total) in revenue_sum_by_industry(table) {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((industry, total)),
        }
    }

    best.map(|(industry, _)| industry)
        .ok_or(StatsError::EmptyTable)
}

/// Mean, median and std of revenue per industry, plus mean growth rate.
pub fn industry_statistics(table: &Table) -> IndustryStatistics {
    let revenue = group_by_industry(table, |r| Some(r.revenue));

    let growth_rate = if table.has_column(COL_GROWTH_RATE) {
        let growth = group_by_industry(table, |r| r.growth_rate);
        Some(reduce_groups(&growth, descriptive::mean))
    } else {
        None
    };

    IndustryStatistics {
        mean_revenue: reduce_groups(&revenue, descriptive::mean),
        median_revenue: reduce_groups(&revenue, descriptive::median),
        std_revenue: reduce_groups(&revenue, descriptive::sample_std),
        growth_rate,
    }
}

/// The `n` companies with the largest revenue.
///
/// Ties keep file order. Rows without a revenue value are never selected.
pub fn top_performing_companies(table: &Table, n: usize) -> Vec<TopCompany> {
    let mut rows: Vec<&Company> = table.rows().iter().filter(|r| !r.revenue.is_nan()).collect();

    // Stable sort keeps file order among equal revenues
    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows.truncate(n);

    rows.into_iter().map(TopCompany::from).collect()
}

/// Percentage change from previous-year revenue to current revenue, per industry.
///
/// Returns an empty map when the dataset has no `PrevYearRevenue` column.
pub fn year_over_year_growth(table: &Table) -> IndustryMap {
    if !table.has_column(COL_PREV_YEAR_REVENUE) {
        return IndustryMap::new();
    }

    let current = revenue_sum_by_industry(table);
    let previous = reduce_groups(
        &group_by_industry(table, |r| r.prev_year_revenue),
        sum,
    );

    current
        .into_iter()
        .map(|(industry, cur)| {
            let prev = previous.get(&industry).copied().unwrap_or(0.0);
            let growth = (cur - prev) / prev * 100.0;
            (industry, growth)
        })
        .collect()
}

/// Descriptive statistics of revenue per industry.
pub fn revenue_quartiles(table: &Table) -> BTreeMap<String, DescriptiveStats> {
    group_by_industry(table, |r| Some(r.revenue))
        .into_iter()
        .map(|(industry, values)| (industry, DescriptiveStats::compute(&values)))
        .collect()
}

/// Share of total revenue per industry, as a percentage.
pub fn market_share(table: &Table) -> IndustryMap {
    let revenues: Vec<f64> = table.rows().iter().map(|r| r.revenue).collect();
    let total = sum(&revenues);

    revenue_sum_by_industry(table)
        .into_iter()
        .map(|(industry, industry_total)| (industry, industry_total / total * 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{COL_COMPANY_NAME, COL_INDUSTRY, COL_PUBLIC, COL_REVENUE};

    fn create_company(name: &str, industry: &str, revenue: f64, public: bool) -> Company {
        Company {
            name: name.to_string(),
            industry: industry.to_string(),
            revenue,
            public,
            growth_rate: None,
            prev_year_revenue: None,
        }
    }

    fn base_columns() -> Vec<String> {
        [COL_COMPANY_NAME, COL_INDUSTRY, COL_REVENUE, COL_PUBLIC]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn create_table(rows: Vec<Company>) -> Table {
        Table::new(base_columns(), rows)
    }

    fn fixture_table() -> Table {
        let path =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/companies.csv");
        crate::data::load_table(&path).unwrap()
    }

    #[test]
    fn test_count_public_organizations() {
        let table = fixture_table();
        assert_eq!(count_public_organizations(&table), 4);
        // Idempotent over the same data
        assert_eq!(count_public_organizations(&table), 4);
    }

    #[test]
    fn test_revenue_per_industry_known_values() {
        let result = revenue_per_industry(&fixture_table());

        assert_eq!(result["Wireless"], 3_560_000.0);
        assert_eq!(result["Textiles"], 4_285_000.0);
        assert_eq!(result["Accounting"], 2_930_000.0);
    }

    #[test]
    fn test_revenue_per_industry_is_sum_over_count() {
        let table = fixture_table();
        let result = revenue_per_industry(&table);

        for (industry, value) in &result {
            let rows: Vec<_> = table
                .rows()
                .iter()
                .filter(|r| &r.industry == industry)
                .collect();
            let expected = rows.iter().map(|r| r.revenue).sum::<f64>() / rows.len() as f64;
            assert!((value - expected).abs() < 1e-6, "{industry}");
        }
    }

    #[test]
    fn test_absent_industries_are_not_keys() {
        let result = revenue_per_industry(&fixture_table());
        for invalid in ["NonExistent", "Invalid", "NotReal"] {
            assert!(!result.contains_key(invalid));
        }
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_highest_revenue_industry() {
        assert_eq!(highest_revenue_industry(&fixture_table()).unwrap(), "Software");
    }

    #[test]
    fn test_highest_revenue_industry_single_dominant() {
        let table = create_table(vec![
            create_company("A", "Mining", 10.0, false),
            create_company("B", "Retail", 500.0, false),
            create_company("C", "Mining", 20.0, false),
        ]);
        assert_eq!(highest_revenue_industry(&table).unwrap(), "Retail");
    }

    #[test]
    fn test_highest_revenue_industry_tie_takes_first_key() {
        let table = create_table(vec![
            create_company("A", "Zinc", 100.0, false),
            create_company("B", "Apparel", 100.0, false),
        ]);
        assert_eq!(highest_revenue_industry(&table).unwrap(), "Apparel");
    }

    #[test]
    fn test_highest_revenue_industry_empty() {
        let table = create_table(Vec::new());
        assert_eq!(highest_revenue_industry(&table), Err(StatsError::EmptyTable));
    }

    #[test]
    fn test_industry_statistics() {
        let stats = industry_statistics(&fixture_table());

        assert_eq!(stats.mean_revenue["Textiles"], 4_285_000.0);
        assert_eq!(stats.median_revenue["Textiles"], 4_285_000.0);
        let expected_std = 715_000.0 * 2f64.sqrt();
        assert!((stats.std_revenue["Textiles"] - expected_std).abs() < 1e-6);
        assert!(stats.std_revenue["Wireless"].is_nan());

        let growth = stats.growth_rate.expect("fixture has GrowthRate");
        // Empty cell for Threadworks is skipped
        assert_eq!(growth["Textiles"], 4.0);
        assert!((growth["Software"] - 65.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_industry_statistics_without_growth_column() {
        let table = create_table(vec![create_company("A", "Retail", 1.0, false)]);
        assert!(industry_statistics(&table).growth_rate.is_none());
    }

    #[test]
    fn test_top_performing_companies() {
        let table = fixture_table();
        let top = top_performing_companies(&table, DEFAULT_TOP_N);

        let names: Vec<_> = top.iter().map(|c| c.company_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Byte Forge", "Cloudnine", "Loom & Co", "Threadworks", "Acme Wireless"]
        );

        let min_selected = top.iter().map(|c| c.revenue).fold(f64::INFINITY, f64::min);
        for row in table.rows() {
            if !top.iter().any(|c| c.company_name == row.name) {
                assert!(row.revenue <= min_selected);
            }
        }
    }

    #[test]
    fn test_top_performing_companies_fewer_rows_than_n() {
        let table = create_table(vec![
            create_company("A", "Retail", 1.0, false),
            create_company("B", "Retail", 2.0, false),
        ]);
        let top = top_performing_companies(&table, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].company_name, "B");
    }

    #[test]
    fn test_top_performing_companies_ties_keep_file_order() {
        let table = create_table(vec![
            create_company("First", "Retail", 5.0, false),
            create_company("Second", "Retail", 5.0, false),
            create_company("Third", "Retail", 5.0, false),
            create_company("Missing", "Retail", f64::NAN, false),
        ]);
        let top = top_performing_companies(&table, 2);
        assert_eq!(top[0].company_name, "First");
        assert_eq!(top[1].company_name, "Second");
    }

    #[test]
    fn test_year_over_year_growth() {
        let growth = year_over_year_growth(&fixture_table());

        assert!((growth["Accounting"] - 17.2).abs() < 1e-9);
        assert!((growth["Agriculture"] + 100.0 / 9.0).abs() < 1e-9);
        assert_eq!(growth.len(), 5);
    }

    #[test]
    fn test_year_over_year_growth_without_column_is_empty() {
        let table = create_table(vec![create_company("A", "Retail", 1.0, false)]);
        assert!(year_over_year_growth(&table).is_empty());
    }

    #[test]
    fn test_year_over_year_growth_zero_previous_is_infinite() {
        let mut columns = base_columns();
        columns.push(COL_PREV_YEAR_REVENUE.to_string());
        let mut row = create_company("A", "Retail", 10.0, false);
        row.prev_year_revenue = Some(0.0);

        let growth = year_over_year_growth(&Table::new(columns, vec![row]));
        assert_eq!(growth["Retail"], f64::INFINITY);
    }

    #[test]
    fn test_revenue_quartiles() {
        let quartiles = revenue_quartiles(&fixture_table());
        let software = quartiles["Software"];

        assert_eq!(software.count, 3);
        assert_eq!(software.min, 1_200_000.0);
        assert_eq!(software.p25, 3_800_000.0);
        assert_eq!(software.p50, 6_400_000.0);
        assert_eq!(software.p75, 7_750_000.0);
        assert_eq!(software.max, 9_100_000.0);
    }

    #[test]
    fn test_market_share_sums_to_hundred() {
        let share = market_share(&fixture_table());
        let total: f64 = share.values().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_market_share_zero_total_is_nan() {
        let table = create_table(vec![create_company("A", "Retail", 0.0, false)]);
        assert!(market_share(&table)["Retail"].is_nan());
    }

    #[test]
    fn test_empty_industry_rows_belong_to_no_group() {
        let mut growing = create_company("D", "Retail", 30.0, false);
        growing.prev_year_revenue = Some(20.0);
        let mut rows = vec![
            create_company("A", "Retail", 100.0, true),
            create_company("B", "", 50.0, false),
            create_company("C", "", f64::NAN, false),
        ];
        for row in rows.iter_mut() {
            row.prev_year_revenue = Some(10.0);
        }
        rows.push(growing);
        let mut columns = base_columns();
        columns.push(COL_PREV_YEAR_REVENUE.to_string());
        let table = Table::new(columns, rows);

        assert!(!revenue_per_industry(&table).contains_key(""));
        assert_eq!(revenue_per_industry(&table)["Retail"], 65.0);
        assert!(!revenue_quartiles(&table).contains_key(""));
        assert!(!industry_statistics(&table).mean_revenue.contains_key(""));
        assert!(!year_over_year_growth(&table).contains_key(""));
        assert_eq!(highest_revenue_industry(&table).unwrap(), "Retail");

        // Unassigned revenue still counts toward the grand total
        let share = market_share(&table);
        assert_eq!(share.len(), 1);
        assert!((share["Retail"] - 130.0 / 180.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_highest_revenue_industry_without_industries() {
        let table = create_table(vec![create_company("A", "", 10.0, false)]);
        assert_eq!(highest_revenue_industry(&table), Err(StatsError::EmptyTable));
    }
}

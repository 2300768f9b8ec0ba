//! Statistics report generation.
//!
//! This module runs every aggregation in a fixed order and renders the
//! results as plain text for the terminal or as JSON.

use crate::analysis::Aggregations;
use crate::models::{
    DescriptiveStats, IndustryMap, IndustryStatistics, Report, ReportMetadata, TopCompany,
};
use anyhow::Result;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

/// Run every aggregation in sequence and collect the results.
///
/// The first failing aggregation aborts the rest.
pub fn build_report(aggregations: &Aggregations, top_n: usize) -> Result<Report> {
    info!("Building report from {}", aggregations.data_path().display());

    let public_organizations = aggregations.count_public_organizations()?;
    let revenue_per_industry = aggregations.revenue_per_industry()?;
    let highest_revenue_industry = aggregations.highest_revenue_industry()?;
    let industry_statistics = aggregations.industry_statistics()?;
    let top_companies = aggregations.top_performing_companies(top_n)?;
    let year_over_year_growth = aggregations.year_over_year_growth()?;
    let market_share = aggregations.market_share()?;
    let revenue_quartiles = aggregations.revenue_quartiles()?;

    Ok(Report {
        metadata: ReportMetadata {
            data_path: aggregations.data_path().display().to_string(),
            generated_at: Utc::now(),
            top_n,
        },
        public_organizations,
        revenue_per_industry,
        highest_revenue_industry,
        industry_statistics,
        top_companies,
        year_over_year_growth,
        market_share,
        revenue_quartiles,
    })
}

/// Generate the human-readable text report.
pub fn generate_text_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "There are {} public organizations.\n",
        report.public_organizations
    ));
    output.push_str(&format!(
        "Number of public organizations: {}\n",
        report.public_organizations
    ));

    output.push_str("Revenue per industry:\n");
    output.push_str(&generate_industry_lines(&report.revenue_per_industry, format_amount));

    output.push_str(&format!(
        "Industry with the highest revenue: {}\n",
        report.highest_revenue_industry
    ));

    output.push_str(&generate_statistics_section(&report.industry_statistics));

    output.push_str(&format!(
        "\nTop {} Performing Companies:\n",
        report.metadata.top_n
    ));
    output.push_str(&generate_top_companies_table(&report.top_companies));

    output.push_str("\nYear-over-Year Growth by Industry:\n");
    if report.year_over_year_growth.is_empty() {
        output.push_str("  (no previous-year revenue data)\n");
    } else {
        output.push_str(&generate_industry_lines(
            &report.year_over_year_growth,
            format_percent,
        ));
    }

    output.push_str("\nMarket Share by Industry:\n");
    output.push_str(&generate_industry_lines(&report.market_share, format_percent));

    output.push_str("\nRevenue Quartiles by Industry:\n");
    output.push_str(&generate_quartiles_table(&report.revenue_quartiles));

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// One aligned `industry  value` line per entry.
fn generate_industry_lines(values: &IndustryMap, format: fn(f64) -> String) -> String {
    if values.is_empty() {
        return "  (no data)\n".to_string();
    }

    let width = values.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let rendered: Vec<String> = values.values().map(|v| format(*v)).collect();
    let value_width = rendered.iter().map(String::len).max().unwrap_or(0);

    let mut lines = String::new();
    for (industry, value) in values.keys().zip(rendered) {
        lines.push_str(&format!(
            "  {:<width$}  {:>value_width$}\n",
            industry,
            value,
            width = width,
            value_width = value_width
        ));
    }
    lines
}

/// Generate the per-metric industry statistics section.
fn generate_statistics_section(stats: &IndustryStatistics) -> String {
    let mut section = String::from("\nIndustry Statistics:\n");

    for (metric, values) in stats.metrics() {
        section.push_str(&format!("\n{}:\n", metric));
        match values {
            Some(values) if metric == "growth_rate" => {
                section.push_str(&generate_industry_lines(values, format_percent))
            }
            Some(values) => section.push_str(&generate_industry_lines(values, format_amount)),
            None => section.push_str("  None\n"),
        }
    }

    section
}

/// Generate the top companies table.
fn generate_top_companies_table(companies: &[TopCompany]) -> String {
    if companies.is_empty() {
        return "  (no companies)\n".to_string();
    }

    let name_width = companies
        .iter()
        .map(|c| c.company_name.chars().count())
        .chain(std::iter::once("CompanyName".len()))
        .max()
        .unwrap_or(0);
    let industry_width = companies
        .iter()
        .map(|c| c.industry.chars().count())
        .chain(std::iter::once("Industry".len()))
        .max()
        .unwrap_or(0);

    let mut table = format!(
        "  {:<nw$}  {:<iw$}  {:>16}\n",
        "CompanyName",
        "Industry",
        "Revenue",
        nw = name_width,
        iw = industry_width
    );

    for company in companies {
        table.push_str(&format!(
            "  {:<nw$}  {:<iw$}  {:>16}\n",
            company.company_name,
            company.industry,
            format_amount(company.revenue),
            nw = name_width,
            iw = industry_width
        ));
    }

    table
}

/// Generate the descriptive statistics table.
fn generate_quartiles_table(quartiles: &BTreeMap<String, DescriptiveStats>) -> String {
    if quartiles.is_empty() {
        return "  (no data)\n".to_string();
    }

    let width = quartiles
        .keys()
        .map(|k| k.chars().count())
        .chain(std::iter::once("Industry".len()))
        .max()
        .unwrap_or(0);

    let mut table = format!("  {:<width$}  {:>5}", "Industry", "count", width = width);
    for header in ["mean", "std", "min", "25%", "50%", "75%", "max"] {
        table.push_str(&format!("  {:>16}", header));
    }
    table.push('\n');

    for (industry, stats) in quartiles {
        table.push_str(&format!(
            "  {:<width$}  {:>5}",
            industry,
            stats.count,
            width = width
        ));
        for value in [
            stats.mean, stats.std, stats.min, stats.p25, stats.p50, stats.p75, stats.max,
        ] {
            table.push_str(&format!("  {:>16}", format_amount(value)));
        }
        table.push('\n');
    }

    table
}

/// Format a number with thousands separators and two decimals.
///
/// Non-finite values render as `NaN`, `inf` or `-inf`.
pub fn format_amount(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted != "0.00";
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// Format a value as dollars, e.g. `$1,234.50`.
pub fn format_currency(value: f64) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(rest) if value.is_finite() => format!("-${}", rest),
        _ if value.is_finite() => format!("${}", amount),
        _ => amount,
    }
}

fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value)
    } else {
        format_amount(value)
    }
}

//! Bar chart model and HTML rendering for the revenue dashboard.
//!
//! The chart is a Plotly figure serialized to JSON and embedded in a
//! single HTML page. Plotly.js itself is fetched from its CDN when the page
//! opens; without network access the page shows the same bars as a plain
//! table instead.

use crate::analysis::descriptive;
use crate::models::IndustryMap;
use crate::report::{format_amount, format_currency};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Default number of industries plotted.
pub const DEFAULT_MAX_BARS: usize = 25;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_ELEMENT_ID: &str = "revenue-dashboard";
const TABLE_ELEMENT_ID: &str = "revenue-table";

/// Errors raised while building or writing the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no industries to plot: the dataset is empty")]
    NoData,

    #[error("failed to serialize chart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Summary over the full (not truncated) revenue series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total: f64,
    pub mean: f64,
    pub median: f64,
}

/// A single bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub industry: String,
    pub revenue: f64,
}

/// Everything needed to draw the dashboard.
#[derive(Debug, Clone)]
pub struct RevenueChart {
    /// Displayed bars, highest revenue first.
    pub bars: Vec<Bar>,
    /// Statistics over every industry, including ones not displayed.
    pub summary: RevenueSummary,
    /// Mean of the displayed bars; drawn as the reference line.
    pub displayed_mean: f64,
    pub generated_at: DateTime<Local>,
}

impl RevenueChart {
    /// Sort `revenue` descending, keep the top `max_bars`, and summarize.
    pub fn from_revenue(
        revenue: &IndustryMap,
        max_bars: usize,
        generated_at: DateTime<Local>,
    ) -> Result<Self, DashboardError> {
        if revenue.is_empty() {
            return Err(DashboardError::NoData);
        }

        let values: Vec<f64> = revenue.values().copied().collect();
        let summary = RevenueSummary {
            total: descriptive::sum(&values),
            mean: descriptive::mean(&values),
            median: descriptive::median(&values),
        };

        let mut bars: Vec<Bar> = revenue
            .iter()
            .map(|(industry, revenue)| Bar {
                industry: industry.clone(),
                revenue: *revenue,
            })
            .collect();
        // Descending, NaN last
        bars.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or_else(|| a.revenue.is_nan().cmp(&b.revenue.is_nan()))
        });
        bars.truncate(max_bars);

        let displayed: Vec<f64> = bars.iter().map(|b| b.revenue).collect();
        let displayed_mean = descriptive::mean(&displayed);

        Ok(Self {
            bars,
            summary,
            displayed_mean,
            generated_at,
        })
    }

    /// Dashboard title including the generation timestamp.
    pub fn title(&self) -> String {
        format!(
            "Revenue Analysis Dashboard (Updated: {})",
            self.generated_at.format("%Y-%m-%d %H:%M")
        )
    }

    /// Text of the summary annotation box.
    pub fn annotation_text(&self) -> String {
        format!(
            "Total Revenue: {}<br>Average Revenue: {}<br>Median Revenue: {}",
            format_currency(self.summary.total),
            format_currency(self.summary.mean),
            format_currency(self.summary.median)
        )
    }

    /// Build the Plotly figure (`data` and `layout`).
    pub fn figure(&self) -> Value {
        let industries: Vec<&str> = self.bars.iter().map(|b| b.industry.as_str()).collect();
        let revenues: Vec<f64> = self.bars.iter().map(|b| b.revenue).collect();
        let labels: Vec<String> = revenues.iter().map(|v| format_amount(*v)).collect();
        let mean_line = vec![self.displayed_mean; self.bars.len()];

        json!({
            "data": [
                {
                    "type": "bar",
                    "name": "Revenue",
                    "x": industries,
                    "y": revenues,
                    "text": labels,
                    "textposition": "auto",
                    "hovertemplate": "Industry: %{x}<br>Revenue: $%{y:,.2f}<extra></extra>",
                },
                {
                    "type": "scatter",
                    "mode": "lines",
                    "name": "Average",
                    "x": industries,
                    "y": mean_line,
                    "line": { "color": "red", "dash": "dash" },
                }
            ],
            "layout": {
                "title": {
                    "text": self.title(),
                    "y": 0.95,
                    "x": 0.5,
                    "xanchor": "center",
                    "yanchor": "top",
                },
                "xaxis": { "title": { "text": "Industry" }, "tickangle": 45 },
                "yaxis": { "title": { "text": "Revenue ($)" } },
                "paper_bgcolor": "white",
                "plot_bgcolor": "white",
                "margin": { "r": 240 },
                "annotations": [
                    {
                        "text": self.annotation_text(),
                        "showarrow": false,
                        "xref": "paper",
                        "yref": "paper",
                        "x": 1.1,
                        "y": 0.5,
                        "xanchor": "left",
                        "align": "left",
                        "bordercolor": "#c7c7c7",
                        "borderwidth": 1,
                    }
                ],
            },
        })
    }

    /// Render the chart as one HTML file.
    ///
    /// The figure data is inlined; the Plotly.js library is loaded from
    /// [`PLOTLY_CDN`]. A static table of the bars is rendered too and stays
    /// visible when the library cannot be fetched.
    pub fn to_html(&self) -> Result<String, DashboardError> {
        // "</" inside a <script> body would close the tag early
        let figure = serde_json::to_string(&self.figure())?.replace("</", "<\\/");

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<title>Revenue Analysis Dashboard</title>\n");
        html.push_str(&format!(
            "<script src=\"{}\" charset=\"utf-8\"></script>\n",
            PLOTLY_CDN
        ));
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!(
            "<div id=\"{}\" style=\"width:100%;height:90vh;\"></div>\n",
            CHART_ELEMENT_ID
        ));
        html.push_str(&self.fallback_table());
        html.push_str("<script>\n");
        html.push_str(&format!("const figure = {};\n", figure));
        html.push_str("if (typeof Plotly !== \"undefined\") {\n");
        html.push_str(&format!(
            "  document.getElementById(\"{}\").hidden = true;\n",
            TABLE_ELEMENT_ID
        ));
        html.push_str(&format!(
            "  Plotly.newPlot(\"{}\", figure.data, figure.layout, {{responsive: true}});\n",
            CHART_ELEMENT_ID
        ));
        html.push_str("}\n");
        html.push_str("</script>\n</body>\n</html>\n");

        Ok(html)
    }

    /// Plain HTML table of the displayed bars.
    fn fallback_table(&self) -> String {
        let mut table = format!("<table id=\"{}\">\n", TABLE_ELEMENT_ID);
        table.push_str(&format!("<caption>{}</caption>\n", escape_html(&self.title())));
        table.push_str("<tr><th>Industry</th><th>Revenue</th></tr>\n");
        for bar in &self.bars {
            table.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                escape_html(&bar.industry),
                format_currency(bar.revenue)
            ));
        }
        table.push_str("</table>\n");
        table
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

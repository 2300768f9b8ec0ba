//! Descriptive statistics over a slice of values.
//!
//! Missing values (`NaN`) are skipped. Functions over an empty input
//! return `NaN` rather than failing.

use crate::models::DescriptiveStats;
use std::cmp::Ordering;

/// Sum of the non-NaN values; 0.0 when there are none.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().filter(|v| !v.is_nan()).sum()
}

/// Arithmetic mean of the non-NaN values.
pub fn mean(values: &[f64]) -> f64 {
    let present = present(values);
    if present.is_empty() {
        return f64::NAN;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

/// Median of the non-NaN values.
pub fn median(values: &[f64]) -> f64 {
    quantile(values, 0.5)
}

/// Sample standard deviation (n - 1) of the non-NaN values.
pub fn sample_std(values: &[f64]) -> f64 {
    let present = present(values);
    let n = present.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean = present.iter().sum::<f64>() / n as f64;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

/// Quantile `q` in `[0, 1]` with linear interpolation between closest ranks.
pub fn quantile(values: &[f64], q: f64) -> f64 {
    let sorted = sorted(values);
    quantile_sorted(&sorted, q)
}

fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn present(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut vals = present(values);
    vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    vals
}

impl DescriptiveStats {
    /// Compute count, mean, std, min, quartiles and max.
    pub fn compute(values: &[f64]) -> Self {
        let sorted = sorted(values);

        Self {
            count: sorted.len(),
            mean: mean(&sorted),
            std: sample_std(&sorted),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            p25: quantile_sorted(&sorted, 0.25),
            p50: quantile_sorted(&sorted, 0.5),
            p75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

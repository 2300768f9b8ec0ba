//! CSV loading for the company dataset.
//!
//! Every call re-reads and re-parses the file; nothing is cached.

use crate::models::{
    Company, Table, COL_COMPANY_NAME, COL_GROWTH_RATE, COL_INDUSTRY, COL_PREV_YEAR_REVENUE,
    COL_PUBLIC, COL_REVENUE,
};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default location of the dataset, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/data.csv";

/// Errors raised while loading the dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("line {line}: invalid value {value:?} in column `{column}`")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },
}

/// Load the dataset at `path` into a [`Table`].
///
/// Column presence is not checked here; callers use [`require_columns`]
/// for the columns their computation reads.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let header_map = build_header_map(&headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let record = result?;
        rows.push(parse_row(&record, &header_map, line)?);
    }

    let columns = headers.iter().map(normalize_header_name).collect();
    let table = Table::new(columns, rows);
    debug!(
        "Loaded {} rows from {} with columns {:?}",
        table.len(),
        path.display(),
        table.columns()
    );

    Ok(table)
}

/// Fail with [`LoadError::MissingColumn`] for the first of `columns` not in `table`.
pub fn require_columns(table: &Table, columns: &[&str]) -> Result<(), LoadError> {
    match columns.iter().find(|c| !table.has_column(c)) {
        Some(missing) => Err(LoadError::MissingColumn(missing.to_string())),
        None => Ok(()),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<Company, LoadError> {
    let name = get_cell(record, header_map, COL_COMPANY_NAME)
        .unwrap_or_default()
        .to_string();
    let industry = get_cell(record, header_map, COL_INDUSTRY)
        .unwrap_or_default()
        .to_string();

    let revenue = match get_cell(record, header_map, COL_REVENUE) {
        Some(raw) => parse_number(raw, COL_REVENUE, line)?,
        None => f64::NAN,
    };

    let public = match get_cell(record, header_map, COL_PUBLIC) {
        Some(raw) => parse_flag(raw, line)?,
        None => false,
    };

    let growth_rate = get_cell(record, header_map, COL_GROWTH_RATE)
        .map(|raw| parse_number(raw, COL_GROWTH_RATE, line))
        .transpose()?;
    let prev_year_revenue = get_cell(record, header_map, COL_PREV_YEAR_REVENUE)
        .map(|raw| parse_number(raw, COL_PREV_YEAR_REVENUE, line))
        .transpose()?;

    Ok(Company {
        name,
        industry,
        revenue,
        public,
        growth_rate,
        prev_year_revenue,
    })
}

/// Non-empty cell value for `name`, or `None` if the column or value is missing.
fn get_cell<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(raw: &str, column: &str, line: usize) -> Result<f64, LoadError> {
    raw.replace(',', "")
        .parse::<f64>()
        .map_err(|_| LoadError::InvalidValue {
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn parse_flag(raw: &str, line: usize) -> Result<bool, LoadError> {
    match raw.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => parse_number(raw, COL_PUBLIC, line).map(|v| v == 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("data.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_fixture() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/companies.csv");
        let table = load_table(&path).unwrap();

        assert_eq!(table.len(), 8);
        assert!(table.has_column(COL_GROWTH_RATE));
        assert!(table.has_column(COL_PREV_YEAR_REVENUE));

        let first = &table.rows()[0];
        assert_eq!(first.name, "Acme Wireless");
        assert_eq!(first.industry, "Wireless");
        assert_eq!(first.revenue, 3_560_000.0);
        assert!(first.public);
    }

    #[test]
    fn test_optional_columns_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "CompanyName,Industry,Revenue,Public?\nA,Retail,100,1\nB,Retail,50,0\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.has_column(COL_GROWTH_RATE));
        assert!(table.rows().iter().all(|r| r.prev_year_revenue.is_none()));
    }

    #[test]
    fn test_empty_optional_cell_is_missing() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "CompanyName,Industry,Revenue,Public?,GrowthRate\nA,Retail,100,1,\nB,Retail,50,0,3.5\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.rows()[0].growth_rate, None);
        assert_eq!(table.rows()[1].growth_rate, Some(3.5));
    }

    #[test]
    fn test_bom_and_whitespace_in_header() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "\u{feff}CompanyName , Industry,Revenue,Public?\nA,Retail,100,1.0\n",
        );

        let table = load_table(&path).unwrap();
        assert!(table.has_column(COL_COMPANY_NAME));
        assert!(table.rows()[0].public);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_table(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn test_missing_column_is_reported_on_demand() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "CompanyName,Industry,Public?\nA,Retail,1\n");

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns(), ["CompanyName", "Industry", "Public?"]);
        assert!(table.rows()[0].revenue.is_nan());
        assert!(require_columns(&table, &[COL_PUBLIC]).is_ok());

        let err = require_columns(&table, &[COL_INDUSTRY, COL_REVENUE]).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "Revenue"));
    }

    #[test]
    fn test_invalid_revenue_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "CompanyName,Industry,Revenue,Public?\nA,Retail,100,1\nB,Retail,lots,0\n",
        );

        match load_table(&path).unwrap_err() {
            LoadError::InvalidValue { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Revenue");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "CompanyName,Industry,Revenue,Public?\nA,Retail,100\n",
        );

        assert!(matches!(load_table(&path).unwrap_err(), LoadError::Csv(_)));
    }
}

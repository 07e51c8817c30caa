//! CSV Input Tables
//!
//! Reads a CSV export twice over: once as header-keyed records and once as
//! raw rows. Missing files read as empty tables.

use std::collections::HashMap;
use std::path::Path;

use super::OracleError;

/// One CSV file, read leniently
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    /// Rows keyed by trimmed, lowercased header
    records: Vec<HashMap<String, String>>,
    /// Data rows when read without headers
    raw_rows: usize,
}

impl CsvTable {
    /// Read `path`; a file that does not exist is an empty table
    pub fn read(path: &Path) -> Result<Self, OracleError> {
        if !path.exists() {
            tracing::debug!("CSV input {:?} not found, treating as empty", path);
            return Ok(Self::default());
        }

        let bytes = std::fs::read(path).map_err(|e| OracleError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    /// Parse CSV text; malformed content yields whatever could be read
    pub fn parse(content: &str) -> Self {
        let records = match read_records(content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Ignoring malformed CSV records: {}", e);
                Vec::new()
            }
        };

        Self {
            records,
            raw_rows: count_raw_rows(content),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn raw_row_count(&self) -> usize {
        self.raw_rows
    }

    /// Sum of `column` over all records; non-numeric cells count as zero
    pub fn sum(&self, column: &str) -> f64 {
        self.records
            .iter()
            .filter_map(|record| record.get(column))
            .map(|cell| cell.parse::<f64>().unwrap_or(0.0))
            .sum()
    }
}

fn read_records(content: &str) -> Result<Vec<HashMap<String, String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = headers
            .iter()
            .zip(row.iter())
            .map(|(key, value)| (key.clone(), value.trim().to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Rows read without headers, minus a first row that looks like a header
fn count_raw_rows(content: &str) -> usize {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records().filter_map(Result::ok);
    let Some(first) = rows.next() else {
        return 0;
    };

    let header_like = first
        .iter()
        .any(|cell| cell.chars().any(char::is_alphabetic));
    let rest = rows.count();

    if header_like {
        rest
    } else {
        rest + 1
    }
}

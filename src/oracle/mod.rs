//! Oracle Summary
//!
//! Derives an impressions/clicks/CTR summary from two local CSV exports,
//! records it in a history CSV and answers with the payload served at
//! `/cgi-bin/oraculo`.
//!
//! # Inputs
//!
//! - clicks CSV: summed `cliques` (or `clicks`) column, else its row count
//! - impressions CSV: summed `impressoes` (or `impressions`) column, else the
//!   first non-zero row count of either file
//!
//! Missing input files count as empty. Traffic is split 90/10 between
//! Brasil and Portugal.

mod history;
mod summary;
mod table;

pub use history::History;
pub use summary::{ctr, CountrySplit, OracleSummary, AVERAGE_POSITION, BRAZIL_SHARE};
pub use table::CsvTable;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::OracleConfig;

/// Oracle errors
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("Failed to access {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Response envelope, `status` tagged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum OracleResponse {
    #[serde(rename = "ok")]
    Ok {
        #[serde(rename = "dados")]
        data: OracleSummary,
    },
    #[serde(rename = "erro")]
    Error { msg: String },
}

impl From<Result<OracleSummary, OracleError>> for OracleResponse {
    fn from(result: Result<OracleSummary, OracleError>) -> Self {
        match result {
            Ok(data) => OracleResponse::Ok { data },
            Err(e) => OracleResponse::Error { msg: e.to_string() },
        }
    }
}

/// Reads the configured inputs and keeps the history
#[derive(Debug)]
pub struct Oracle {
    clicks_csv: PathBuf,
    impressions_csv: PathBuf,
    history: History,
}

impl Oracle {
    pub fn new(config: &OracleConfig) -> Self {
        Self {
            clicks_csv: config.clicks_csv.clone(),
            impressions_csv: config.impressions_csv.clone(),
            history: History::new(&config.history_csv),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Derive the summary without recording it
    pub async fn summarize(&self) -> Result<OracleSummary, OracleError> {
        let impressions_csv = self.impressions_csv.clone();
        let clicks_csv = self.clicks_csv.clone();

        tokio::task::spawn_blocking(move || -> Result<OracleSummary, OracleError> {
            let impressions = CsvTable::read(&impressions_csv)?;
            let clicks = CsvTable::read(&clicks_csv)?;
            Ok(OracleSummary::derive(&impressions, &clicks))
        })
        .await
        .map_err(|e| OracleError::Task(e.to_string()))?
    }

    /// Derive the summary and append it to the history
    pub async fn consult(&self) -> Result<OracleSummary, OracleError> {
        let summary = self.summarize().await?;
        let ts = chrono::Utc::now().timestamp();
        self.history.append(ts, &summary).await?;

        tracing::info!(
            impressions = summary.impressions,
            clicks = summary.clicks,
            ctr = summary.ctr,
            "Oracle summary recorded"
        );
        Ok(summary)
    }
}

//! Summary History
//!
//! Append-only CSV log with one row per consultation.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::summary::OracleSummary;
use super::OracleError;

const HEADER: [&str; 4] = ["ts", "impressoes", "cliques", "ctr"];

/// History file writer; appends never interleave
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    lock: Mutex<()>,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row; the header is written when the file is new
    pub async fn append(&self, ts: i64, summary: &OracleSummary) -> Result<(), OracleError> {
        let _guard = self.lock.lock().await;

        let path = self.path.clone();
        let row = [
            ts.to_string(),
            summary.impressions.to_string(),
            summary.clicks.to_string(),
            summary.ctr.to_string(),
        ];

        tokio::task::spawn_blocking(move || write_row(&path, row))
            .await
            .map_err(|e| OracleError::Task(e.to_string()))?
            .map_err(|e| OracleError::Io {
                path: self.path.clone(),
                error: e.to_string(),
            })
    }
}

fn write_row(path: &Path, row: [String; 4]) -> Result<(), csv::Error> {
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::Writer::from_writer(file);
    if write_header {
        writer.write_record(HEADER)?;
    }
    writer.write_record(&row)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::table::CsvTable;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn sample() -> OracleSummary {
        OracleSummary::derive(
            &CsvTable::parse("impressoes\n1000\n"),
            &CsvTable::parse("cliques\n25\n"),
        )
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let history = History::new(dir.path().join("historico_oracular.csv"));

        history.append(1_700_000_000, &sample()).await.unwrap();
        history.append(1_700_000_060, &sample()).await.unwrap();

        let content = std::fs::read_to_string(history.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ts,impressoes,cliques,ctr",
                "1700000000,1000,25,2.5",
                "1700000060,1000,25,2.5",
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_file_gets_no_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("historico_oracular.csv");
        std::fs::write(&path, "ts,impressoes,cliques,ctr\n1,2,3,4\n").unwrap();

        History::new(&path).append(5, &sample()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("ts,").count(), 1);
        assert!(content.ends_with("5,1000,25,2.5\n"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_keep_rows_whole() {
        let dir = tempdir().unwrap();
        let history = Arc::new(History::new(dir.path().join("h.csv")));

        let mut tasks = Vec::new();
        for ts in 0..16 {
            let history = Arc::clone(&history);
            tasks.push(tokio::spawn(async move {
                history.append(ts, &sample()).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let content = std::fs::read_to_string(history.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[0], "ts,impressoes,cliques,ctr");
        assert!(lines[1..].iter().all(|line| line.ends_with(",1000,25,2.5")));
    }

    #[tokio::test]
    async fn test_unwritable_path() {
        let history = History::new("/nonexistent/dir/h.csv");
        let err = history.append(0, &sample()).await.unwrap_err();
        assert!(matches!(err, OracleError::Io { .. }));
    }
}

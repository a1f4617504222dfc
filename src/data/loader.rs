//! Quarter-scoped CSV data loading.
//!
//! The collected data for a quarter lives at
//! `<data>/<quarter>/1-fetch/gcs_fetched.csv`. A missing file means the
//! fetch step has not run for that quarter; that is "no data", not an
//! error, so the loader returns an empty record set instead of failing.

use crate::config::Paths;
use crate::models::RecordSet;
use anyhow::{Context, Result};
use tracing::{error, info};

/// Load the collected data for a quarter from its CSV file.
///
/// Headers are preserved verbatim; any whitespace normalization happens
/// later, in the consumers.
pub fn load_quarter_data(paths: &Paths, quarter: &str) -> Result<RecordSet> {
    let file_path = paths.fetched_csv(quarter);

    if !file_path.exists() {
        error!("Data file not found: {}", file_path.display());
        return Ok(RecordSet::empty());
    }

    let mut reader = csv::Reader::from_path(&file_path)
        .with_context(|| format!("Failed to open data file: {}", file_path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read headers from: {}", file_path.display()))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("Failed to read record from: {}", file_path.display()))?;
        rows.push(record.iter().map(String::from).collect());
    }

    info!("Data loaded from {}", file_path.display());
    Ok(RecordSet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_paths(root: &TempDir) -> Paths {
        Paths {
            data_dir: root.path().to_path_buf(),
            repo_dir: PathBuf::from("."),
        }
    }

    fn write_fixture(paths: &Paths, quarter: &str, content: &str) {
        let file_path = paths.fetched_csv(quarter);
        std::fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        std::fs::write(file_path, content).unwrap();
    }

    #[test]
    fn test_missing_file_returns_empty() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);

        let data = load_quarter_data(&paths, "2024Q2").unwrap();

        assert!(data.is_empty());
    }

    #[test]
    fn test_load_preserves_headers_verbatim() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        write_fixture(
            &paths,
            "2024Q2",
            " United States ,Japan\n10,30\n30,5\n",
        );

        let data = load_quarter_data(&paths, "2024Q2").unwrap();

        assert_eq!(data.headers, vec![" United States ", "Japan"]);
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0], vec!["10", "30"]);
        assert_eq!(data.rows[1], vec!["30", "5"]);
    }

    #[test]
    fn test_load_scopes_by_quarter() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        write_fixture(&paths, "2024Q1", "A,B\n1,2\n");

        let other = load_quarter_data(&paths, "2024Q2").unwrap();
        assert!(other.is_empty());

        let loaded = load_quarter_data(&paths, "2024Q1").unwrap();
        assert_eq!(loaded.rows.len(), 1);
    }
}

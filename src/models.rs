//! Data models for the report generator.
//!
//! This module contains the core data structures used throughout
//! the application: the loaded record set, axis formatting choices,
//! and the typed halt error mapped to an exit code at the top level.

use thiserror::Error;

/// A loaded CSV export: headers plus rows of string cells.
///
/// Headers are kept verbatim from the file, including any incidental
/// whitespace. Consumers normalize headers themselves so aggregation
/// stays insensitive to spreadsheet formatting noise.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Column headers in file order, unmodified.
    pub headers: Vec<String>,
    /// Data rows in file order; each row has one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl RecordSet {
    /// An empty record set, the "no data" signal from the loader.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Headers with leading/trailing whitespace stripped, in file order.
    pub fn stripped_headers(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.trim().to_string()).collect()
    }

    /// Parse a cell as a count. Blank or non-numeric cells count as zero.
    pub fn numeric_cell(cell: &str) -> f64 {
        cell.trim().parse::<f64>().unwrap_or(0.0)
    }
}

/// Y-axis tick formatting for a bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisFormat {
    /// Comma-grouped integers, no scientific notation.
    Commas,
    /// Value divided by one million, one decimal place, suffixed "M".
    Millions,
}

/// A recognized domain halt condition carrying its process exit code.
///
/// Raised by collaborators (notably the git sync layer) and handled once
/// at the outermost boundary: logged at INFO for exit code 0, ERROR
/// otherwise, then the process exits with the carried code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Halt {
    /// Human-readable reason for the halt.
    pub message: String,
    /// Process exit code to terminate with.
    pub exit_code: i32,
}

impl Halt {
    /// Create a halt with the given message and exit code.
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_set() {
        let data = RecordSet::empty();
        assert!(data.is_empty());
        assert!(data.headers.is_empty());
    }

    #[test]
    fn test_stripped_headers() {
        let data = RecordSet {
            headers: vec![" United States ".to_string(), "Japan".to_string()],
            rows: vec![],
        };
        assert_eq!(data.stripped_headers(), vec!["United States", "Japan"]);
    }

    #[test]
    fn test_numeric_cell() {
        assert_eq!(RecordSet::numeric_cell("42"), 42.0);
        assert_eq!(RecordSet::numeric_cell(" 3.5 "), 3.5);
        assert_eq!(RecordSet::numeric_cell(""), 0.0);
        assert_eq!(RecordSet::numeric_cell("n/a"), 0.0);
    }

    #[test]
    fn test_halt_display() {
        let halt = Halt::new("quota exhausted", 0);
        assert_eq!(halt.to_string(), "quota exhausted");
        assert_eq!(halt.exit_code, 0);
    }
}

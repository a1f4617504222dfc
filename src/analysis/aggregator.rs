//! Column aggregation for the quarterly reports.
//!
//! This module provides the two aggregation shapes the reports need:
//! summing a contiguous span of category columns located by sentinel
//! names, and summing every non-key column per row keyed on one column.

use crate::models::RecordSet;
use thiserror::Error;
use tracing::debug;

/// Errors raised while aggregating a record set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// An expected column is absent from the data.
    #[error("Expected column not found: {0}")]
    ColumnNotFound(String),
}

/// A contiguous run of category columns bounded by two sentinel names.
///
/// The run is inclusive of both sentinels; the order of the columns in
/// the file defines the category (and bar) order.
#[derive(Debug, Clone)]
pub struct ColumnSpan {
    /// Name of the first column in the span.
    pub start: String,
    /// Name of the last column in the span.
    pub end: String,
}

impl ColumnSpan {
    /// Create a span from its two sentinel column names.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Sum each column in the sentinel-bounded span over all rows.
///
/// Headers are compared with surrounding whitespace stripped, so
/// incidental spreadsheet formatting does not affect the lookup. A
/// missing sentinel is fatal. Returns (category, sum) pairs in the
/// columns' left-to-right order.
pub fn sum_column_span(
    data: &RecordSet,
    span: &ColumnSpan,
) -> Result<Vec<(String, f64)>, AnalysisError> {
    let columns = data.stripped_headers();
    debug!("Cleaned columns: {:?}", columns);

    let start_index = find_column(&columns, &span.start)?;
    let end_index = find_column(&columns, &span.end)?;

    let mut totals = Vec::with_capacity(end_index.saturating_sub(start_index) + 1);
    for index in start_index..=end_index {
        let sum = data
            .rows
            .iter()
            .map(|row| row.get(index).map(|c| RecordSet::numeric_cell(c)).unwrap_or(0.0))
            .sum();
        totals.push((columns[index].clone(), sum));
    }

    Ok(totals)
}

/// Sum every non-key column per row, keyed on the named column.
///
/// Returns (key, total) pairs in the data's existing row order. All
/// columns other than the key are assumed numeric; cells that fail to
/// parse count as zero.
pub fn sum_by_key_column(
    data: &RecordSet,
    key: &str,
) -> Result<Vec<(String, f64)>, AnalysisError> {
    let columns = data.stripped_headers();
    let key_index = find_column(&columns, key)?;

    let totals = data
        .rows
        .iter()
        .map(|row| {
            let label = row.get(key_index).cloned().unwrap_or_default();
            let total = row
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != key_index)
                .map(|(_, cell)| RecordSet::numeric_cell(cell))
                .sum();
            (label, total)
        })
        .collect();

    Ok(totals)
}

/// Rewrite a license label to its short display form.
///
/// Labels containing the path fragment `by/2.5` render as the literal
/// "CC BY 2.5"; everything else passes through unchanged.
pub fn shorten_license_label(label: &str) -> String {
    if label.contains("by/2.5") {
        "CC BY 2.5".to_string()
    } else {
        label.to_string()
    }
}

fn find_column(columns: &[String], name: &str) -> Result<usize, AnalysisError> {
    columns
        .iter()
        .position(|column| column == name)
        .ok_or_else(|| AnalysisError::ColumnNotFound(name.to_string()))
}

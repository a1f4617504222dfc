//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::{Datelike, Utc};
use clap::Parser;
use std::path::PathBuf;

/// Google Custom Search quarterly report generator
///
/// Aggregates the quarter's fetched licensing data into bar charts
/// (by country, by license type, by language), saves them under the
/// quarter's report directory, registers them in the data README, and
/// commits/pushes the results.
///
/// Examples:
///   gcs-reports
///   gcs-reports --quarter 2024Q2
///   gcs-reports -q 2024Q2 --skip-commit --show-plots
///   gcs-reports --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Data quarter in format YYYYQx, e.g. 2024Q2
    ///
    /// Defaults to the calendar quarter of the current UTC date.
    #[arg(short, long, default_value_t = current_quarter(), value_name = "YYYYQx")]
    pub quarter: String,

    /// Don't git commit changes (also skips git push changes)
    #[arg(long)]
    pub skip_commit: bool,

    /// Don't git push changes
    #[arg(long)]
    pub skip_push: bool,

    /// Show generated plots (in addition to saving them)
    #[arg(long)]
    pub show_plots: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .gcs-reports.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the data directory root
    #[arg(long, value_name = "DIR", env = "GCS_REPORTS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the git repository root
    #[arg(long, value_name = "DIR", env = "GCS_REPORTS_REPO_DIR")]
    pub repo_dir: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(long)]
    pub quiet: bool,

    /// Generate a default .gcs-reports.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if !is_valid_quarter(&self.quarter) {
            return Err(format!(
                "Invalid quarter '{}': expected format YYYYQx, e.g. 2024Q2",
                self.quarter
            ));
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data_dir) = self.data_dir {
            if data_dir.as_os_str().is_empty() {
                return Err("Data directory must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Whether the push step is skipped. Skipping the commit implies
    /// skipping the push.
    pub fn effective_skip_push(&self) -> bool {
        self.skip_push || self.skip_commit
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// The calendar quarter of the current UTC date, formatted YYYYQx.
pub fn current_quarter() -> String {
    let today = Utc::now();
    format!("{}Q{}", today.year(), today.month0() / 3 + 1)
}

/// Check a quarter identifier against the YYYYQx format.
fn is_valid_quarter(quarter: &str) -> bool {
    let bytes = quarter.as_bytes();
    if bytes.len() != 6 {
        return false;
    }
    bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'Q'
        && (b'1'..=b'4').contains(&bytes[5])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            quarter: "2024Q2".to_string(),
            skip_commit: false,
            skip_push: false,
            show_plots: false,
            config: None,
            data_dir: None,
            repo_dir: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_current_quarter_format() {
        let quarter = current_quarter();
        assert!(is_valid_quarter(&quarter), "bad quarter: {}", quarter);
    }

    #[test]
    fn test_valid_quarters() {
        assert!(is_valid_quarter("2024Q1"));
        assert!(is_valid_quarter("1999Q4"));
        assert!(!is_valid_quarter("2024Q5"));
        assert!(!is_valid_quarter("2024q2"));
        assert!(!is_valid_quarter("24Q2"));
        assert!(!is_valid_quarter("2024-Q2"));
        assert!(!is_valid_quarter(""));
    }

    #[test]
    fn test_validation_invalid_quarter() {
        let mut args = make_args();
        args.quarter = "Q2-2024".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_skip_commit_implies_skip_push() {
        let mut args = make_args();
        assert!(!args.effective_skip_push());

        args.skip_commit = true;
        assert!(args.effective_skip_push());

        args.skip_commit = false;
        args.skip_push = true;
        assert!(args.effective_skip_push());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}

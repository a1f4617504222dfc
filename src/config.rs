//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.gcs-reports.toml` files, and building the `Paths` context
//! handed to every component.

use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the current directory.
const CONFIG_FILE: &str = ".gcs-reports.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Filesystem layout settings.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Category column span settings.
    #[serde(default)]
    pub spans: SpansConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Filesystem layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the data tree (quarter directories live underneath).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Root of the git repository the reports are committed to.
    #[serde(default = "default_repo_dir")]
    pub repo_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            repo_dir: default_repo_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_repo_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Sentinel column names bounding the contiguous category spans.
///
/// The input CSV groups its category columns into contiguous runs; each
/// run is located by the names of its first and last column. Keeping the
/// names here rather than in the report functions means a spreadsheet
/// layout change is a config edit, not a code edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpansConfig {
    /// First column of the country span.
    #[serde(default = "default_country_start")]
    pub country_start: String,

    /// Last column of the country span (inclusive).
    #[serde(default = "default_country_end")]
    pub country_end: String,

    /// First column of the language span.
    #[serde(default = "default_language_start")]
    pub language_start: String,

    /// Last column of the language span (inclusive).
    #[serde(default = "default_language_end")]
    pub language_end: String,
}

impl Default for SpansConfig {
    fn default() -> Self {
        Self {
            country_start: default_country_start(),
            country_end: default_country_end(),
            language_start: default_language_start(),
            language_end: default_language_end(),
        }
    }
}

fn default_country_start() -> String {
    "United States".to_string()
}

fn default_country_end() -> String {
    "Japan".to_string()
}

fn default_language_start() -> String {
    "English".to_string()
}

fn default_language_end() -> String {
    "Indonesian".to_string()
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Key column for the license-type report.
    #[serde(default = "default_license_key")]
    pub license_key_column: String,

    /// Dataset label used when registering reports in the README.
    #[serde(default = "default_dataset_label")]
    pub dataset_label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            license_key_column: default_license_key(),
            dataset_label: default_dataset_label(),
        }
    }
}

fn default_license_key() -> String {
    "LICENSE TYPE".to_string()
}

fn default_dataset_label() -> String {
    "Google Custom Search".to_string()
}

impl Config {
    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from the default location, if present.
    pub fn load_default() -> Result<Option<Self>> {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::load(path)?))
    }

    /// Serialize the default configuration as TOML.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .expect("default config must serialize")
    }

    /// Apply CLI overrides on top of the file configuration.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref data_dir) = args.data_dir {
            self.paths.data_dir = data_dir.clone();
        }
        if let Some(ref repo_dir) = args.repo_dir {
            self.paths.repo_dir = repo_dir.clone();
        }
    }

    /// Build the path context from the merged configuration.
    pub fn paths(&self) -> Paths {
        Paths {
            data_dir: self.paths.data_dir.clone(),
            repo_dir: self.paths.repo_dir.clone(),
        }
    }
}

/// Resolved filesystem context, passed explicitly to each component.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root of the data tree.
    pub data_dir: PathBuf,
    /// Root of the git repository.
    pub repo_dir: PathBuf,
}

impl Paths {
    /// Path of the fetched CSV for a quarter.
    pub fn fetched_csv(&self, quarter: &str) -> PathBuf {
        self.data_dir
            .join(quarter)
            .join("1-fetch")
            .join("gcs_fetched.csv")
    }

    /// Report output directory for a quarter.
    pub fn report_dir(&self, quarter: &str) -> PathBuf {
        self.data_dir.join(quarter).join("3-report")
    }

    /// The shared README summary document.
    pub fn readme(&self) -> PathBuf {
        self.data_dir.join("README.md")
    }
}

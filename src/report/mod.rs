//! Report generation.
//!
//! The three quarterly report operations: aggregate the loaded data,
//! render a bar chart, save it under the quarter's report directory,
//! and register it in the shared README.

pub mod chart;
pub mod readme;

use crate::analysis::{self, ColumnSpan};
use crate::cli::Args;
use crate::config::{Config, Paths};
use crate::models::{AxisFormat, RecordSet};
use anyhow::{Context, Result};
use chart::BarChart;
use readme::{register_report, ReportEntry};
use std::path::Path;
use tracing::{info, warn};

/// Create the bar chart for the number of webpages licensed by country.
pub fn country_report(
    data: &RecordSet,
    paths: &Paths,
    config: &Config,
    args: &Args,
) -> Result<()> {
    info!("Creating a bar chart for the number of webpages licensed by country.");

    let span = ColumnSpan::new(
        config.spans.country_start.clone(),
        config.spans.country_end.clone(),
    );
    let bars = analysis::sum_column_span(data, &span)?;

    let chart = BarChart {
        title: format!(
            "Number of Google Webpages Licensed by Country ({})",
            args.quarter
        ),
        x_desc: "Country".to_string(),
        y_desc: "Number of Webpages".to_string(),
        y_format: AxisFormat::Commas,
        annotate_bars: true,
        bars,
    };

    save_and_register(
        &chart,
        paths,
        config,
        args,
        "gcs_country_report.png",
        "Country Report",
        "Number of Google Webpages Licensed by Country",
    )?;

    info!("Visualization by country created.");
    Ok(())
}

/// Create the bar chart for the number of webpages licensed by license type.
pub fn license_type_report(
    data: &RecordSet,
    paths: &Paths,
    config: &Config,
    args: &Args,
) -> Result<()> {
    info!("Creating a bar chart for the number of webpages licensed by license type.");

    let totals = analysis::sum_by_key_column(data, &config.report.license_key_column)?;
    let bars = totals
        .into_iter()
        .map(|(label, total)| (analysis::shorten_license_label(&label), total))
        .collect();

    let chart = BarChart {
        title: format!(
            "Number of Webpages Licensed by License Type ({})",
            args.quarter
        ),
        x_desc: "License Type".to_string(),
        y_desc: "Number of Webpages".to_string(),
        y_format: AxisFormat::Millions,
        annotate_bars: false,
        bars,
    };

    save_and_register(
        &chart,
        paths,
        config,
        args,
        "gcs_licensetype_report.png",
        "License Type Report",
        "Number of Webpages Licensed by License Type",
    )?;

    info!("Visualization by license type created.");
    Ok(())
}

/// Create the bar chart for the number of webpages licensed by language.
pub fn language_report(
    data: &RecordSet,
    paths: &Paths,
    config: &Config,
    args: &Args,
) -> Result<()> {
    info!("Creating a bar chart for the number of webpages licensed by language.");

    let span = ColumnSpan::new(
        config.spans.language_start.clone(),
        config.spans.language_end.clone(),
    );
    let bars = analysis::sum_column_span(data, &span)?;

    let chart = BarChart {
        title: format!(
            "Number of Google Webpages Licensed by Language ({})",
            args.quarter
        ),
        x_desc: "Language".to_string(),
        y_desc: "Number of Webpages".to_string(),
        y_format: AxisFormat::Commas,
        annotate_bars: true,
        bars,
    };

    save_and_register(
        &chart,
        paths,
        config,
        args,
        "gcs_language_report.png",
        "Language Report",
        "Number of Google Webpages Licensed by Language",
    )?;

    info!("Visualization by language created.");
    Ok(())
}

/// Save a rendered chart under the quarter's report directory and
/// register it in the README; optionally open it in the platform viewer.
fn save_and_register(
    chart: &BarChart,
    paths: &Paths,
    config: &Config,
    args: &Args,
    file_name: &str,
    section: &str,
    description: &str,
) -> Result<()> {
    let output_directory = paths.report_dir(&args.quarter);
    info!("Output directory: {}", output_directory.display());

    std::fs::create_dir_all(&output_directory)
        .with_context(|| format!("Failed to create {}", output_directory.display()))?;

    let image_path = output_directory.join(file_name);
    chart.render(&image_path)?;

    if args.show_plots {
        show_plot(&image_path);
    }

    register_report(
        paths,
        &ReportEntry {
            dataset: &config.report.dataset_label,
            section,
            description,
            image_path: &image_path,
        },
    )?;

    Ok(())
}

/// Open the saved chart with the platform image viewer. Failure to open
/// is a warning, never fatal.
fn show_plot(path: &Path) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    match std::process::Command::new(opener).arg(path).spawn() {
        Ok(_) => info!("Opened {}", path.display()),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_args(quarter: &str) -> Args {
        Args {
            quarter: quarter.to_string(),
            skip_commit: true,
            skip_push: true,
            show_plots: false,
            config: None,
            data_dir: None,
            repo_dir: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    fn make_paths(root: &TempDir) -> Paths {
        Paths {
            data_dir: root.path().to_path_buf(),
            repo_dir: PathBuf::from("."),
        }
    }

    fn make_country_data() -> RecordSet {
        RecordSet {
            headers: vec![
                "United States".to_string(),
                "Canada".to_string(),
                "Japan".to_string(),
            ],
            rows: vec![
                vec!["10".to_string(), "20".to_string(), "30".to_string()],
                vec!["30".to_string(), "5".to_string(), "25".to_string()],
            ],
        }
    }

    #[test]
    fn test_country_report_writes_artifact() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        let config = Config::default();
        let args = make_args("2024Q2");
        let data = make_country_data();

        country_report(&data, &paths, &config, &args).unwrap();

        let image = paths.report_dir("2024Q2").join("gcs_country_report.png");
        assert!(image.exists());

        let readme = std::fs::read_to_string(paths.readme()).unwrap();
        assert!(readme.contains("### Country Report"));
        assert!(readme.contains("Number of Google Webpages Licensed by Country"));
    }

    #[test]
    fn test_country_report_missing_sentinel_writes_nothing() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        let config = Config::default();
        let args = make_args("2024Q2");
        let data = RecordSet {
            headers: vec!["United States".to_string(), "Canada".to_string()],
            rows: vec![vec!["10".to_string(), "20".to_string()]],
        };

        let result = country_report(&data, &paths, &config, &args);

        assert!(result.is_err());
        let image = paths.report_dir("2024Q2").join("gcs_country_report.png");
        assert!(!image.exists());
    }

    #[test]
    fn test_rerun_overwrites_single_file() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        let config = Config::default();
        let args = make_args("2024Q2");
        let data = make_country_data();

        country_report(&data, &paths, &config, &args).unwrap();
        country_report(&data, &paths, &config, &args).unwrap();

        let report_dir = paths.report_dir("2024Q2");
        let pngs = std::fs::read_dir(&report_dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .path()
                    .extension()
                    .map(|ext| ext == "png")
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(pngs, 1);
    }

    #[test]
    fn test_license_type_report_shortens_labels() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        let config = Config::default();
        let args = make_args("2024Q2");
        let data = RecordSet {
            headers: vec![
                "LICENSE TYPE".to_string(),
                "2024Q1".to_string(),
                "2024Q2".to_string(),
            ],
            rows: vec![
                vec![
                    "licenses/by/2.5".to_string(),
                    "1".to_string(),
                    "2".to_string(),
                ],
                vec![
                    "licenses/by/4.0".to_string(),
                    "3".to_string(),
                    "4".to_string(),
                ],
            ],
        };

        license_type_report(&data, &paths, &config, &args).unwrap();

        let image = paths
            .report_dir("2024Q2")
            .join("gcs_licensetype_report.png");
        assert!(image.exists());
    }

    #[test]
    fn test_language_report_writes_artifact() {
        let root = TempDir::new().unwrap();
        let paths = make_paths(&root);
        let config = Config::default();
        let args = make_args("2024Q3");
        let data = RecordSet {
            headers: vec![
                "English".to_string(),
                "Spanish".to_string(),
                "Indonesian".to_string(),
            ],
            rows: vec![vec!["7".to_string(), "8".to_string(), "9".to_string()]],
        };

        language_report(&data, &paths, &config, &args).unwrap();

        let image = paths.report_dir("2024Q3").join("gcs_language_report.png");
        assert!(image.exists());

        let readme = std::fs::read_to_string(paths.readme()).unwrap();
        assert!(readme.contains("### Language Report"));
    }
}

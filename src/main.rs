//! gcs-reports - Google Custom Search quarterly report generator
//!
//! A CLI tool that aggregates the quarter's fetched licensing data into
//! bar charts (by country, by license type, by language), registers them
//! in the data README, and commits/pushes the results.
//!
//! Exit codes:
//!   0 - Success (including "no data for this quarter")
//!   1 - Unhandled error
//!   130 - Interrupted
//!   other - Carried by a recognized domain halt condition

mod analysis;
mod cli;
mod config;
mod data;
mod models;
mod repo;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use models::Halt;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit code reported when the run is interrupted.
const INTERRUPT_EXIT_CODE: i32 = 130;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    if let Err(e) = install_interrupt_handler() {
        warn!("Interrupt handler not installed: {:#}", e);
    }

    info!("gcs-reports v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_reports(args) {
        // Recognized halt conditions carry their own exit code
        if let Some(halt) = e.downcast_ref::<Halt>() {
            if halt.exit_code == 0 {
                info!("{}", halt.message);
            } else {
                error!("{}", halt.message);
            }
            std::process::exit(halt.exit_code);
        }

        error!("Unhandled error: {:?}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .gcs-reports.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".gcs-reports.toml");

    if path.exists() {
        anyhow::bail!(".gcs-reports.toml already exists. Remove it first or edit it manually.");
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .gcs-reports.toml")?;

    println!("Created .gcs-reports.toml with default settings.");
    println!("Edit it to customize paths, column spans, and report labels.");
    Ok(())
}

/// Install the SIGINT handler: log the halt, then exit 130.
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        info!("({}) Halted via interrupt.", INTERRUPT_EXIT_CODE);
        std::process::exit(INTERRUPT_EXIT_CODE);
    })
    .context("Failed to set interrupt handler")
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow for the selected quarter.
fn run_reports(args: Args) -> Result<()> {
    // Load configuration and build the path context
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    let paths = config.paths();

    // Fetch and merge changes before reading any data
    repo::fetch_and_merge(&paths.repo_dir)?;

    // Load the quarter's collected data
    let record_set = data::load_quarter_data(&paths, &args.quarter)?;
    if record_set.is_empty() {
        info!("No data for {}; nothing to report", args.quarter);
        return Ok(());
    }

    // Generate the three reports in fixed order
    report::country_report(&record_set, &paths, &config, &args)?;
    report::license_type_report(&record_set, &paths, &config, &args)?;
    report::language_report(&record_set, &paths, &config, &args)?;

    // Add and commit changes
    if args.skip_commit {
        info!("Skipping git commit (--skip-commit)");
    } else {
        repo::add_and_commit(&paths.repo_dir, "Add and commit new reports")?;
    }

    // Push changes
    if args.effective_skip_push() {
        info!("Skipping git push");
    } else {
        repo::push_changes(&paths.repo_dir)?;
    }

    info!("Reports for {} complete", args.quarter);
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .gcs-reports.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_handler_installs() {
        assert!(install_interrupt_handler().is_ok());
        // The process-wide handler slot is taken now; a second install
        // must be refused rather than clobbering the first
        assert!(install_interrupt_handler().is_err());
    }
}

//! README summary registration.
//!
//! Every rendered chart is registered in the shared summary document at
//! `<data>/README.md`: one `## <dataset>` section per dataset, one
//! `### <section>` block per chart holding the description and a
//! relative image link. Re-registering a chart replaces its block in
//! place, so re-running a quarter never duplicates entries.

use crate::config::Paths;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Header written when the README does not exist yet.
const README_HEADER: &str = "# Data README\n\
    \n\
    Aggregate reports generated from the quarterly data.\n";

/// A single chart registration.
#[derive(Debug, Clone)]
pub struct ReportEntry<'a> {
    /// Dataset label, e.g. "Google Custom Search".
    pub dataset: &'a str,
    /// Section title, e.g. "Country Report".
    pub section: &'a str,
    /// Chart description used as the entry text and image alt text.
    pub description: &'a str,
    /// Path of the saved chart image.
    pub image_path: &'a Path,
}

/// Register a chart in the shared README, creating the document and the
/// dataset section as needed.
pub fn register_report(paths: &Paths, entry: &ReportEntry<'_>) -> Result<()> {
    let readme_path = paths.readme();

    let content = if readme_path.exists() {
        std::fs::read_to_string(&readme_path)
            .with_context(|| format!("Failed to read {}", readme_path.display()))?
    } else {
        README_HEADER.to_string()
    };

    let image_link = relative_image_link(&paths.data_dir, entry);
    let block = format!(
        "### {}\n\n{}\n\n{}\n",
        entry.section, entry.description, image_link
    );

    let updated = upsert_section(&content, entry.dataset, entry.section, &block);

    if let Some(parent) = readme_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&readme_path, updated)
        .with_context(|| format!("Failed to write {}", readme_path.display()))?;

    info!(
        "Registered \"{}\" under \"{}\" in {}",
        entry.section,
        entry.dataset,
        readme_path.display()
    );
    Ok(())
}

/// Markdown image link with a path relative to the data root.
fn relative_image_link(data_dir: &Path, entry: &ReportEntry<'_>) -> String {
    let relative = entry
        .image_path
        .strip_prefix(data_dir)
        .unwrap_or(entry.image_path);
    // README lives at the data root, so forward slashes keep links portable
    let link = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("![{}]({})", entry.description, link)
}

/// Replace the named `###` block under the dataset's `##` section, or
/// append it, creating the dataset section when absent.
fn upsert_section(content: &str, dataset: &str, section: &str, block: &str) -> String {
    let dataset_heading = format!("## {}", dataset);
    let section_heading = format!("### {}", section);
    let lines: Vec<&str> = content.lines().collect();

    let dataset_start = lines.iter().position(|line| line.trim() == dataset_heading);

    let Some(dataset_start) = dataset_start else {
        // No dataset section yet: append dataset heading plus the block
        let mut out = content.trim_end().to_string();
        out.push_str("\n\n");
        out.push_str(&dataset_heading);
        out.push_str("\n\n");
        out.push_str(block);
        return out;
    };

    // Dataset section ends at the next `## ` heading (or EOF)
    let dataset_end = lines[dataset_start + 1..]
        .iter()
        .position(|line| line.starts_with("## "))
        .map(|offset| dataset_start + 1 + offset)
        .unwrap_or(lines.len());

    // Locate the chart block inside the dataset section
    let section_start = lines[dataset_start + 1..dataset_end]
        .iter()
        .position(|line| line.trim() == section_heading)
        .map(|offset| dataset_start + 1 + offset);

    let (replace_start, replace_end) = match section_start {
        Some(start) => {
            // Block ends at the next heading of any level (or section end)
            let end = lines[start + 1..dataset_end]
                .iter()
                .position(|line| line.starts_with("### ") || line.starts_with("## "))
                .map(|offset| start + 1 + offset)
                .unwrap_or(dataset_end);
            (start, end)
        }
        // Append at the end of the dataset section
        None => (dataset_end, dataset_end),
    };

    let mut out_lines: Vec<String> = Vec::with_capacity(lines.len() + 8);
    for line in &lines[..replace_start] {
        out_lines.push((*line).to_string());
    }
    if out_lines.last().map(|line| !line.is_empty()).unwrap_or(false) {
        out_lines.push(String::new());
    }
    for line in block.trim_end().lines() {
        out_lines.push(line.to_string());
    }
    out_lines.push(String::new());
    for line in &lines[replace_end..] {
        out_lines.push((*line).to_string());
    }

    let mut out = out_lines.join("\n");
    out = out.trim_end().to_string();
    out.push('\n');
    out
}

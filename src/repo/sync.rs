//! Git synchronization.
//!
//! This module keeps the backing repository in sync around a report
//! run using the git2 library: fetch and fast-forward before reading
//! data, stage and commit the generated artifacts, and push them back
//! to the remote. Anything that needs manual resolution (a non
//! fast-forward merge, a rejected push) surfaces as a `Halt`.

use crate::models::Halt;
use anyhow::{Context, Result};
use git2::{build::CheckoutBuilder, IndexAddOption, Repository, Signature};
use std::path::Path;
use tracing::{debug, info};

/// Name of the remote the reports are synced with.
const REMOTE_NAME: &str = "origin";

/// Fallback committer identity when the repository has none configured.
const FALLBACK_IDENT: (&str, &str) = ("gcs-reports", "gcs-reports@localhost");

/// Fetch the remote and fast-forward the current branch.
///
/// Being already up to date is a no-op. A merge that is not a
/// fast-forward needs a human, so it halts the run with exit code 1.
pub fn fetch_and_merge(repo_root: &Path) -> Result<()> {
    info!("Fetching and merging changes in {}", repo_root.display());

    let repo = open_repository(repo_root)?;

    let mut remote = repo
        .find_remote(REMOTE_NAME)
        .with_context(|| format!("No remote named '{}'", REMOTE_NAME))?;
    remote
        .fetch(&[] as &[&str], None, None)
        .with_context(|| format!("Failed to fetch from '{}'", REMOTE_NAME))?;

    let fetch_head = repo
        .find_reference("FETCH_HEAD")
        .context("No FETCH_HEAD after fetch")?;
    let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;

    let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

    if analysis.is_up_to_date() {
        info!("Repository already up to date");
        return Ok(());
    }

    if analysis.is_fast_forward() {
        let head_name = {
            let head = repo.head().context("Failed to resolve HEAD")?;
            head.name()
                .map(String::from)
                .context("HEAD is not a named reference")?
        };

        let mut reference = repo.find_reference(&head_name)?;
        reference.set_target(fetch_commit.id(), "fast-forward")?;
        repo.set_head(&head_name)?;
        repo.checkout_head(Some(CheckoutBuilder::default().force()))?;

        info!("Fast-forwarded {} to {}", head_name, fetch_commit.id());
        return Ok(());
    }

    Err(Halt::new(
        format!(
            "Merge in {} requires manual resolution",
            repo_root.display()
        ),
        1,
    )
    .into())
}

/// Stage all changes and commit them with the given message.
///
/// Nothing to commit is a no-op. Handles the unborn-HEAD case so the
/// first commit in a fresh repository works too.
pub fn add_and_commit(repo_root: &Path, message: &str) -> Result<()> {
    info!("Committing changes in {}", repo_root.display());

    let repo = open_repository(repo_root)?;

    let mut index = repo.index().context("Failed to open index")?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .context("Failed to stage changes")?;
    index.write().context("Failed to write index")?;

    let tree_id = index.write_tree().context("Failed to write tree")?;
    let tree = repo.find_tree(tree_id)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().context("HEAD is not a commit")?),
        // Unborn HEAD: this will be the first commit
        Err(_) => None,
    };

    if let Some(ref parent) = parent {
        if parent.tree_id() == tree_id {
            info!("No changes to commit");
            return Ok(());
        }
    }

    let signature = repo
        .signature()
        .or_else(|_| Signature::now(FALLBACK_IDENT.0, FALLBACK_IDENT.1))
        .context("Failed to build a commit signature")?;

    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    let commit_id = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .context("Failed to create commit")?;

    info!("Committed {}: {}", commit_id, message);
    Ok(())
}

/// Push the current branch to the remote.
pub fn push_changes(repo_root: &Path) -> Result<()> {
    info!("Pushing changes in {}", repo_root.display());

    let repo = open_repository(repo_root)?;

    let head_name = {
        let head = repo.head().context("Failed to resolve HEAD")?;
        head.name()
            .map(String::from)
            .context("HEAD is not a named reference")?
    };
    debug!("Pushing {} to {}", head_name, REMOTE_NAME);

    let mut remote = repo
        .find_remote(REMOTE_NAME)
        .with_context(|| format!("No remote named '{}'", REMOTE_NAME))?;
    remote
        .push(&[head_name.as_str()], None)
        .map_err(|e| Halt::new(format!("Push to '{}' failed: {}", REMOTE_NAME, e), 1))?;

    info!("Pushed {} to {}", head_name, REMOTE_NAME);
    Ok(())
}

fn open_repository(repo_root: &Path) -> Result<Repository> {
    Repository::open(repo_root)
        .with_context(|| format!("Failed to open repository: {}", repo_root.display()))
}

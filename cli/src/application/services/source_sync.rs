//! Source sync: clone-or-update the bot's git working tree.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{LocalFs, ProgressReporter, SourceControl};
use crate::domain::InstanceDescriptor;

/// Repository to deploy from.
#[derive(Debug, Clone, Copy)]
pub struct RepoSpec<'a> {
    pub url: &'a str,
    pub branch: &'a str,
}

/// Which path the sync took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Fresh shallow clone.
    Cloned,
    /// Existing working tree fast-forwarded.
    Updated,
}

/// Bring `instance.app_dir` to the tip of `repo.branch`.
///
/// An existing working tree is fetched, switched to the branch and
/// fast-forwarded; local commits make the pull fail rather than being
/// discarded. Anything else gets a depth-1 clone of the branch.
///
/// # Errors
///
/// Returns an error if any git step fails; a non-fast-forward pull surfaces
/// git's own message and exit code.
pub async fn sync_source(
    scm: &impl SourceControl,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    instance: &InstanceDescriptor,
    repo: RepoSpec<'_>,
) -> Result<SyncOutcome> {
    let dir = &instance.app_dir;

    if fs.exists(dir) && scm.is_work_tree(dir).await? {
        reporter.step(&format!("updating {} ({})...", dir.display(), repo.branch));
        scm.fetch_all(dir).await.context("fetching remote refs")?;
        scm.checkout(dir, repo.branch)
            .await
            .with_context(|| format!("switching to branch {}", repo.branch))?;
        scm.pull_ff_only(dir, repo.branch)
            .await
            .with_context(|| format!("fast-forwarding {}", dir.display()))?;
        tracing::info!(instance = %instance.name, branch = repo.branch, "working tree updated");
        reporter.success(&format!("source updated ({})", repo.branch));
        return Ok(SyncOutcome::Updated);
    }

    reporter.step(&format!("cloning {} ({})...", repo.url, repo.branch));
    if let Some(parent) = dir.parent() {
        fs.create_dir_all(parent)?;
    }
    scm.clone_shallow(repo.url, repo.branch, dir)
        .await
        .with_context(|| format!("cloning into {}", dir.display()))?;
    tracing::info!(instance = %instance.name, url = repo.url, "repository cloned");
    reporter.success(&format!("source cloned ({})", repo.branch));
    Ok(SyncOutcome::Cloned)
}

//! Comment reaction: a content developer commenting on an overdue issue
//! clears its `overdue` label.

use crate::tracker::{RepoSlug, Tracker};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use triage::config::OVERDUE_LABEL;
use triage::identity::strip_sigil;
use triage::TriageConfig;

/// Result of handling one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentOutcome {
    /// The commenter is not a configured content developer; nothing was read.
    NotContentDeveloper,
    /// The issue does not carry the overdue label.
    LabelAbsent,
    /// The overdue label was removed.
    OverdueCleared,
    /// Removing the label failed; the failure was logged and ignored.
    RemovalFailed,
}

/// React to a comment by `commenter` on issue `number`.
///
/// Only the top-level `content_developers` list is consulted, compared
/// case-insensitively with any `@` stripped. Failing to read the issue is an
/// error; failing to remove the label is not.
pub fn handle_comment<T: Tracker>(
    tracker: &T,
    config: &TriageConfig,
    repo: &RepoSlug,
    number: u64,
    commenter: &str,
) -> Result<CommentOutcome> {
    let handle = strip_sigil(commenter);
    if handle.is_empty() || !config.is_content_developer(handle) {
        debug!(commenter = handle, "Commenter is not a content developer");
        return Ok(CommentOutcome::NotContentDeveloper);
    }

    let issue = tracker
        .get_issue(repo, number)
        .with_context(|| format!("Failed to fetch issue {}#{}", repo, number))?;

    if !issue.has_label(OVERDUE_LABEL) {
        debug!(issue = number, "Issue is not overdue");
        return Ok(CommentOutcome::LabelAbsent);
    }

    if tracker.remove_label_best_effort(repo, number, OVERDUE_LABEL) {
        info!(issue = number, commenter = handle, "Cleared overdue label");
        Ok(CommentOutcome::OverdueCleared)
    } else {
        Ok(CommentOutcome::RemovalFailed)
    }
}

//! Issue tracker abstraction.
//!
//! This module defines the `Tracker` trait: the handful of issue tracker
//! operations intake and comment handling need. The GitHub REST backend is
//! used in production; the in-memory backend records calls for tests.

use crate::errors::{ApiError, UsageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

pub mod github;
pub mod memory;

pub use github::GithubTracker;
pub use memory::{InMemoryTracker, Operation, TrackerCall};

/// Repository identifier in `owner/repo` form.
///
/// # Examples
///
/// ```
/// use triage_agent::tracker::RepoSlug;
///
/// let repo: RepoSlug = "acme/docs-site".parse().unwrap();
/// assert_eq!(repo.owner(), "acme");
/// assert_eq!(repo.to_string(), "acme/docs-site");
///
/// assert!("acme".parse::<RepoSlug>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoSlug {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid_part = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        match s.trim().split_once('/') {
            Some((owner, name)) if valid_part(owner) && valid_part(name) => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(UsageError::InvalidRepo(s.to_string())),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl From<RepoSlug> for String {
    fn from(repo: RepoSlug) -> Self {
        repo.to_string()
    }
}

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabel {
    pub name: String,
}

/// The parts of an issue intake and comment handling read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedIssue {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub title: String,
    /// Absent or `null` when the issue was opened without a description.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
}

impl TrackedIssue {
    /// Whether the issue carries a label, ignoring case.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels
            .iter()
            .any(|label| label.name.eq_ignore_ascii_case(name))
    }
}

/// Issue tracker operations used by intake and comment handling.
///
/// Every method is a single blocking call. Implementations report any
/// non-success answer as an `ApiError`; callers decide whether that is fatal.
pub trait Tracker {
    /// Fetch an issue's title, body and labels.
    fn get_issue(&self, repo: &RepoSlug, number: u64) -> Result<TrackedIssue, ApiError>;

    /// Create a repository label unless it already exists.
    ///
    /// Idempotent: an existing label is left untouched, color included.
    fn ensure_label(&self, repo: &RepoSlug, name: &str, color: &str) -> Result<(), ApiError>;

    /// Add labels to an issue. Labels already present are kept as they are.
    fn add_labels(&self, repo: &RepoSlug, number: u64, labels: &[String]) -> Result<(), ApiError>;

    /// Remove one label from an issue.
    fn remove_label(&self, repo: &RepoSlug, number: u64, name: &str) -> Result<(), ApiError>;

    /// Add assignees to an issue. Existing assignees are kept.
    fn add_assignees(
        &self,
        repo: &RepoSlug,
        number: u64,
        assignees: &[String],
    ) -> Result<(), ApiError>;

    /// Post a Markdown comment on an issue.
    fn add_comment(&self, repo: &RepoSlug, number: u64, body: &str) -> Result<(), ApiError>;

    /// Remove a label without failing the caller.
    ///
    /// The label may already be gone, or the call may hit a transient error;
    /// neither should abort the invocation. Failures are logged and reported
    /// as `false`.
    fn remove_label_best_effort(&self, repo: &RepoSlug, number: u64, name: &str) -> bool {
        match self.remove_label(repo, number, name) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    %repo,
                    issue = number,
                    label = name,
                    error = %err,
                    "Ignoring failed label removal"
                );
                false
            }
        }
    }
}

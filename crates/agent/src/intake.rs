//! Intake of newly opened issues.
//!
//! One run labels the issue for triage, assigns the responsible content
//! developers and posts a summary comment. Calls are strictly sequential:
//! labels are ensured, the issue is read, the triage label is applied, then
//! assignees, then the comment. The first failing call aborts the run and
//! nothing already applied is rolled back. Re-running is safe since the
//! tracker treats re-adding a label or assignee as a no-op.

use crate::tracker::{RepoSlug, Tracker};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use triage::config::{OVERDUE_LABEL, TRIAGE_LABEL};
use triage::{resolve, Resolution, TriageConfig};

/// Placeholder used in the comment when a mention list is empty.
const NONE_PLACEHOLDER: &str = "(none)";

/// What an intake run decided and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeReport {
    pub repo: RepoSlug,
    pub issue: u64,
    pub resolution: Resolution,
    /// Labels added to the issue (empty on a dry run).
    pub labels_applied: Vec<String>,
    /// Assignees added to the issue (empty on a dry run or when nobody is assignable).
    pub assignees_applied: Vec<String>,
    /// Comment text, posted unless `dry_run` is set.
    pub comment: String,
    pub dry_run: bool,
}

/// Intake orchestrator bound to one tracker and one configuration.
pub struct Intake<'a, T: Tracker> {
    tracker: &'a T,
    config: &'a TriageConfig,
}

impl<'a, T: Tracker> Intake<'a, T> {
    pub fn new(tracker: &'a T, config: &'a TriageConfig) -> Self {
        Self { tracker, config }
    }

    /// Process one newly opened issue.
    ///
    /// With `dry_run` the issue is still read and resolved, but no call that
    /// could change tracker state is made.
    pub fn run(&self, repo: &RepoSlug, number: u64, dry_run: bool) -> Result<IntakeReport> {
        if !dry_run {
            self.ensure_labels(repo)?;
        }

        let issue = self
            .tracker
            .get_issue(repo, number)
            .with_context(|| format!("Failed to fetch issue {}#{}", repo, number))?;

        let resolution = resolve(self.config, &issue.title, issue.body.as_deref());
        debug!(candidates = ?resolution.candidates, "Extracted candidate paths");
        match &resolution.matched_path {
            Some(path) => info!(issue = number, path = %path, "Matched routing rule"),
            None => info!(issue = number, "No routing rule matched, using defaults"),
        }

        let comment = render_intake_comment(&resolution);
        let mut report = IntakeReport {
            repo: repo.clone(),
            issue: number,
            resolution,
            labels_applied: Vec::new(),
            assignees_applied: Vec::new(),
            comment,
            dry_run,
        };

        if dry_run {
            info!(issue = number, "Dry run, skipping tracker updates");
            return Ok(report);
        }

        let labels = vec![TRIAGE_LABEL.to_string()];
        self.tracker
            .add_labels(repo, number, &labels)
            .with_context(|| format!("Failed to label issue {}#{}", repo, number))?;
        report.labels_applied = labels;

        let assignees = &report.resolution.assignable_developers;
        if assignees.is_empty() {
            debug!(issue = number, "No assignable developers, skipping assignment");
        } else {
            self.tracker
                .add_assignees(repo, number, assignees)
                .with_context(|| format!("Failed to assign issue {}#{}", repo, number))?;
            info!(issue = number, assignees = ?assignees, "Assigned content developers");
            report.assignees_applied = assignees.clone();
        }

        self.tracker
            .add_comment(repo, number, &report.comment)
            .with_context(|| format!("Failed to comment on issue {}#{}", repo, number))?;
        info!(issue = number, "Posted intake comment");

        Ok(report)
    }

    fn ensure_labels(&self, repo: &RepoSlug) -> Result<()> {
        for name in [TRIAGE_LABEL, OVERDUE_LABEL] {
            let color = self.config.label_color(name);
            self.tracker
                .ensure_label(repo, name, &color)
                .with_context(|| format!("Failed to ensure label '{}' in {}", name, repo))?;
        }
        debug!(%repo, "Labels ensured");
        Ok(())
    }
}

/// Render the summary comment posted on intake.
///
/// # Examples
///
/// ```
/// use triage::Resolution;
/// use triage_agent::intake::render_intake_comment;
///
/// let resolution = Resolution {
///     mentionable_developers: vec!["alice".into()],
///     ..Resolution::default()
/// };
/// let comment = render_intake_comment(&resolution);
///
/// assert!(comment.contains("- Content Developer(s): @alice\n"));
/// assert!(comment.contains("- CD Manager(s): (none)\n"));
/// assert!(!comment.contains("Matched path"));
/// ```
pub fn render_intake_comment(resolution: &Resolution) -> String {
    let mut lines = vec![
        "🔔 **New issue intake**".to_string(),
        String::new(),
        format!(
            "- Content Developer(s): {}",
            mentions(&resolution.mentionable_developers)
        ),
        format!("- CD Manager(s): {}", mentions(&resolution.mentionable_managers)),
    ];
    if let Some(path) = &resolution.matched_path {
        lines.push(format!("- Matched path: `{}`", path));
    }
    lines.push(String::new());
    lines.push(format!(
        "Labelled with `{}` and assigned to Content Developer(s).",
        TRIAGE_LABEL
    ));
    lines.join("\n")
}

fn mentions(handles: &[String]) -> String {
    if handles.is_empty() {
        return NONE_PLACEHOLDER.to_string();
    }
    handles
        .iter()
        .map(|handle| format!("@{}", handle))
        .collect::<Vec<_>>()
        .join(" ")
}

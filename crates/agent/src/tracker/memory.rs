//! In-memory tracker implementation for testing.
//!
//! Mirrors the tracker's observable semantics (labels and assignees are
//! sets, unknown issues answer 404, removing an absent label answers 404)
//! and records every call in order so tests can assert exactly which
//! requests an invocation issued.

use super::{IssueLabel, RepoSlug, TrackedIssue, Tracker};
use crate::errors::ApiError;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Tracker operation, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetIssue,
    EnsureLabel,
    AddLabels,
    RemoveLabel,
    AddAssignees,
    AddComment,
}

/// A recorded tracker call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    GetIssue { number: u64 },
    EnsureLabel { name: String, color: String },
    AddLabels { number: u64, labels: Vec<String> },
    RemoveLabel { number: u64, name: String },
    AddAssignees { number: u64, assignees: Vec<String> },
    AddComment { number: u64, body: String },
}

impl TrackerCall {
    pub fn operation(&self) -> Operation {
        match self {
            TrackerCall::GetIssue { .. } => Operation::GetIssue,
            TrackerCall::EnsureLabel { .. } => Operation::EnsureLabel,
            TrackerCall::AddLabels { .. } => Operation::AddLabels,
            TrackerCall::RemoveLabel { .. } => Operation::RemoveLabel,
            TrackerCall::AddAssignees { .. } => Operation::AddAssignees,
            TrackerCall::AddComment { .. } => Operation::AddComment,
        }
    }

    /// Whether the call can change tracker state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, TrackerCall::GetIssue { .. })
    }
}

/// Stored issue state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueState {
    pub title: String,
    pub body: Option<String>,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub comments: Vec<String>,
}

#[derive(Default)]
struct State {
    issues: BTreeMap<(String, u64), IssueState>,
    repo_labels: BTreeMap<(String, String), String>,
    calls: Vec<TrackerCall>,
    failing: HashSet<Operation>,
}

/// In-memory tracker backend.
///
/// Uses `Rc<RefCell<>>` for shared interior mutability - clones share the same data.
///
/// # Examples
///
/// ```
/// use triage_agent::tracker::{InMemoryTracker, RepoSlug, Tracker};
///
/// let repo: RepoSlug = "acme/site".parse().unwrap();
/// let tracker = InMemoryTracker::new();
/// tracker.add_issue(&repo, 1, "Typo", Some("docs/a.md"));
///
/// tracker.add_labels(&repo, 1, &["triage".to_string()]).unwrap();
/// assert_eq!(tracker.issue(&repo, 1).unwrap().labels, vec!["triage"]);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryTracker {
    state: Rc<RefCell<State>>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an issue.
    pub fn add_issue(&self, repo: &RepoSlug, number: u64, title: &str, body: Option<&str>) {
        self.state.borrow_mut().issues.insert(
            (repo.to_string(), number),
            IssueState {
                title: title.to_string(),
                body: body.map(str::to_string),
                ..IssueState::default()
            },
        );
    }

    /// Seed a repository label.
    pub fn add_repo_label(&self, repo: &RepoSlug, name: &str, color: &str) {
        self.state
            .borrow_mut()
            .repo_labels
            .insert((repo.to_string(), name.to_lowercase()), color.to_string());
    }

    /// Make every subsequent call of `operation` fail with a 500.
    pub fn fail_on(&self, operation: Operation) {
        self.state.borrow_mut().failing.insert(operation);
    }

    /// Snapshot of an issue.
    pub fn issue(&self, repo: &RepoSlug, number: u64) -> Option<IssueState> {
        self.state
            .borrow()
            .issues
            .get(&(repo.to_string(), number))
            .cloned()
    }

    /// Color of a repository label, if it exists.
    pub fn repo_label(&self, repo: &RepoSlug, name: &str) -> Option<String> {
        self.state
            .borrow()
            .repo_labels
            .get(&(repo.to_string(), name.to_lowercase()))
            .cloned()
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.state.borrow().calls.clone()
    }

    /// Calls that could have changed tracker state.
    pub fn mutation_calls(&self) -> Vec<TrackerCall> {
        self.calls().into_iter().filter(TrackerCall::is_mutation).collect()
    }

    /// Record a call and fail it if requested.
    fn record(&self, call: TrackerCall, path: String) -> Result<(), ApiError> {
        let operation = call.operation();
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        if state.failing.contains(&operation) {
            return Err(ApiError::Status {
                method: method_of(operation),
                path,
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn with_issue<T>(
        &self,
        repo: &RepoSlug,
        number: u64,
        method: &'static str,
        path: String,
        f: impl FnOnce(&mut IssueState) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut state = self.state.borrow_mut();
        match state.issues.get_mut(&(repo.to_string(), number)) {
            Some(issue) => f(issue),
            None => Err(not_found(method, path)),
        }
    }
}

fn method_of(operation: Operation) -> &'static str {
    match operation {
        Operation::GetIssue => "GET",
        Operation::RemoveLabel => "DELETE",
        _ => "POST",
    }
}

fn not_found(method: &'static str, path: String) -> ApiError {
    ApiError::Status {
        method,
        path,
        status: 404,
        body: "{\"message\":\"Not Found\"}".to_string(),
    }
}

impl Tracker for InMemoryTracker {
    fn get_issue(&self, repo: &RepoSlug, number: u64) -> Result<TrackedIssue, ApiError> {
        let path = format!("/repos/{}/issues/{}", repo, number);
        self.record(TrackerCall::GetIssue { number }, path.clone())?;
        self.with_issue(repo, number, "GET", path, |issue| {
            Ok(TrackedIssue {
                number,
                title: issue.title.clone(),
                body: issue.body.clone(),
                labels: issue
                    .labels
                    .iter()
                    .map(|name| IssueLabel { name: name.clone() })
                    .collect(),
            })
        })
    }

    fn ensure_label(&self, repo: &RepoSlug, name: &str, color: &str) -> Result<(), ApiError> {
        self.record(
            TrackerCall::EnsureLabel {
                name: name.to_string(),
                color: color.to_string(),
            },
            format!("/repos/{}/labels", repo),
        )?;
        self.state
            .borrow_mut()
            .repo_labels
            .entry((repo.to_string(), name.to_lowercase()))
            .or_insert_with(|| color.trim_start_matches('#').to_string());
        Ok(())
    }

    fn add_labels(&self, repo: &RepoSlug, number: u64, labels: &[String]) -> Result<(), ApiError> {
        let path = format!("/repos/{}/issues/{}/labels", repo, number);
        self.record(
            TrackerCall::AddLabels {
                number,
                labels: labels.to_vec(),
            },
            path.clone(),
        )?;
        self.with_issue(repo, number, "POST", path, |issue| {
            for label in labels {
                if !issue.labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
                    issue.labels.push(label.clone());
                }
            }
            Ok(())
        })?;
        // Like GitHub, adding an unknown label creates it
        let mut state = self.state.borrow_mut();
        for label in labels {
            state
                .repo_labels
                .entry((repo.to_string(), label.to_lowercase()))
                .or_insert_with(|| "ededed".to_string());
        }
        Ok(())
    }

    fn remove_label(&self, repo: &RepoSlug, number: u64, name: &str) -> Result<(), ApiError> {
        let path = format!("/repos/{}/issues/{}/labels/{}", repo, number, name);
        self.record(
            TrackerCall::RemoveLabel {
                number,
                name: name.to_string(),
            },
            path.clone(),
        )?;
        self.with_issue(repo, number, "DELETE", path.clone(), |issue| {
            let before = issue.labels.len();
            issue.labels.retain(|l| !l.eq_ignore_ascii_case(name));
            if issue.labels.len() == before {
                return Err(not_found("DELETE", path));
            }
            Ok(())
        })
    }

    fn add_assignees(
        &self,
        repo: &RepoSlug,
        number: u64,
        assignees: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("/repos/{}/issues/{}/assignees", repo, number);
        self.record(
            TrackerCall::AddAssignees {
                number,
                assignees: assignees.to_vec(),
            },
            path.clone(),
        )?;
        self.with_issue(repo, number, "POST", path, |issue| {
            for assignee in assignees {
                if !issue.assignees.iter().any(|a| a.eq_ignore_ascii_case(assignee)) {
                    issue.assignees.push(assignee.clone());
                }
            }
            Ok(())
        })
    }

    fn add_comment(&self, repo: &RepoSlug, number: u64, body: &str) -> Result<(), ApiError> {
        let path = format!("/repos/{}/issues/{}/comments", repo, number);
        self.record(
            TrackerCall::AddComment {
                number,
                body: body.to_string(),
            },
            path.clone(),
        )?;
        self.with_issue(repo, number, "POST", path, |issue| {
            issue.comments.push(body.to_string());
            Ok(())
        })
    }
}

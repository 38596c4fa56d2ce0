//! Documentation Issue Triage Agent
//!
//! Drives the issue tracker for two events: a newly opened issue is labelled,
//! assigned to its content developers and announced in a comment; a comment
//! by a content developer on an overdue issue clears the overdue label.
//!
//! Routing decisions come from the `triage` crate. This crate adds the
//! tracker client, the orchestration of tracker calls and the CLI surface.

pub mod cli;
pub mod comment;
pub mod errors;
pub mod intake;
pub mod output;
pub mod tracker;

pub use comment::{handle_comment, CommentOutcome};
pub use errors::{ApiError, UsageError};
pub use intake::{render_intake_comment, Intake, IntakeReport};
pub use tracker::{GithubTracker, InMemoryTracker, RepoSlug, Tracker};

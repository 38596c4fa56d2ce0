//! Command-line interface definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use triage::DEFAULT_CONFIG_PATH;

use crate::tracker::github::DEFAULT_API_URL;

/// Documentation issue triage agent
///
/// Labels, assigns and announces newly opened documentation issues, and
/// clears the overdue label when a content developer comments.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments or usage error
///   3  - Issue or repository not found
///   4  - Configuration error
///  10  - Tracker API call failed
#[derive(Parser, Debug)]
#[command(name = "triage-agent")]
#[command(version, about = "Documentation issue triage agent", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Tracker API token
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Tracker API base URL
    #[arg(long, env = "GITHUB_API_URL", global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Timeout for each tracker request, in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Triage a newly opened issue: label, assign and comment
    Intake {
        #[command(flatten)]
        target: IssueTarget,

        #[command(flatten)]
        config: ConfigArg,

        /// Resolve and report without changing the issue
        #[arg(long)]
        dry_run: bool,

        /// Output JSON format
        #[arg(long)]
        json: bool,
    },

    /// React to a new comment: clear `overdue` when a content developer replies
    Comment {
        #[command(flatten)]
        target: IssueTarget,

        /// Login of the comment author
        #[arg(long)]
        commenter: String,

        #[command(flatten)]
        config: ConfigArg,

        /// Output JSON format
        #[arg(long)]
        json: bool,
    },

    /// Preview routing for an issue title and body (offline)
    Resolve {
        /// Issue title
        #[arg(long)]
        title: String,

        /// Issue body
        #[arg(long, conflicts_with = "body_file")]
        body: Option<String>,

        /// Read the issue body from a file
        #[arg(long)]
        body_file: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArg,

        /// Output JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Repository and issue an event refers to.
#[derive(Args, Debug)]
pub struct IssueTarget {
    /// Repository in owner/repo form
    #[arg(long)]
    pub repo: String,

    /// Issue number
    #[arg(long)]
    pub issue: u64,
}

#[derive(Args, Debug)]
pub struct ConfigArg {
    /// Path to the triage configuration file
    #[arg(long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub path: PathBuf,
}

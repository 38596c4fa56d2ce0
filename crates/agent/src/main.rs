//! Documentation Issue Triage Agent
//!
//! Entry point for the `triage-agent` binary. Each invocation handles exactly
//! one event for one issue and exits; the exit status tells the invoking
//! automation whether the run succeeded.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use triage::{resolve, Resolution, TriageConfig};
use triage_agent::cli::{Cli, Commands, IssueTarget};
use triage_agent::comment::{handle_comment, CommentOutcome};
use triage_agent::errors::UsageError;
use triage_agent::intake::{Intake, IntakeReport};
use triage_agent::output::{ExitCode, JsonOutput, OutputContext};
use triage_agent::tracker::{GithubTracker, RepoSlug};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TRIAGE_LOG";

fn main() {
    let exit_code = match run() {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from_error(&e)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(quiet: bool) {
    let default_level = if quiet { Level::WARN } else { Level::INFO };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match &cli.command {
        Commands::Intake {
            target,
            config,
            dry_run,
            json,
        } => {
            let output = OutputContext::new(cli.quiet, *json);
            let repo = parse_repo(target)?;
            let config = load_config(&config.path)?;
            let tracker = connect(&cli)?;

            let report = Intake::new(&tracker, &config).run(&repo, target.issue, *dry_run)?;

            output.print_json(&JsonOutput::success(&report, "intake"))?;
            print_intake_report(&output, &report)?;
        }
        Commands::Comment {
            target,
            commenter,
            config,
            json,
        } => {
            let output = OutputContext::new(cli.quiet, *json);
            let repo = parse_repo(target)?;
            let config = load_config(&config.path)?;
            let tracker = connect(&cli)?;

            let outcome = handle_comment(&tracker, &config, &repo, target.issue, commenter)?;

            output.print_json(&JsonOutput::success(outcome, "comment"))?;
            output.print_data(describe_outcome(outcome, &repo, target.issue))?;
        }
        Commands::Resolve {
            title,
            body,
            body_file,
            config,
            json,
        } => {
            let output = OutputContext::new(cli.quiet, *json);
            let config = load_config(&config.path)?;
            let body = match body_file {
                Some(path) => Some(
                    std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read body file {}", path.display()))?,
                ),
                None => body.clone(),
            };

            let resolution = resolve(&config, title, body.as_deref());

            output.print_json(&JsonOutput::success(&resolution, "resolve"))?;
            print_resolution(&output, &resolution)?;
        }
    }

    Ok(())
}

fn parse_repo(target: &IssueTarget) -> Result<RepoSlug> {
    Ok(target.repo.parse::<RepoSlug>()?)
}

fn load_config(path: &Path) -> Result<TriageConfig> {
    let config = TriageConfig::load(path)?;
    tracing::debug!(path = %path.display(), routes = config.routes().len(), "Loaded configuration");
    Ok(config)
}

/// Build the tracker client. Only called once configuration has loaded.
fn connect(cli: &Cli) -> Result<GithubTracker> {
    let token = cli
        .token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(UsageError::MissingToken)?;

    Ok(GithubTracker::new(
        &cli.api_url,
        token,
        Duration::from_secs(cli.timeout_secs),
    ))
}

fn print_intake_report(output: &OutputContext, report: &IntakeReport) -> Result<()> {
    let resolution = &report.resolution;
    let prefix = if report.dry_run { "Would triage" } else { "Triaged" };
    output.print_data(format!("{} {}#{}", prefix, report.repo, report.issue))?;
    output.print_info(format!(
        "  Matched path: {}",
        resolution.matched_path.as_deref().unwrap_or("(none)")
    ))?;
    output.print_info(format!(
        "  Assignees: {}",
        list_or_none(&resolution.assignable_developers)
    ))?;
    if report.dry_run {
        output.print_info("")?;
        output.print_info(&report.comment)?;
    }
    Ok(())
}

fn print_resolution(output: &OutputContext, resolution: &Resolution) -> Result<()> {
    output.print_data(format!(
        "Matched path: {}",
        resolution.matched_path.as_deref().unwrap_or("(none)")
    ))?;
    output.print_data(format!(
        "Assignable developers: {}",
        list_or_none(&resolution.assignable_developers)
    ))?;
    output.print_data(format!(
        "Mentioned developers: {}",
        list_or_none(&resolution.mentionable_developers)
    ))?;
    output.print_data(format!(
        "Mentioned managers: {}",
        list_or_none(&resolution.mentionable_managers)
    ))?;
    output.print_info(format!(
        "Candidate paths: {}",
        list_or_none(&resolution.candidates)
    ))?;
    Ok(())
}

fn describe_outcome(outcome: CommentOutcome, repo: &RepoSlug, issue: u64) -> String {
    match outcome {
        CommentOutcome::NotContentDeveloper => {
            "Commenter is not a content developer, nothing to do".to_string()
        }
        CommentOutcome::LabelAbsent => format!("{}#{} is not overdue", repo, issue),
        CommentOutcome::OverdueCleared => format!("Cleared overdue label on {}#{}", repo, issue),
        CommentOutcome::RemovalFailed => {
            format!("Could not remove overdue label on {}#{} (ignored)", repo, issue)
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

//! CLI tests for paths that never reach the network.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
content_developers: ["@default-dev"]
cd_managers: ["@acme/managers"]
routes:
  - pattern: "docs/setup/*.md"
    content_developers: ["@alice", "@acme/setup-team"]
"#;

/// Temp directory holding a valid `.github/agent.yml`.
fn setup_config() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join(".github")).unwrap();
    fs::write(temp_dir.path().join(".github/agent.yml"), CONFIG).unwrap();
    temp_dir
}

fn agent(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("triage-agent"));
    cmd.current_dir(temp_dir.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_API_URL")
        .env_remove("TRIAGE_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = TempDir::new().unwrap();
    agent(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("intake"))
        .stdout(predicate::str::contains("comment"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_resolve_reports_matched_route() {
    let temp_dir = setup_config();
    agent(&temp_dir)
        .args([
            "resolve",
            "--title",
            "Install fails",
            "--body",
            "Affected page: docs/setup/install.md",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched path: docs/setup/install.md"))
        .stdout(predicate::str::contains("Assignable developers: alice"))
        .stdout(predicate::str::contains("Mentioned developers: alice, acme/setup-team"));
}

#[test]
fn test_resolve_json_envelope() {
    let temp_dir = setup_config();
    let output = agent(&temp_dir)
        .args(["resolve", "--title", "Search is slow", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["metadata"]["command"], "resolve");
    assert!(json["data"]["matched_path"].is_null());
    assert_eq!(json["data"]["assignable_developers"][0], "default-dev");
    assert_eq!(json["data"]["mentionable_managers"][0], "acme/managers");
}

#[test]
fn test_resolve_reads_body_file() {
    let temp_dir = setup_config();
    fs::write(
        temp_dir.path().join("body.md"),
        "See https://github.com/acme/site/blob/main/docs/setup/upgrade.md",
    )
    .unwrap();

    agent(&temp_dir)
        .args(["resolve", "--title", "Outdated", "--body-file", "body.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Matched path: docs/setup/upgrade.md"));
}

#[test]
fn test_missing_config_fails_before_network() {
    let temp_dir = TempDir::new().unwrap();
    agent(&temp_dir)
        .args(["--token", "t", "--api-url", "http://127.0.0.1:9"])
        .args(["intake", "--repo", "acme/site", "--issue", "1"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains(".github/agent.yml"));
}

#[test]
fn test_invalid_config_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bad.yml"), "content_developers: [\"@\"]\n").unwrap();

    agent(&temp_dir)
        .args(["resolve", "--title", "x", "--config", "bad.yml"])
        .assert()
        .code(4);
}

#[test]
fn test_bad_repo_is_invalid_argument() {
    let temp_dir = setup_config();
    agent(&temp_dir)
        .args(["--token", "t", "comment", "--repo", "not-a-slug", "--issue", "1"])
        .args(["--commenter", "alice"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not-a-slug"));
}

#[test]
fn test_missing_token_is_invalid_argument() {
    let temp_dir = setup_config();
    agent(&temp_dir)
        .args(["intake", "--repo", "acme/site", "--issue", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

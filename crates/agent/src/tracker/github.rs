//! GitHub REST API backend.
//!
//! One blocking `ureq` agent is built per invocation and carries the bearer
//! token, API version and timeout for every request. Any status outside
//! 2xx becomes an `ApiError::Status` with the method, path, status and
//! response body.

use super::{RepoSlug, TrackedIssue, Tracker};
use crate::errors::ApiError;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("triage-agent/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// Tracker backed by the GitHub REST API.
pub struct GithubTracker {
    agent: ureq::Agent,
    api_url: String,
    token: String,
}

impl GithubTracker {
    /// Create a client for `api_url` authenticating with `token`.
    pub fn new(api_url: &str, token: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }

    /// Send one request and decode the JSON answer (`Value::Null` when empty).
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.api_url, path);
        debug!(method = method.as_str(), path, "Tracker request");

        let result = match (method, body) {
            (Method::Get, _) => self.authorize(self.agent.get(&url)).call(),
            (Method::Delete, _) => self.authorize(self.agent.delete(&url)).call(),
            (Method::Post, Some(payload)) => {
                self.authorize(self.agent.post(&url)).send_json(payload)
            }
            (Method::Post, None) => self.authorize(self.agent.post(&url)).send_empty(),
        };

        let transport = |err: ureq::Error| ApiError::Transport {
            method: method.as_str(),
            path: path.to_string(),
            message: err.to_string(),
        };

        let mut response = result.map_err(transport)?;
        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string().map_err(transport)?;

        if !(200..300).contains(&status) {
            return Err(ApiError::Status {
                method: method.as_str(),
                path: path.to_string(),
                status,
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Decode {
            method: method.as_str(),
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}

impl Tracker for GithubTracker {
    fn get_issue(&self, repo: &RepoSlug, number: u64) -> Result<TrackedIssue, ApiError> {
        let path = issue_path(repo, number);
        let value = self.send(Method::Get, &path, None)?;
        serde_json::from_value(value).map_err(|err| ApiError::Decode {
            method: Method::Get.as_str(),
            path,
            message: err.to_string(),
        })
    }

    fn ensure_label(&self, repo: &RepoSlug, name: &str, color: &str) -> Result<(), ApiError> {
        let path = format!("/repos/{}/labels/{}", repo, encode_segment(name));
        match self.send(Method::Get, &path, None) {
            Ok(_) => return Ok(()),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let payload = json!({ "name": name, "color": color.trim_start_matches('#') });
        match self.send(Method::Post, &format!("/repos/{}/labels", repo), Some(&payload)) {
            Ok(_) => Ok(()),
            // Created by someone else between the lookup and the create
            Err(err) if err.status() == Some(422) => {
                debug!(label = name, "Label already exists");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn add_labels(&self, repo: &RepoSlug, number: u64, labels: &[String]) -> Result<(), ApiError> {
        let path = format!("{}/labels", issue_path(repo, number));
        self.send(Method::Post, &path, Some(&json!({ "labels": labels })))
            .map(|_| ())
    }

    fn remove_label(&self, repo: &RepoSlug, number: u64, name: &str) -> Result<(), ApiError> {
        let path = format!("{}/labels/{}", issue_path(repo, number), encode_segment(name));
        self.send(Method::Delete, &path, None).map(|_| ())
    }

    fn add_assignees(
        &self,
        repo: &RepoSlug,
        number: u64,
        assignees: &[String],
    ) -> Result<(), ApiError> {
        let path = format!("{}/assignees", issue_path(repo, number));
        self.send(Method::Post, &path, Some(&json!({ "assignees": assignees })))
            .map(|_| ())
    }

    fn add_comment(&self, repo: &RepoSlug, number: u64, body: &str) -> Result<(), ApiError> {
        let path = format!("{}/comments", issue_path(repo, number));
        self.send(Method::Post, &path, Some(&json!({ "body": body })))
            .map(|_| ())
    }
}

fn issue_path(repo: &RepoSlug, number: u64) -> String {
    format!("/repos/{}/issues/{}", repo, number)
}

/// Percent-encode one URL path segment (RFC 3986 unreserved characters kept).
fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

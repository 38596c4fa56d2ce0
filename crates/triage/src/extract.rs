//! Candidate content path extraction from free-form issue text.
//!
//! Three independent rules are applied to the issue title and body:
//!
//! 1. Inline relative paths under a content directory (`docs/`, `guides/`,
//!    `content/`, `articles/`) ending in `.md`.
//! 2. Blob-view URLs (`https://host/owner/repo/blob/<ref>/<path>.md`), keeping
//!    only the in-repo path and dropping any fragment or query.
//! 3. Form-field lines such as `Affected page: docs/x.md`.
//!
//! Matching is case-insensitive. Results are ordered by where they first
//! appear in the text, duplicates are dropped and leading `/` is stripped.

use regex::Regex;
use std::sync::OnceLock;

/// Directories whose Markdown files count as repository content.
pub const CONTENT_DIRS: &[&str] = &["docs", "guides", "content", "articles"];

/// Extension of content files.
pub const CONTENT_EXTENSION: &str = ".md";

static INLINE_PATH_REGEX: OnceLock<Regex> = OnceLock::new();
static BLOB_URL_REGEX: OnceLock<Regex> = OnceLock::new();
static FORM_FIELD_REGEX: OnceLock<Regex> = OnceLock::new();

/// Relative path that starts with a content directory.
///
/// The directory must begin the path (optionally after a single `/`), so
/// `website/docs/a.md` is not a candidate. The match stops right after the
/// extension, so trailing `.`, `,` or `)` never become part of the path.
fn inline_path_regex() -> &'static Regex {
    INLINE_PATH_REGEX.get_or_init(|| {
        let dirs = CONTENT_DIRS.join("|");
        let ext = regex::escape(CONTENT_EXTENSION);
        Regex::new(&format!(r#"(?i)(?:^|[^\w./-])/?((?:{dirs})/[^\s'"`<>]*?{ext})\b"#))
            .expect("Inline path regex should compile")
    })
}

/// `https://host/owner/repo/blob/<ref>/<path>.md`, path captured without fragment.
fn blob_url_regex() -> &'static Regex {
    BLOB_URL_REGEX.get_or_init(|| {
        let ext = regex::escape(CONTENT_EXTENSION);
        Regex::new(&format!(
            r#"(?i)https?://[^\s/]+/[^\s/]+/[^\s/]+/blob/[^\s/]+/([^\s#?'"`<>]+?{ext})\b"#
        ))
        .expect("Blob URL regex should compile")
    })
}

/// `Affected page: <path>.md` and friends, at the start of a line.
fn form_field_regex() -> &'static Regex {
    FORM_FIELD_REGEX.get_or_init(|| {
        let ext = regex::escape(CONTENT_EXTENSION);
        Regex::new(&format!(
            r#"(?im)^[ \t>*_-]*(?:affected page|affected|path|file)[ \t]*:[*_ \t]*[`'"]?([^\s`'"]+?{ext})\b"#
        ))
        .expect("Form field regex should compile")
    })
}

/// Extract candidate content paths from an issue title and optional body.
///
/// # Examples
///
/// ```
/// use triage::extract_paths;
///
/// let paths = extract_paths(
///     "Broken link in docs/setup/install.md",
///     Some("See https://github.com/acme/site/blob/main/guides/intro.md#usage"),
/// );
/// assert_eq!(paths, vec!["docs/setup/install.md", "guides/intro.md"]);
///
/// assert!(extract_paths("Question", None).is_empty());
/// ```
pub fn extract_paths(title: &str, body: Option<&str>) -> Vec<String> {
    let text = format!("{}\n{}", title, body.unwrap_or_default());

    let mut found: Vec<(usize, String)> = Vec::new();
    for regex in [inline_path_regex(), blob_url_regex()] {
        for caps in regex.captures_iter(&text) {
            if let Some(m) = caps.get(1) {
                found.push((m.start(), m.as_str().to_string()));
            }
        }
    }
    for caps in form_field_regex().captures_iter(&text) {
        if let Some(m) = caps.get(1) {
            // URLs in form fields are handled by the blob rule
            if !m.as_str().contains("://") {
                found.push((m.start(), m.as_str().to_string()));
            }
        }
    }

    found.sort_by_key(|(offset, _)| *offset);

    let mut paths: Vec<String> = Vec::new();
    for (_, raw) in found {
        let path = normalize_path(&raw);
        if !path.is_empty() && !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }
    paths
}

/// Normalize a candidate path: no leading `/`.
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

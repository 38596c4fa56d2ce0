//! Glob patterns for routing rules.
//!
//! Patterns are matched against `/`-separated repository paths:
//!
//! - `*` matches any run of characters inside one path segment
//! - `?` matches exactly one character other than `/`
//! - `**` as a whole segment matches zero or more segments
//!
//! Matching is case-sensitive, like repository paths themselves.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, non-empty glob pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GlobPattern(String);

impl GlobPattern {
    /// Create a pattern, stripping any leading `/`.
    ///
    /// # Errors
    ///
    /// Returns an error message if the pattern is empty.
    pub fn new(pattern: &str) -> Result<Self, String> {
        let trimmed = pattern.trim().trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(format!("Glob pattern cannot be empty: '{}'", pattern));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Test a candidate path (leading `/` ignored) against this pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage::GlobPattern;
    ///
    /// let pattern = GlobPattern::new("docs/setup/*.md").unwrap();
    /// assert!(pattern.matches("docs/setup/install.md"));
    /// assert!(!pattern.matches("docs/setup/linux/install.md"));
    ///
    /// let deep = GlobPattern::new("docs/**/*.md").unwrap();
    /// assert!(deep.matches("docs/setup/linux/install.md"));
    /// ```
    pub fn matches(&self, path: &str) -> bool {
        let pattern: Vec<&str> = self.0.split('/').collect();
        let candidate: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match_segments(&pattern, &candidate)
    }
}

impl TryFrom<String> for GlobPattern {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GlobPattern::new(&value)
    }
}

impl From<GlobPattern> for String {
    fn from(pattern: GlobPattern) -> Self {
        pattern.0
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => {
            // Zero segments, or swallow one and retry
            match_segments(rest, path)
                || (!path.is_empty() && match_segments(pattern, &path[1..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((candidate, remaining)) => {
                segment_match(segment, candidate) && match_segments(rest, remaining)
            }
            None => false,
        },
    }
}

/// Single-segment wildcard match with `*` and `?`.
fn segment_match(pattern: &str, candidate: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let c: Vec<char> = candidate.chars().collect();
    let mut pi = 0usize;
    let mut ci = 0usize;
    let mut star: Option<usize> = None;
    let mut resume = 0usize;

    while ci < c.len() {
        if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            pi += 1;
            resume = ci;
        } else if pi < p.len() && (p[pi] == '?' || p[pi] == c[ci]) {
            pi += 1;
            ci += 1;
        } else if let Some(star_idx) = star {
            pi = star_idx + 1;
            resume += 1;
            ci = resume;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str) -> GlobPattern {
        GlobPattern::new(pattern).unwrap()
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert!(GlobPattern::new("").is_err());
        assert!(GlobPattern::new("  ").is_err());
        assert!(GlobPattern::new("/").is_err());
    }

    #[test]
    fn test_literal_match() {
        assert!(glob("docs/index.md").matches("docs/index.md"));
        assert!(!glob("docs/index.md").matches("docs/index.mdx"));
        assert!(!glob("docs/index.md").matches("docs"));
    }

    #[test]
    fn test_star_stays_within_segment() {
        let pattern = glob("docs/*.md");
        assert!(pattern.matches("docs/a.md"));
        assert!(pattern.matches("docs/.md"));
        assert!(!pattern.matches("docs/x/a.md"));
        assert!(!pattern.matches("guides/a.md"));
    }

    #[test]
    fn test_question_mark() {
        let pattern = glob("docs/v?/intro.md");
        assert!(pattern.matches("docs/v1/intro.md"));
        assert!(!pattern.matches("docs/v10/intro.md"));
    }

    #[test]
    fn test_double_star_matches_any_depth() {
        let pattern = glob("docs/**");
        assert!(pattern.matches("docs/a.md"));
        assert!(pattern.matches("docs/x/y/z.md"));
        assert!(!pattern.matches("guides/a.md"));

        let middle = glob("docs/**/install.md");
        assert!(middle.matches("docs/install.md"));
        assert!(middle.matches("docs/setup/linux/install.md"));
        assert!(!middle.matches("docs/setup/uninstall.md"));
    }

    #[test]
    fn test_leading_slashes_ignored() {
        assert!(glob("/docs/*.md").matches("docs/a.md"));
        assert!(glob("docs/*.md").matches("/docs/a.md"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!glob("docs/*.md").matches("Docs/a.md"));
    }

    #[test]
    fn test_multiple_stars_in_segment() {
        let pattern = glob("docs/*-guide-*.md");
        assert!(pattern.matches("docs/admin-guide-v2.md"));
        assert!(!pattern.matches("docs/admin-manual.md"));
    }

    #[test]
    fn test_star_is_a_wildcard_against_literal_star() {
        let pattern = glob("docs/*.md");
        assert!(pattern.matches("docs/*a.md"));
        assert!(pattern.matches("docs/*.md"));
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let parsed: Result<GlobPattern, _> = serde_yaml::from_str("\"\"");
        assert!(parsed.is_err());
    }
}

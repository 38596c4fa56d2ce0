//! Routing rules and the route matcher.
//!
//! A routing rule ties a glob pattern to the content developers and managers
//! responsible for the matching files. Matching walks candidate paths in
//! extraction order and, for each path, tries every rule in configuration
//! order; the first hit wins.

use crate::glob::GlobPattern;
use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// A single `pattern -> owners` routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    /// Glob pattern; a rule without one never matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<GlobPattern>,

    /// Content developers responsible for matching paths (may be empty).
    #[serde(default, deserialize_with = "crate::config::null_as_empty")]
    pub content_developers: Vec<Identity>,

    /// Managers to notify for matching paths (may be empty).
    #[serde(default, deserialize_with = "crate::config::null_as_empty")]
    pub cd_managers: Vec<Identity>,
}

impl RoutingRule {
    /// Create a rule from raw handle strings.
    ///
    /// # Errors
    ///
    /// Returns an error message if the pattern is empty.
    pub fn new(pattern: &str, developers: &[&str], managers: &[&str]) -> Result<Self, String> {
        Ok(Self {
            pattern: Some(GlobPattern::new(pattern)?),
            content_developers: developers.iter().map(|h| Identity::parse(h)).collect(),
            cd_managers: managers.iter().map(|h| Identity::parse(h)).collect(),
        })
    }

    /// Whether this rule's pattern matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.matches(path))
    }
}

/// The winning rule and the candidate path it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub rule: &'a RoutingRule,
    pub path: String,
}

impl RouteMatch<'_> {
    pub fn developers(&self) -> &[Identity] {
        &self.rule.content_developers
    }

    pub fn managers(&self) -> &[Identity] {
        &self.rule.cd_managers
    }
}

/// Find the first rule matching any candidate path.
///
/// Candidates are the outer loop and rules the inner loop, so every rule is
/// tried against the first candidate before the second candidate is looked
/// at. Returns `None` when nothing matches; callers fall back to defaults.
///
/// # Examples
///
/// ```
/// use triage::{match_route, RoutingRule};
///
/// let routes = vec![
///     RoutingRule::new("guides/**", &["@gina"], &[]).unwrap(),
///     RoutingRule::new("docs/**", &["@dave"], &[]).unwrap(),
/// ];
/// let candidates = vec!["docs/a.md".to_string(), "guides/b.md".to_string()];
///
/// let hit = match_route(&routes, &candidates).unwrap();
/// assert_eq!(hit.path, "docs/a.md");
/// assert_eq!(hit.developers()[0].handle(), "dave");
/// ```
pub fn match_route<'a>(routes: &'a [RoutingRule], candidates: &[String]) -> Option<RouteMatch<'a>> {
    for candidate in candidates {
        let path = candidate.trim_start_matches('/');
        if let Some(rule) = routes.iter().find(|rule| rule.matches(path)) {
            return Some(RouteMatch {
                rule,
                path: path.to_string(),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, developers: &[&str]) -> RoutingRule {
        RoutingRule::new(pattern, developers, &[]).unwrap()
    }

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_rule_wins_for_a_candidate() {
        let routes = vec![rule("docs/**", &["@first"]), rule("docs/setup/*.md", &["@second"])];
        let hit = match_route(&routes, &paths(&["docs/setup/install.md"])).unwrap();
        assert_eq!(hit.developers()[0].handle(), "first");
    }

    #[test]
    fn test_candidate_order_is_outermost() {
        let routes = vec![rule("guides/*.md", &["@g"]), rule("docs/*.md", &["@d"])];
        let hit = match_route(&routes, &paths(&["docs/a.md", "guides/b.md"])).unwrap();
        assert_eq!(hit.path, "docs/a.md");
        assert_eq!(hit.developers()[0].handle(), "d");
    }

    #[test]
    fn test_later_candidate_matches_when_first_does_not() {
        let routes = vec![rule("guides/*.md", &["@g"])];
        let hit = match_route(&routes, &paths(&["docs/a.md", "guides/b.md"])).unwrap();
        assert_eq!(hit.path, "guides/b.md");
    }

    #[test]
    fn test_no_match() {
        let routes = vec![rule("guides/*.md", &["@g"])];
        assert!(match_route(&routes, &paths(&["docs/a.md"])).is_none());
        assert!(match_route(&routes, &[]).is_none());
        assert!(match_route(&[], &paths(&["docs/a.md"])).is_none());
    }

    #[test]
    fn test_rule_without_pattern_never_matches() {
        let routes = vec![
            RoutingRule {
                pattern: None,
                content_developers: vec![Identity::parse("@nobody")],
                cd_managers: vec![],
            },
            rule("docs/**", &["@d"]),
        ];
        let hit = match_route(&routes, &paths(&["docs/a.md"])).unwrap();
        assert_eq!(hit.developers()[0].handle(), "d");
    }

    #[test]
    fn test_rule_with_empty_developers_still_matches() {
        let routes = vec![rule("docs/**", &[]), rule("docs/a.md", &["@d"])];
        let hit = match_route(&routes, &paths(&["docs/a.md"])).unwrap();
        assert!(hit.developers().is_empty());
    }

    #[test]
    fn test_candidate_leading_slash_normalized() {
        let routes = vec![rule("docs/*.md", &["@d"])];
        let hit = match_route(&routes, &paths(&["/docs/a.md"])).unwrap();
        assert_eq!(hit.path, "docs/a.md");
    }
}

//! Issue resolution: extraction, route matching and partitioning combined.

use crate::config::TriageConfig;
use crate::extract::extract_paths;
use crate::identity::{partition, Identity};
use crate::routing::match_route;
use serde::Serialize;

/// Who is responsible for an issue, ready to drive tracker calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Individual developers to set as assignees.
    pub assignable_developers: Vec<String>,
    /// Developers (individuals and teams) to mention.
    pub mentionable_developers: Vec<String>,
    /// Managers (individuals and teams) to mention.
    pub mentionable_managers: Vec<String>,
    /// Candidate path that selected a route, if any.
    pub matched_path: Option<String>,
    /// Every candidate path found in the issue text.
    pub candidates: Vec<String>,
}

/// Resolve the responsible parties for an issue.
///
/// Without a matching route both lists come from the configuration
/// defaults. A matched route whose developer or manager list is empty also
/// falls back to the defaults for that list; the matched path is still
/// reported.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use triage::{resolve, TriageConfig};
///
/// let config = TriageConfig::from_yaml_str(
///     r#"
/// content_developers: ["@default-dev"]
/// routes:
///   - pattern: "docs/setup/*.md"
///     content_developers: ["@alice"]
/// "#,
///     Path::new("agent.yml"),
/// )
/// .unwrap();
///
/// let resolution = resolve(&config, "Fix typo", Some("Affected page: docs/setup/install.md"));
/// assert_eq!(resolution.matched_path.as_deref(), Some("docs/setup/install.md"));
/// assert_eq!(resolution.assignable_developers, vec!["alice"]);
/// ```
pub fn resolve(config: &TriageConfig, title: &str, body: Option<&str>) -> Resolution {
    let candidates = extract_paths(title, body);
    let route = match_route(config.routes(), &candidates);

    let (developers, managers, matched_path): (&[Identity], &[Identity], Option<String>) =
        match &route {
            Some(hit) => (
                or_defaults(hit.developers(), config.content_developers()),
                or_defaults(hit.managers(), config.cd_managers()),
                Some(hit.path.clone()),
            ),
            None => (config.content_developers(), config.cd_managers(), None),
        };

    let developers = partition(developers);
    let managers = partition(managers);

    Resolution {
        assignable_developers: developers.assignable,
        mentionable_developers: developers.mentionable,
        mentionable_managers: managers.mentionable,
        matched_path,
        candidates,
    }
}

fn or_defaults<'a>(routed: &'a [Identity], defaults: &'a [Identity]) -> &'a [Identity] {
    if routed.is_empty() {
        defaults
    } else {
        routed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config(yaml: &str) -> TriageConfig {
        TriageConfig::from_yaml_str(yaml, Path::new("agent.yml")).unwrap()
    }

    const CONFIG: &str = r#"
content_developers: ["@dev1", "@docs/writers"]
cd_managers: ["@mgr"]
routes:
  - pattern: "docs/setup/*.md"
    content_developers: ["@alice"]
  - pattern: "guides/**"
    content_developers: ["@org/guides", "@gus"]
    cd_managers: ["@gmgr"]
"#;

    #[test]
    fn test_route_match_uses_route_owners() {
        let resolution = resolve(&config(CONFIG), "", Some("guides/a/b.md is stale"));
        assert_eq!(resolution.matched_path.as_deref(), Some("guides/a/b.md"));
        assert_eq!(resolution.assignable_developers, vec!["gus"]);
        assert_eq!(resolution.mentionable_developers, vec!["org/guides", "gus"]);
        assert_eq!(resolution.mentionable_managers, vec!["gmgr"]);
    }

    #[test]
    fn test_no_match_falls_back_to_defaults() {
        let resolution = resolve(&config(CONFIG), "Question", Some("nothing here"));
        assert_eq!(resolution.matched_path, None);
        assert!(resolution.candidates.is_empty());
        assert_eq!(resolution.assignable_developers, vec!["dev1"]);
        assert_eq!(resolution.mentionable_developers, vec!["dev1", "docs/writers"]);
        assert_eq!(resolution.mentionable_managers, vec!["mgr"]);
    }

    #[test]
    fn test_unrouted_candidate_falls_back_to_defaults() {
        let resolution = resolve(&config(CONFIG), "", Some("articles/x.md"));
        assert_eq!(resolution.candidates, vec!["articles/x.md"]);
        assert_eq!(resolution.matched_path, None);
        assert_eq!(resolution.assignable_developers, vec!["dev1"]);
    }

    #[test]
    fn test_route_without_managers_uses_default_managers() {
        let resolution = resolve(&config(CONFIG), "docs/setup/install.md", None);
        assert_eq!(resolution.assignable_developers, vec!["alice"]);
        assert_eq!(resolution.mentionable_managers, vec!["mgr"]);
    }

    #[test]
    fn test_route_with_empty_developers_uses_defaults() {
        let cfg = config(
            r#"
content_developers: ["@dev1"]
routes:
  - pattern: "docs/**"
    content_developers: []
"#,
        );
        let resolution = resolve(&cfg, "docs/a.md", None);
        assert_eq!(resolution.matched_path.as_deref(), Some("docs/a.md"));
        assert_eq!(resolution.assignable_developers, vec!["dev1"]);
    }

    #[test]
    fn test_empty_config_resolves_to_nobody() {
        let resolution = resolve(&TriageConfig::default(), "docs/a.md", None);
        assert!(resolution.assignable_developers.is_empty());
        assert!(resolution.mentionable_developers.is_empty());
        assert!(resolution.mentionable_managers.is_empty());
    }
}

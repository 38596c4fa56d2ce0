//! Property-based tests for the routing engine
//!
//! These tests use `proptest` to check extraction, matching and partitioning
//! invariants over generated paths, URLs, rules and handles.

use crate::extract::{extract_paths, CONTENT_DIRS};
use crate::identity::{partition, Identity};
use crate::routing::{match_route, RoutingRule};
use proptest::prelude::*;

// Path segments without dots so `.md` only appears at the end
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,8}".prop_map(|s| s.to_string())
}

fn content_path_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(CONTENT_DIRS.to_vec()),
        prop::collection::vec(segment_strategy(), 0..3),
        segment_strategy(),
    )
        .prop_map(|(dir, dirs, stem)| {
            let mut parts = vec![dir.to_string()];
            parts.extend(dirs);
            parts.push(format!("{}.md", stem));
            parts.join("/")
        })
}

fn any_path_strategy() -> impl Strategy<Value = String> {
    (prop::collection::vec(segment_strategy(), 0..3), segment_strategy()).prop_map(
        |(dirs, stem)| {
            let mut parts = dirs;
            parts.push(format!("{}.md", stem));
            parts.join("/")
        },
    )
}

fn trailing_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", ".", ",", ")", ").", "),"])
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "docs/**",
        "docs/*.md",
        "guides/**/*.md",
        "content/*/*.md",
        "articles/?*.md",
        "**/index.md",
        "*",
    ])
    .prop_map(|s| s.to_string())
}

// Property 1: inline content paths are always extracted, without trailing punctuation
proptest! {
    #[test]
    fn prop_inline_path_extracted(
        path in content_path_strategy(),
        trailing in trailing_strategy(),
        lead in "[A-Za-z ]{0,12}",
    ) {
        let body = format!("{} {}{} thanks", lead, path, trailing);
        let paths = extract_paths("Issue", Some(&body));
        prop_assert!(paths.contains(&path), "{:?} not in {:?}", path, paths);
        for found in &paths {
            prop_assert!(!found.ends_with('.') && !found.ends_with(',') && !found.ends_with(')'));
        }
    }
}

// Property 2: blob URLs yield the in-repo path with the fragment dropped
proptest! {
    #[test]
    fn prop_blob_url_path_extracted(
        owner in "[a-z0-9-]{1,10}",
        repo in "[a-z0-9-]{1,10}",
        git_ref in "[a-z0-9]{1,8}",
        path in any_path_strategy(),
        fragment in "[A-Za-z0-9-]{0,8}",
    ) {
        let url = format!(
            "https://github.com/{}/{}/blob/{}/{}#{}",
            owner, repo, git_ref, path, fragment
        );
        let paths = extract_paths("", Some(&url));
        prop_assert!(paths.contains(&path), "{:?} not in {:?}", path, paths);
        prop_assert!(paths.iter().all(|p| !p.contains('#')));
    }
}

// Property 3: matching is deterministic and picks the first candidate, then the first rule
proptest! {
    #[test]
    fn prop_match_order(
        patterns in prop::collection::vec(pattern_strategy(), 0..6),
        candidates in prop::collection::vec(content_path_strategy(), 0..5),
    ) {
        let routes: Vec<RoutingRule> = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let developer = format!("@dev{}", i);
                RoutingRule::new(p, &[developer.as_str()], &[]).unwrap()
            })
            .collect();

        let first = match_route(&routes, &candidates);
        let second = match_route(&routes, &candidates);
        prop_assert_eq!(&first, &second);

        let expected = candidates.iter().find_map(|candidate| {
            routes
                .iter()
                .position(|rule| rule.matches(candidate))
                .map(|index| (candidate.clone(), index))
        });

        match (first, expected) {
            (None, None) => {}
            (Some(hit), Some((path, index))) => {
                prop_assert_eq!(hit.path, path);
                prop_assert!(std::ptr::eq(hit.rule, &routes[index]));
            }
            (hit, expected) => prop_assert!(false, "got {:?}, expected {:?}", hit, expected),
        }
    }
}

// Property 4: team handles are mention-only, individuals are both
proptest! {
    #[test]
    fn prop_partition_teams_never_assignable(
        handles in prop::collection::vec(
            prop_oneof![
                "@?[a-z][a-z0-9-]{0,8}",
                "@?[a-z][a-z0-9-]{0,8}/[a-z][a-z0-9-]{0,8}",
            ],
            0..8,
        )
    ) {
        let identities: Vec<Identity> = handles.iter().map(|h| Identity::parse(h)).collect();
        let split = partition(&identities);

        prop_assert_eq!(split.mentionable.len(), handles.len());
        for handle in &handles {
            let bare = handle.trim_start_matches('@').to_string();
            prop_assert!(split.mentionable.contains(&bare));
            if bare.contains('/') {
                prop_assert!(!split.assignable.contains(&bare));
            } else {
                prop_assert!(split.assignable.contains(&bare));
            }
        }
    }
}

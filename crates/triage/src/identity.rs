//! Identity handles for content owners.
//!
//! A handle names either an individual account or a team. Teams are written
//! as `org/team` and can only be mentioned; individuals can also be set as
//! issue assignees. The distinction is made once, when a handle is parsed,
//! so call sites never re-inspect raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator that marks a handle as a team (`org/team`).
pub const TEAM_SEPARATOR: char = '/';

/// A parsed identity handle with its `@` sigil removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Identity {
    /// A single account: assignable and mentionable.
    Individual(String),
    /// A team handle: mention-only.
    Team(String),
}

impl Identity {
    /// Parse a raw handle such as `@alice` or `@docs-team/editors`.
    ///
    /// Surrounding whitespace and every leading `@` are stripped before the
    /// handle is classified.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage::Identity;
    ///
    /// assert_eq!(Identity::parse("@alice"), Identity::Individual("alice".into()));
    /// assert_eq!(
    ///     Identity::parse("@docs-team/editors"),
    ///     Identity::Team("docs-team/editors".into())
    /// );
    /// ```
    pub fn parse(raw: &str) -> Self {
        let handle = strip_sigil(raw);
        if handle.contains(TEAM_SEPARATOR) {
            Identity::Team(handle.to_string())
        } else {
            Identity::Individual(handle.to_string())
        }
    }

    /// The bare handle, without sigil.
    pub fn handle(&self) -> &str {
        match self {
            Identity::Individual(handle) | Identity::Team(handle) => handle,
        }
    }

    /// Whether this identity can be set as an issue assignee.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Identity::Individual(_))
    }

    /// The `@handle` form used in comment text.
    pub fn mention(&self) -> String {
        format!("@{}", self.handle())
    }

    /// Compare against a raw handle, ignoring case and `@` sigils.
    pub fn matches_handle(&self, raw: &str) -> bool {
        let other = strip_sigil(raw);
        !other.is_empty() && self.handle().eq_ignore_ascii_case(other)
    }
}

impl From<String> for Identity {
    fn from(raw: String) -> Self {
        Identity::parse(&raw)
    }
}

impl From<&str> for Identity {
    fn from(raw: &str) -> Self {
        Identity::parse(raw)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.mention()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.handle())
    }
}

/// Strip surrounding whitespace and leading `@` sigils from a raw handle.
pub fn strip_sigil(raw: &str) -> &str {
    raw.trim().trim_start_matches('@')
}

/// Handles split by what the tracker can do with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Individual accounts, in input order.
    pub assignable: Vec<String>,
    /// Every handle, in input order.
    pub mentionable: Vec<String>,
}

/// Split identities into assignable accounts and mentionable handles.
///
/// Every identity is mentionable; only individuals are assignable. Input
/// order and duplicates are preserved.
///
/// # Examples
///
/// ```
/// use triage::{partition, Identity};
///
/// let people = [Identity::parse("@docs-team/editors"), Identity::parse("@bob")];
/// let split = partition(&people);
/// assert_eq!(split.assignable, vec!["bob"]);
/// assert_eq!(split.mentionable, vec!["docs-team/editors", "bob"]);
/// ```
pub fn partition(identities: &[Identity]) -> Partition {
    let mut split = Partition::default();
    for identity in identities {
        split.mentionable.push(identity.handle().to_string());
        if identity.is_assignable() {
            split.assignable.push(identity.handle().to_string());
        }
    }
    split
}

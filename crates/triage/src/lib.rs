//! Documentation Issue Triage Routing Engine
//!
//! Decides who owns a freshly opened documentation issue. The engine pulls
//! candidate content paths out of the issue text, resolves them against
//! glob routing rules, and splits the resulting handles into accounts that can
//! be assigned and handles that can only be mentioned.
//!
//! Everything here is pure: no network access and no process state, so the
//! whole decision can be exercised from unit tests.

pub mod config;
pub mod errors;
pub mod extract;
pub mod glob;
pub mod identity;
pub mod resolve;
pub mod routing;

#[cfg(test)]
mod routing_proptests;

// Re-export commonly used types
pub use config::{LabelColors, TriageConfig, DEFAULT_CONFIG_PATH};
pub use errors::ConfigError;
pub use extract::extract_paths;
pub use glob::GlobPattern;
pub use identity::{partition, Identity, Partition};
pub use resolve::{resolve, Resolution};
pub use routing::{match_route, RouteMatch, RoutingRule};

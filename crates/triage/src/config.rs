//! Triage configuration loading and parsing.
//!
//! The configuration lives in `.github/agent.yml` by default:
//!
//! ```yaml
//! content_developers: ["@alice", "@docs-team/editors"]
//! cd_managers: ["@carol"]
//! labels: { triage: "B36B00", overdue: "D93F0B" }
//! routes:
//!   - pattern: "docs/setup/**"
//!     content_developers: ["@bob"]
//!     cd_managers: ["@dana"]
//! ```
//!
//! Every key is optional. Missing or `null` keys fall back to defaults. The
//! configuration is loaded once per invocation and never mutated.

use crate::errors::ConfigError;
use crate::identity::Identity;
use crate::routing::RoutingRule;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Default configuration path, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = ".github/agent.yml";

/// Label applied to every new issue.
pub const TRIAGE_LABEL: &str = "triage";

/// Label cleared when a content developer responds.
pub const OVERDUE_LABEL: &str = "overdue";

/// Colors used when the configuration does not name one.
const DEFAULT_LABEL_COLORS: &[(&str, &str)] =
    &[(TRIAGE_LABEL, "B36B00"), (OVERDUE_LABEL, "D93F0B")];

/// Color for labels with neither a configured nor a built-in color.
const FALLBACK_LABEL_COLOR: &str = "EDEDED";

/// Root configuration structure loaded from `.github/agent.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Default content developers (optional).
    pub content_developers: Option<Vec<Identity>>,
    /// Default content developer managers (optional).
    pub cd_managers: Option<Vec<Identity>>,
    /// Label name to hex color (optional).
    pub labels: Option<LabelColors>,
    /// Ordered routing rules (optional).
    pub routes: Option<Vec<RoutingRule>>,
}

/// Label name to color mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelColors(BTreeMap<String, ColorValue>);

/// A color as written in YAML.
///
/// Unquoted all-digit colors such as `000000` are read by YAML as integers,
/// so both forms are accepted. Unquoted colors YAML reads as floats
/// (`123e45`) are rejected with a hint to quote them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColorValue {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColorVisitor;

        impl<'de> Visitor<'de> for ColorVisitor {
            type Value = ColorValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a hex color such as \"B36B00\"")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ColorValue, E> {
                Ok(ColorValue::Text(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ColorValue, E> {
                Ok(ColorValue::Number(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ColorValue, E> {
                u64::try_from(value)
                    .map(ColorValue::Number)
                    .map_err(|_| E::custom(format!("label color {} is not a hex color", value)))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<ColorValue, E> {
                Err(E::custom(format!(
                    "label color was read as the number {}; quote hex colors, e.g. \"123e45\"",
                    value
                )))
            }
        }

        deserializer.deserialize_any(ColorVisitor)
    }
}

impl ColorValue {
    /// Hex digits without `#`.
    fn to_hex(&self) -> String {
        match self {
            ColorValue::Text(text) => text.trim().trim_start_matches('#').to_string(),
            ColorValue::Number(number) => format!("{:06}", number),
        }
    }
}

impl LabelColors {
    /// Configured color for a label, without `#`.
    pub fn get(&self, name: &str) -> Option<String> {
        self.0.get(name).map(ColorValue::to_hex)
    }
}

impl TriageConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML for the
    /// schema, or contains invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse and validate configuration text. `path` is used for error messages.
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: TriageConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;

        Ok(config)
    }

    /// Default content developers with empty fallback.
    pub fn content_developers(&self) -> &[Identity] {
        self.content_developers.as_deref().unwrap_or_default()
    }

    /// Default managers with empty fallback.
    pub fn cd_managers(&self) -> &[Identity] {
        self.cd_managers.as_deref().unwrap_or_default()
    }

    /// Routing rules in configuration order.
    pub fn routes(&self) -> &[RoutingRule] {
        self.routes.as_deref().unwrap_or_default()
    }

    /// Hex color for a label (no `#`), with built-in defaults.
    pub fn label_color(&self, name: &str) -> String {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(name))
            .or_else(|| {
                DEFAULT_LABEL_COLORS
                    .iter()
                    .find(|(label, _)| *label == name)
                    .map(|(_, color)| color.to_string())
            })
            .unwrap_or_else(|| FALLBACK_LABEL_COLOR.to_string())
    }

    /// Whether a raw handle names one of the default content developers.
    pub fn is_content_developer(&self, handle: &str) -> bool {
        self.content_developers()
            .iter()
            .any(|developer| developer.matches_handle(handle))
    }

    fn validate(&self) -> Result<(), String> {
        check_handles("content_developers", self.content_developers())?;
        check_handles("cd_managers", self.cd_managers())?;

        for (index, route) in self.routes().iter().enumerate() {
            check_handles(
                &format!("routes[{}].content_developers", index),
                &route.content_developers,
            )?;
            check_handles(&format!("routes[{}].cd_managers", index), &route.cd_managers)?;
        }

        if let Some(labels) = &self.labels {
            for (name, color) in &labels.0 {
                let hex = color.to_hex();
                if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!(
                        "labels.{}: '{}' is not a 6-digit hex color",
                        name, hex
                    ));
                }
            }
        }

        Ok(())
    }
}

fn check_handles(field: &str, identities: &[Identity]) -> Result<(), String> {
    if identities.iter().any(|identity| identity.handle().is_empty()) {
        return Err(format!("{}: handles cannot be empty", field));
    }
    Ok(())
}

/// Deserialize a list where `null` means empty.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

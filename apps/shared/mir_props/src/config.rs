//! Mirror plugin configuration
//!
//! Loaded from JSON and validated against the generated schema before use
//! (see `mir_schema::Validatable`). The host embeds this as a section of its
//! own config file.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use mir_schema::Validatable;

/// What component-removed does to the mirrored property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Historical behavior: assign the invalid marker only when the property
    /// is *absent*, no-op when present. Removal and addition share the same
    /// absence guard; with invalid-clears semantics the whole branch is a
    /// net no-op on the bag. Kept as the default for drop-in compatibility.
    #[default]
    Legacy,
    /// Clear the property when it currently refers to the removed component
    /// instance; no-op otherwise.
    ClearPresent,
}

/// Configuration for [`PropertyMirror`](crate::PropertyMirror)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Property Mirror Config")]
#[serde(default)]
pub struct MirrorConfig {
    /// Removal behavior, see [`RemovalPolicy`]
    pub removal: RemovalPolicy,

    /// Extra type-name → property-name aliases, layered behind the
    /// built-in table. Entries for built-in keys are ignored.
    #[schemars(description = "Additional component type aliases")]
    pub extra_shorthands: HashMap<String, String>,
}

impl Validatable for MirrorConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MirrorConfig::from_json_str("{}").unwrap();
        assert_eq!(config.removal, RemovalPolicy::Legacy);
        assert!(config.extra_shorthands.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config = MirrorConfig::from_json_str(
            r#"{
                "removal": "clear_present",
                "extra_shorthands": { "EC_WaterPlane": "waterplane" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.removal, RemovalPolicy::ClearPresent);
        assert_eq!(
            config.extra_shorthands.get("EC_WaterPlane").map(String::as_str),
            Some("waterplane")
        );
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = MirrorConfig::from_json_str(r#"{ "removal": "sometimes" }"#).unwrap_err();
        assert!(matches!(err, mir_schema::SchemaError::ValidationError(_)));
    }

    #[test]
    fn test_schema_mentions_both_policies() {
        let schema = MirrorConfig::schema_json().unwrap();
        assert!(schema.contains("legacy"));
        assert!(schema.contains("clear_present"));
    }
}

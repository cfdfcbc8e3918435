use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mir_props::MirrorConfig;
use mir_schema::Validatable;

/// Host harness configuration (JSON)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Mirador Host Config")]
pub struct Config {
    /// Host name
    #[serde(default = "default_name")]
    #[schemars(description = "Human-readable host name shown at startup")]
    pub name: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[schemars(description = "Log level: trace, debug, info, warn, error")]
    #[schemars(regex(pattern = r"^(trace|debug|info|warn|error)$"))]
    pub log_level: String,

    /// Scenes created at startup, in order
    #[serde(default = "default_scenes")]
    #[schemars(description = "Scene names to create at startup")]
    pub scenes: Vec<String>,

    /// Property mirror plugin section
    #[serde(default)]
    #[schemars(description = "Configuration for the property mirror plugin")]
    pub mirror: MirrorConfig,
}

fn default_name() -> String {
    "Mirador Host".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scenes() -> Vec<String> {
    vec!["world".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            scenes: default_scenes(),
            mirror: MirrorConfig::default(),
        }
    }
}

impl Validatable for Config {}

#[cfg(test)]
mod tests {
    use super::*;
    use mir_props::RemovalPolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.name, "Mirador Host");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scenes, ["world"]);
        assert_eq!(config.mirror.removal, RemovalPolicy::Legacy);
    }

    #[test]
    fn test_valid_json() {
        let json = r#"{
            "name": "Dev Host",
            "log_level": "debug",
            "scenes": ["world", "lobby"],
            "mirror": { "removal": "clear_present" }
        }"#;

        let config = Config::from_json_str(json).unwrap();
        assert_eq!(config.name, "Dev Host");
        assert_eq!(config.scenes.len(), 2);
        assert_eq!(config.mirror.removal, RemovalPolicy::ClearPresent);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scenes, ["world"]);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let err = Config::from_json_str(r#"{ "log_level": "verbose" }"#).unwrap_err();
        assert!(matches!(err, mir_schema::SchemaError::ValidationError(_)));
    }
}

use serde::Deserialize;
use schemars::JsonSchema;
use std::fs;

pub mod error;

pub use error::{Result, SchemaError};

/// Trait for configuration types that can be validated against JSON Schema
///
/// Every config surface in Mirador (the mirror plugin section, the host
/// config file) goes through the same pipeline: parse the JSON, check it
/// against the schema generated from the Rust type, then deserialize into
/// the target type. Validation failures carry the schema error message so
/// a bad config names the offending field instead of panicking later.
pub trait Validatable: JsonSchema + for<'de> Deserialize<'de> {
    /// Load and validate from JSON file
    fn from_json_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| SchemaError::IoError(path.to_string(), e))?;

        Self::from_json_str(&content)
    }

    /// Load and validate from JSON string
    fn from_json_str(json: &str) -> Result<Self> {
        // First deserialize
        let value: serde_json::Value = serde_json::from_str(json).map_err(SchemaError::ParseError)?;

        Self::from_json_value(value)
    }

    /// Validate an already-parsed JSON value and deserialize it
    fn from_json_value(value: serde_json::Value) -> Result<Self> {
        // Validate against schema
        let schema = schemars::schema_for!(Self);
        let schema_json = serde_json::to_value(&schema).map_err(SchemaError::ParseError)?;

        let compiled = jsonschema::validator_for(&schema_json)
            .map_err(|e| SchemaError::ValidationError(e.to_string()))?;

        // Validate the JSON against the schema
        compiled
            .validate(&value)
            .map_err(|e| SchemaError::ValidationError(format!("{}", e)))?;

        // Finally deserialize to target type
        serde_json::from_value(value).map_err(SchemaError::ParseError)
    }

    /// Generate JSON Schema for this type
    fn generate_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Self)
    }

    /// Generate JSON Schema as JSON string
    fn schema_json() -> Result<String> {
        let schema = Self::generate_schema();
        serde_json::to_string_pretty(&schema).map_err(SchemaError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, JsonSchema)]
    struct Sample {
        name: String,
        #[serde(default)]
        retries: u32,
    }

    impl Validatable for Sample {}

    #[test]
    fn test_valid_json_passes_schema() {
        let sample = Sample::from_json_str(r#"{ "name": "demo", "retries": 3 }"#).unwrap();
        assert_eq!(sample.name, "demo");
        assert_eq!(sample.retries, 3);
    }

    #[test]
    fn test_defaults_apply_when_field_missing() {
        let sample = Sample::from_json_str(r#"{ "name": "demo" }"#).unwrap();
        assert_eq!(sample.retries, 0);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = Sample::from_json_str(r#"{ "name": "demo", "retries": "three" }"#).unwrap_err();
        assert!(matches!(err, SchemaError::ValidationError(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Sample::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SchemaError::ParseError(_)));
    }

    #[test]
    fn test_schema_json_generation() {
        let schema = Sample::schema_json().unwrap();
        assert!(schema.contains("\"name\""));
        assert!(schema.contains("\"retries\""));
    }
}

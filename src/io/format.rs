//! Container formats for saved state

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// On-disk encoding of a saved parameter bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl StateFormat {
    /// Pick a format from a file extension. Unknown extensions map to JSON.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => StateFormat::Yaml,
            _ => StateFormat::Json,
        }
    }

    /// Pick a format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map_or(StateFormat::Json, Self::from_extension)
    }

    /// Encode a state mapping.
    pub fn encode(self, mapping: &Map<String, Value>) -> Result<String> {
        match self {
            StateFormat::Json => serde_json::to_string_pretty(mapping).map_err(|e| {
                Error::Serialization {
                    message: format!("JSON serialization failed: {e}"),
                }
            }),
            StateFormat::Yaml => serde_yaml::to_string(mapping).map_err(|e| Error::Serialization {
                message: format!("YAML serialization failed: {e}"),
            }),
        }
    }

    /// Decode a state mapping. The top level must be a mapping.
    pub fn decode(self, content: &str) -> Result<Map<String, Value>> {
        let value: Value = match self {
            StateFormat::Json => serde_json::from_str(content)
                .map_err(|e| Error::deserialization(format!("JSON deserialization failed: {e}")))?,
            StateFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| Error::deserialization(format!("YAML deserialization failed: {e}")))?,
        };

        match value {
            Value::Object(mapping) => Ok(mapping),
            other => Err(Error::deserialization(format!(
                "expected a mapping of attribute names at the top level, found {}",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

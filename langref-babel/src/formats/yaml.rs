//! YAML data documents
//!
//! A YAML file is parsed straight into a JSON value. Mapping keys must be strings; anything
//! serde_yaml cannot represent as JSON is a parse error. An empty file is `null`.

use crate::error::FormatError;
use crate::format::Format;
use langref_core::DocumentBody;
use serde_json::Value;

pub struct YamlFormat;

impl Format for YamlFormat {
    fn name(&self) -> &str {
        "yaml"
    }

    fn description(&self) -> &str {
        "Structured data (metadata, tables of facts)"
    }

    fn extensions(&self) -> &[&str] {
        &["yml", "yaml"]
    }

    fn parse(&self, source: &str) -> Result<DocumentBody, FormatError> {
        parse_yaml_value(source)
            .map(DocumentBody::Data)
            .map_err(|e| FormatError::parse(self.name(), e))
    }
}

/// Parse YAML text into a JSON value. Shared with markdown front matter.
pub(crate) fn parse_yaml_value(source: &str) -> Result<Value, serde_yaml::Error> {
    if source.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(source)
}

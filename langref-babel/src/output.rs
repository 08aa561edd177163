//! Artifact JSON emission
//!
//! The build mode is the only knob on the output: compact for production builds, two-space
//! indentation for development builds. Object keys come out in a stable order, so the same
//! value always produces the same bytes.

use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMode {
    Development,
    #[default]
    Production,
}

impl BuildMode {
    /// Interpret an environment toggle. Only `development` (or `dev`) selects development mode;
    /// any other value is a production build.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => BuildMode::Development,
            _ => BuildMode::Production,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T, mode: BuildMode) -> Result<String, FormatError> {
    let json = match mode {
        BuildMode::Development => serde_json::to_string_pretty(value)?,
        BuildMode::Production => serde_json::to_string(value)?,
    };
    Ok(json)
}

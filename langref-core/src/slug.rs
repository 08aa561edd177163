//! Composite language identifiers
//!
//!     A slug is `root` or `root-variant`. Roots may not contain `-`, so a slug string always
//!     splits at its first `-`. A variant spelled the same as its root is the root document
//!     itself and is normalized away.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::LANGUAGES_DIR;

static ROOT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_.]*$").expect("root pattern is valid"));

static VARIANT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_.-]*$").expect("variant pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("invalid root language identifier '{0}'")]
    InvalidRoot(String),
    #[error("invalid variant identifier '{0}'")]
    InvalidVariant(String),
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug {
    root: String,
    variant: Option<String>,
}

impl Slug {
    pub fn new(root: impl Into<String>, variant: Option<String>) -> Result<Self, SlugError> {
        let root = root.into();
        if !ROOT_PATTERN.is_match(&root) {
            return Err(SlugError::InvalidRoot(root));
        }
        let variant = match variant {
            Some(v) if v == root => None,
            Some(v) if !VARIANT_PATTERN.is_match(&v) => return Err(SlugError::InvalidVariant(v)),
            other => other,
        };
        Ok(Self { root, variant })
    }

    /// Slug of a root language document (no variant).
    pub fn root(root: impl Into<String>) -> Result<Self, SlugError> {
        Self::new(root, None)
    }

    pub fn root_language(&self) -> &str {
        &self.root
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// The identifier listed for this slug under its root in the hierarchy index.
    pub fn variant_id(&self) -> &str {
        self.variant.as_deref().unwrap_or(&self.root)
    }

    pub fn is_root(&self) -> bool {
        self.variant.is_none()
    }

    /// Path of the compiled artifact, relative to the output root.
    pub fn artifact_path(&self) -> String {
        format!("{}/{}.json", LANGUAGES_DIR, self)
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}-{}", self.root, variant),
            None => f.write_str(&self.root),
        }
    }
}

impl FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some((root, variant)) => Slug::new(root, Some(variant.to_string())),
            None => Slug::root(s),
        }
    }
}

impl Serialize for Slug {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("rescript", "rescript", None)]
    #[case("rescript-v10", "rescript", Some("v10"))]
    #[case("python-3", "python", Some("3"))]
    #[case("python-3-beta", "python", Some("3-beta"))]
    fn parses_slug_strings(
        #[case] input: &str,
        #[case] root: &str,
        #[case] variant: Option<&str>,
    ) {
        let slug: Slug = input.parse().unwrap();
        assert_eq!(slug.root_language(), root);
        assert_eq!(slug.variant(), variant);
        assert_eq!(slug.to_string(), input);
    }

    #[rstest]
    #[case("")]
    #[case("Python")]
    #[case("-v1")]
    #[case("py thon")]
    fn rejects_bad_roots(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Slug>(),
            Err(SlugError::InvalidRoot(_))
        ));
    }

    #[test]
    fn rejects_empty_variant() {
        assert_eq!(
            "python-".parse::<Slug>(),
            Err(SlugError::InvalidVariant(String::new()))
        );
    }

    #[test]
    fn variant_equal_to_root_is_the_root_document() {
        let slug = Slug::new("rescript", Some("rescript".to_string())).unwrap();
        assert!(slug.is_root());
        assert_eq!(slug.to_string(), "rescript");
        assert_eq!(slug.variant_id(), "rescript");
    }

    #[test]
    fn artifact_path_uses_languages_dir() {
        let slug: Slug = "rescript-v10".parse().unwrap();
        assert_eq!(slug.artifact_path(), "languages/rescript-v10.json");
        assert_eq!(Slug::root("rescript").unwrap().artifact_path(), "languages/rescript.json");
    }

    #[test]
    fn serializes_as_string() {
        let slug: Slug = "python-2".parse().unwrap();
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"python-2\"");
        let back: Slug = serde_json::from_str("\"python-2\"").unwrap();
        assert_eq!(back, slug);
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(
            root in "[a-z0-9][a-z0-9_.]{0,8}",
            variant in proptest::option::of("[a-z0-9][a-z0-9_.-]{0,8}"),
        ) {
            let slug = Slug::new(root, variant).unwrap();
            let parsed: Slug = slug.to_string().parse().unwrap();
            prop_assert_eq!(parsed, slug);
        }
    }
}

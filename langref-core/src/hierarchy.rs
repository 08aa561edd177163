//! The hierarchy index
//!
//!     The index maps each root language to the ordered identifiers of its documents:
//!
//!         { "python": ["python", "2", "3"], "rescript": ["rescript"] }
//!
//!     A root's own document is listed under its own name and always comes first; the remaining
//!     variant ids follow in lexicographic order. Roots are ordered lexicographically too, so the
//!     index serializes identically no matter in which order documents were discovered.
//!
//!     Everything a client needs for navigation (root list, flattened slugs, slug lookup) is
//!     derived from the index by [HierarchyIndex::lookups], never stored separately.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::slug::{Slug, SlugError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("variant '{variant}' is listed twice under root '{root}'")]
    DuplicateVariant { root: String, variant: String },
    #[error(transparent)]
    Slug(#[from] SlugError),
}

/// Variant ids of one root language, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LanguageHierarchyEntry {
    variants: Vec<String>,
}

impl LanguageHierarchyEntry {
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    pub fn contains(&self, variant_id: &str) -> bool {
        self.variants.iter().any(|v| v == variant_id)
    }

    fn insert(&mut self, root: &str, variant_id: &str) -> bool {
        if self.contains(variant_id) {
            return false;
        }
        self.variants.push(variant_id.to_string());
        // root document first, the rest sorted
        self.variants
            .sort_by(|a, b| (a != root).cmp(&(b != root)).then_with(|| a.cmp(b)));
        true
    }
}

/// Decoding rebuilds the index through [HierarchyIndex::insert], so a listing that names a
/// variant twice or an invalid id is rejected rather than loaded as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>")]
pub struct HierarchyIndex {
    roots: BTreeMap<String, LanguageHierarchyEntry>,
}

impl Serialize for HierarchyIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.roots.serialize(serializer)
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for HierarchyIndex {
    type Error = HierarchyError;

    fn try_from(listing: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut index = Self::new();
        for (root, variant_ids) in listing {
            index.roots.entry(root.clone()).or_default();
            for variant_id in variant_ids {
                index.insert(&Slug::new(root.as_str(), Some(variant_id))?)?;
            }
        }
        Ok(index)
    }
}

impl HierarchyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a set of slugs. Fails on the first slug seen twice.
    pub fn from_slugs<'a, I>(slugs: I) -> Result<Self, HierarchyError>
    where
        I: IntoIterator<Item = &'a Slug>,
    {
        let mut index = Self::new();
        for slug in slugs {
            index.insert(slug)?;
        }
        Ok(index)
    }

    pub fn insert(&mut self, slug: &Slug) -> Result<(), HierarchyError> {
        let root = slug.root_language();
        let entry = self.roots.entry(root.to_string()).or_default();
        if entry.insert(root, slug.variant_id()) {
            Ok(())
        } else {
            Err(HierarchyError::DuplicateVariant {
                root: root.to_string(),
                variant: slug.variant_id().to_string(),
            })
        }
    }

    pub fn get(&self, root: &str) -> Option<&LanguageHierarchyEntry> {
        self.roots.get(root)
    }

    pub fn roots(&self) -> impl Iterator<Item = (&str, &LanguageHierarchyEntry)> {
        self.roots.iter().map(|(root, entry)| (root.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Every slug the index references, in index order.
    pub fn slugs(&self) -> Result<Vec<Slug>, HierarchyError> {
        let mut slugs = Vec::new();
        for (root, entry) in &self.roots {
            for variant in &entry.variants {
                slugs.push(Slug::new(root.as_str(), Some(variant.clone()))?);
            }
        }
        Ok(slugs)
    }

    pub fn contains(&self, slug: &Slug) -> bool {
        self.get(slug.root_language())
            .is_some_and(|entry| entry.contains(slug.variant_id()))
    }

    pub fn lookups(&self) -> Result<HierarchyLookups, HierarchyError> {
        let languages = self.slugs()?;
        let slug_lookup = languages
            .iter()
            .map(|slug| (slug.to_string(), slug.clone()))
            .collect();
        Ok(HierarchyLookups {
            root_languages: self.roots.keys().cloned().collect(),
            languages,
            slug_lookup,
        })
    }
}

/// Navigation tables derived from a [HierarchyIndex].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyLookups {
    pub root_languages: Vec<String>,
    /// All slugs, flattened across roots.
    pub languages: Vec<Slug>,
    pub slug_lookup: BTreeMap<String, Slug>,
}

impl HierarchyLookups {
    pub fn resolve(&self, slug: &str) -> Option<&Slug> {
        self.slug_lookup.get(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(s: &str) -> Slug {
        s.parse().unwrap()
    }

    #[test]
    fn lone_root_is_singleton_self() {
        let index = HierarchyIndex::from_slugs(&[slug("rescript")]).unwrap();
        assert_eq!(
            serde_json::to_string(&index).unwrap(),
            r#"{"rescript":["rescript"]}"#
        );
    }

    #[test]
    fn root_document_is_listed_first() {
        let slugs = [slug("python-3"), slug("python-2"), slug("python")];
        let index = HierarchyIndex::from_slugs(&slugs).unwrap();
        assert_eq!(
            index.get("python").unwrap().variants(),
            &["python", "2", "3"]
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let forward = [slug("c"), slug("python-3"), slug("python"), slug("c-c99")];
        let mut backward = forward.clone();
        backward.reverse();
        let a = HierarchyIndex::from_slugs(&forward).unwrap();
        let b = HierarchyIndex::from_slugs(&backward).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn duplicate_variant_is_rejected() {
        let result = HierarchyIndex::from_slugs(&[slug("rescript-v10"), slug("rescript-v10")]);
        assert_eq!(
            result,
            Err(HierarchyError::DuplicateVariant {
                root: "rescript".to_string(),
                variant: "v10".to_string(),
            })
        );
    }

    #[test]
    fn lookups_are_derived_from_the_index() {
        let index =
            HierarchyIndex::from_slugs(&[slug("rescript"), slug("rescript-v10"), slug("ocaml")])
                .unwrap();
        let lookups = index.lookups().unwrap();

        assert_eq!(lookups.root_languages, vec!["ocaml", "rescript"]);
        assert_eq!(
            lookups.languages,
            vec![slug("ocaml"), slug("rescript"), slug("rescript-v10")]
        );
        assert_eq!(lookups.resolve("rescript-v10"), Some(&slug("rescript-v10")));
        assert_eq!(lookups.resolve("v10"), None);
        for language in &lookups.languages {
            assert!(index.contains(language));
        }
    }

    #[test]
    fn deserializes_canonical_shape() {
        let index: HierarchyIndex =
            serde_json::from_str(r#"{"python":["python","3"],"rescript":["rescript"]}"#).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.contains(&slug("python-3")));
        assert!(index.contains(&slug("rescript")));
        assert!(!index.contains(&slug("rescript-v10")));
    }

    #[test]
    fn decoding_rejects_repeated_variant() {
        let err = serde_json::from_str::<HierarchyIndex>(r#"{"python":["3","3"]}"#).unwrap_err();
        assert!(err.to_string().contains("variant '3' is listed twice"), "{err}");
    }

    #[test]
    fn decoding_rejects_invalid_ids() {
        assert!(serde_json::from_str::<HierarchyIndex>(r#"{"Python":["Python"]}"#).is_err());
        assert!(serde_json::from_str::<HierarchyIndex>(r#"{"python":["-3"]}"#).is_err());
    }

    #[test]
    fn decoding_restores_canonical_order() {
        let index: HierarchyIndex =
            serde_json::from_str(r#"{"python":["3","python","2"]}"#).unwrap();
        assert_eq!(index.get("python").unwrap().variants(), &["python", "2", "3"]);
    }
}

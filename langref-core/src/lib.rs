//! Data model shared by the langref compiler and client
//!
//!     Content is organized by language: a root language (e.g. `python`) and, optionally, named
//!     variants of it (e.g. `python-3`). Every authored document is addressed by a [Slug], the
//!     compiler turns each into a [LanguageDocument], and the set of all slugs is summarized in a
//!     [HierarchyIndex] that clients use for navigation.
//!
//! File Layout
//!
//!     .
//!     ├── slug.rs         # Slug parsing, validation and artifact paths
//!     ├── document.rs     # Document bodies and the markup node tree
//!     ├── hierarchy.rs    # HierarchyIndex and its derived lookups
//!     └── lib.rs
//!
//!     This crate is pure data: no I/O, no logging. Reading and writing artifacts is the job of
//!     langref-compiler (build side) and langref-client (runtime side).

pub mod document;
pub mod hierarchy;
pub mod slug;

pub use document::{DocumentBody, LanguageDocument, Node};
pub use hierarchy::{HierarchyError, HierarchyIndex, HierarchyLookups, LanguageHierarchyEntry};
pub use slug::{Slug, SlugError};

/// File name of the canonical hierarchy index, relative to the output root.
pub const HIERARCHY_FILE: &str = "hierarchy.json";

/// File name of the legacy index alias, relative to the output root.
pub const LEGACY_HIERARCHY_FILE: &str = "languages.json";

/// Directory holding one compiled artifact per slug, relative to the output root.
pub const LANGUAGES_DIR: &str = "languages";

//! Content discovery
//!
//!     The content root holds one directory per root language; each file inside is one document:
//!
//!         yaml/lang/
//!         ├── rescript/
//!         │   ├── lang.yml        -> rescript
//!         │   └── v10.md          -> rescript-v10
//!         └── python/
//!             ├── lang.yml        -> python
//!             ├── 2.yml           -> python-2
//!             └── 3.yml           -> python-3
//!
//!     The root is the name of the file's parent directory. The file stem is the variant, except
//!     that `lang` (or the root's own name) marks the root document. Only files with an extension
//!     claimed by the format registry are considered; hidden files are skipped.

use ignore::WalkBuilder;
use langref_babel::FormatRegistry;
use langref_core::Slug;
use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};

/// Stem of the file holding a root language's own document.
pub const ROOT_DOCUMENT_STEM: &str = "lang";

/// An authored file and the slug it compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub slug: Slug,
}

/// Derive the slug of a document from its path.
pub fn slug_for_path(path: &Path) -> Result<Slug> {
    let root = path
        .parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .ok_or_else(|| CompileError::MissingRoot {
            path: path.to_path_buf(),
        })?;
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let variant = (stem != ROOT_DOCUMENT_STEM).then(|| stem.to_string());

    Slug::new(root, variant).map_err(|source| CompileError::InvalidName {
        path: path.to_path_buf(),
        source,
    })
}

/// Find every document under `content_root`, sorted by path.
pub fn discover(content_root: &Path, registry: &FormatRegistry) -> Result<Vec<SourceFile>> {
    if !content_root.is_dir() {
        return Err(CompileError::io(
            content_root,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "content root is not a directory",
            ),
        ));
    }

    let mut sources = Vec::new();
    let walker = WalkBuilder::new(content_root)
        .hidden(true)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    for entry in walker {
        let entry = entry.map_err(|source| CompileError::Walk {
            path: content_root.to_path_buf(),
            source,
        })?;
        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        let path = entry.path();
        if !is_file || !registry.handles(path) {
            continue;
        }
        if path.parent() == Some(content_root) {
            return Err(CompileError::MissingRoot {
                path: path.to_path_buf(),
            });
        }
        let slug = slug_for_path(path)?;
        tracing::debug!(path = %path.display(), %slug, "discovered document");
        sources.push(SourceFile {
            path: path.to_path_buf(),
            slug,
        });
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

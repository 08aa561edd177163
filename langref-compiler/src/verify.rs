//! Output verification
//!
//! Checks that a compiled output directory is consistent: every slug in `hierarchy.json` has an
//! artifact under `languages/`, and every artifact there is referenced by the index.

use langref_core::{HierarchyIndex, Slug, HIERARCHY_FILE, LANGUAGES_DIR};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CompileError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub checked: usize,
    /// Slugs listed in the index with no artifact on disk.
    pub missing: Vec<Slug>,
    /// Artifacts on disk that the index does not reference.
    pub orphans: Vec<PathBuf>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.orphans.is_empty()
    }
}

pub fn load_index(output_dir: &Path) -> Result<HierarchyIndex> {
    let path = output_dir.join(HIERARCHY_FILE);
    let raw = fs::read(&path).map_err(|e| CompileError::io(&path, e))?;
    serde_json::from_slice(&raw).map_err(|source| CompileError::Decode { path, source })
}

pub fn verify(output_dir: &Path) -> Result<VerifyReport> {
    let index = load_index(output_dir)?;
    let slugs = index.slugs().map_err(|source| CompileError::Index {
        path: output_dir.join(HIERARCHY_FILE),
        source,
    })?;

    let mut report = VerifyReport {
        checked: slugs.len(),
        ..VerifyReport::default()
    };

    let mut expected = BTreeSet::new();
    for slug in slugs {
        let artifact = output_dir.join(slug.artifact_path());
        if !artifact.is_file() {
            tracing::warn!(%slug, path = %artifact.display(), "artifact missing");
            report.missing.push(slug);
        }
        expected.insert(artifact);
    }

    let languages_dir = output_dir.join(LANGUAGES_DIR);
    if languages_dir.is_dir() {
        let entries = fs::read_dir(&languages_dir).map_err(|e| CompileError::io(&languages_dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| CompileError::io(&languages_dir, e))?.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if is_json && !expected.contains(&path) {
                tracing::warn!(path = %path.display(), "artifact not referenced by the index");
                report.orphans.push(path);
            }
        }
    }
    report.orphans.sort();

    Ok(report)
}

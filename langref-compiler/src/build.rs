//! The build pipeline
//!
//!     discover -> parse (parallel) -> index -> write
//!
//!     Parsing fans out over rayon; the first failure aborts the batch before a single byte is
//!     written, so the index can only ever reference documents that compiled. Writing is
//!     sequential and in slug order, which keeps progress output stable between runs.

use langref_babel::{to_json, BuildMode, FormatRegistry};
use langref_core::{
    HierarchyIndex, LanguageDocument, Slug, HIERARCHY_FILE, LANGUAGES_DIR, LEGACY_HIERARCHY_FILE,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::discover::{discover, SourceFile};
use crate::error::{CompileError, Result};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub content_root: PathBuf,
    pub output_dir: PathBuf,
    pub mode: BuildMode,
    /// Also write `languages.json` and `<slug>.json` at the output root.
    pub legacy_aliases: bool,
}

impl BuildOptions {
    pub fn new(content_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            output_dir: output_dir.into(),
            mode: BuildMode::default(),
            legacy_aliases: false,
        }
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_legacy_aliases(mut self, enabled: bool) -> Self {
        self.legacy_aliases = enabled;
        self
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub documents: Vec<Slug>,
    pub index: HierarchyIndex,
    pub written: Vec<PathBuf>,
}

pub struct Compiler {
    options: BuildOptions,
    registry: FormatRegistry,
}

impl Compiler {
    pub fn new(options: BuildOptions) -> Self {
        Self::with_registry(options, FormatRegistry::with_defaults())
    }

    pub fn with_registry(options: BuildOptions, registry: FormatRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Read and parse one authored file.
    pub fn compile_file(&self, source: &SourceFile) -> Result<LanguageDocument> {
        let path = &source.path;
        let text = fs::read_to_string(path).map_err(|e| CompileError::io(path, e))?;
        let format = self
            .registry
            .for_path(path)
            .map_err(|e| format_error(path, e))?;
        let body = format.parse(&text).map_err(|e| format_error(path, e))?;
        tracing::debug!(path = %path.display(), format = format.name(), "parsed document");
        Ok(LanguageDocument::new(source.slug.clone(), path, body))
    }

    pub fn run(&self) -> Result<BuildReport> {
        self.run_with_progress(|_| {})
    }

    /// Run the whole build, calling `on_progress` once per written document.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> Result<BuildReport>
    where
        F: FnMut(&LanguageDocument),
    {
        let span = tracing::info_span!(
            "build",
            content = %self.options.content_root.display(),
            out = %self.options.output_dir.display(),
            mode = %self.options.mode,
        );
        let _guard = span.enter();

        let sources = discover(&self.options.content_root, &self.registry)?;
        tracing::info!(count = sources.len(), "discovered documents");
        check_unique(&sources)?;

        let mut documents = sources
            .par_iter()
            .map(|source| self.compile_file(source))
            .collect::<Result<Vec<_>>>()?;
        documents.sort_by(|a, b| a.slug.cmp(&b.slug));

        let index = HierarchyIndex::from_slugs(documents.iter().map(|doc| &doc.slug)).map_err(
            |source| CompileError::Index {
                path: self.options.content_root.clone(),
                source,
            },
        )?;

        let written = self.write_outputs(&documents, &index, &mut on_progress)?;
        tracing::info!(
            documents = documents.len(),
            roots = index.len(),
            files = written.len(),
            "build finished"
        );

        Ok(BuildReport {
            documents: documents.into_iter().map(|doc| doc.slug).collect(),
            index,
            written,
        })
    }

    fn write_outputs<F>(
        &self,
        documents: &[LanguageDocument],
        index: &HierarchyIndex,
        on_progress: &mut F,
    ) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&LanguageDocument),
    {
        let out = &self.options.output_dir;
        let mode = self.options.mode;
        let languages_dir = out.join(LANGUAGES_DIR);
        fs::create_dir_all(&languages_dir).map_err(|e| CompileError::io(&languages_dir, e))?;

        let mut written = Vec::new();
        for doc in documents {
            let json = to_json(&doc.body, mode).map_err(|e| format_error(&doc.source, e))?;
            let target = out.join(doc.slug.artifact_path());
            write_file(&target, &json)?;
            written.push(target);

            if self.options.legacy_aliases {
                let alias = out.join(format!("{}.json", doc.slug));
                write_file(&alias, &json)?;
                written.push(alias);
            }
            on_progress(doc);
        }

        let index_json = to_json(index, mode).map_err(|e| format_error(out, e))?;
        let index_path = out.join(HIERARCHY_FILE);
        write_file(&index_path, &index_json)?;
        written.push(index_path);

        if self.options.legacy_aliases {
            let legacy = out.join(LEGACY_HIERARCHY_FILE);
            write_file(&legacy, &index_json)?;
            written.push(legacy);
        }

        Ok(written)
    }
}

fn check_unique(sources: &[SourceFile]) -> Result<()> {
    let mut seen: BTreeMap<&Slug, &Path> = BTreeMap::new();
    for source in sources {
        if let Some(first) = seen.insert(&source.slug, &source.path) {
            return Err(CompileError::DuplicateSlug {
                slug: source.slug.clone(),
                first: first.to_path_buf(),
                second: source.path.clone(),
            });
        }
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    tracing::trace!(path = %path.display(), bytes = contents.len(), "writing artifact");
    fs::write(path, contents).map_err(|e| CompileError::io(path, e))
}

fn format_error(path: &Path, source: langref_babel::FormatError) -> CompileError {
    CompileError::Format {
        path: path.to_path_buf(),
        source,
    }
}

use langref_babel::FormatError;
use langref_core::{HierarchyError, Slug, SlugError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a build or a verification run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("{}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("{}: {source}", .path.display())]
    InvalidName {
        path: PathBuf,
        #[source]
        source: SlugError,
    },

    #[error("{}: no root language directory above this file", .path.display())]
    MissingRoot { path: PathBuf },

    #[error("slug '{slug}' is defined by both {} and {}", .first.display(), .second.display())]
    DuplicateSlug {
        slug: Slug,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("{}: {source}", .path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: HierarchyError,
    },

    #[error("{}: invalid artifact JSON: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CompileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CompileError::Io {
            path: path.into(),
            source,
        }
    }

    /// The file the error is about, when there is exactly one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            CompileError::Io { path, .. }
            | CompileError::Walk { path, .. }
            | CompileError::Format { path, .. }
            | CompileError::InvalidName { path, .. }
            | CompileError::MissingRoot { path }
            | CompileError::Index { path, .. }
            | CompileError::Decode { path, .. } => Some(path),
            CompileError::DuplicateSlug { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;

//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for all available formats.
//! Formats can be registered and retrieved by name or by file extension.

use crate::error::FormatError;
use crate::format::Format;
use langref_core::DocumentBody;
use std::collections::HashMap;
use std::path::Path;

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
///
/// let format = registry.for_path(Path::new("yaml/lang/rescript/lang.yml"))?;
/// let body = format.parse("name: ReScript")?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Find the format claiming a file extension (case-insensitive)
    pub fn for_extension(&self, extension: &str) -> Result<&dyn Format, FormatError> {
        let extension = extension.to_ascii_lowercase();
        let mut names = self.list_formats();
        names.retain(|name| {
            self.formats[name]
                .extensions()
                .iter()
                .any(|ext| *ext == extension)
        });
        match names.first() {
            Some(name) => self.get(name),
            None => Err(FormatError::UnknownExtension(extension)),
        }
    }

    /// Find the format for a path by its extension
    pub fn for_path(&self, path: &Path) -> Result<&dyn Format, FormatError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        self.for_extension(extension)
    }

    /// Whether any registered format claims the path's extension
    pub fn handles(&self, path: &Path) -> bool {
        self.for_path(path).is_ok()
    }

    /// Parse source text using the specified format
    pub fn parse(&self, source: &str, format: &str) -> Result<DocumentBody, FormatError> {
        self.get(format)?.parse(source)
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(crate::formats::YamlFormat);
        registry.register(crate::formats::MarkdownFormat);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

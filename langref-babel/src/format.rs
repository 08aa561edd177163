//! Format trait definition
//!
//! This module defines the core Format trait that all input formats implement.

use crate::error::FormatError;
use langref_core::DocumentBody;

/// Trait for document formats
///
/// Implementors turn source text into a [DocumentBody]. A format claims one or more file
/// extensions (without the leading dot); the registry uses them to pick a format for a path.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn extensions(&self) -> &[&str] {
///         &["my"]
///     }
///
///     fn parse(&self, source: &str) -> Result<DocumentBody, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "yaml", "markdown")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions handled by this format, lowercase, without the dot
    fn extensions(&self) -> &[&str];

    /// Parse source text into a document body
    fn parse(&self, source: &str) -> Result<DocumentBody, FormatError>;
}

//! Input formats for langref documents
//!
//!     This crate turns authored source text into [DocumentBody] values and turns compiled values
//!     into artifact JSON.
//!
//! Architecture
//!
//!     - Format trait: uniform interface for every input format (name, extensions, parse)
//!     - FormatRegistry: lookup by name or by file extension
//!     - Format implementations: YAML (plain data) and Markdown (markup tree)
//!     - output: JSON emission, compact or indented depending on the [BuildMode]
//!
//!     This is a pure lib: it powers langref-compiler but assumes nothing about the shell, no
//!     printing, no env vars, no filesystem access.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── output.rs               # BuildMode and JSON emission
//!     ├── formats
//!     │   ├── markdown
//!     │   │   ├── parser.rs       # comrak AST -> Node tree
//!     │   │   └── mod.rs
//!     │   ├── yaml.rs
//!     │   └── mod.rs
//!     └── lib.rs
//!
//! Implementation Principles
//!
//!     We lean on specialized crates for each format (serde_yaml, comrak) and only write the
//!     adapter from their representation to ours.
//!
//! [DocumentBody]: langref_core::DocumentBody

pub mod error;
pub mod format;
pub mod formats;
pub mod output;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use output::{to_json, BuildMode};
pub use registry::FormatRegistry;

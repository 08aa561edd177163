//! Content compiler for langref
//!
//!     Walks a content tree of authored YAML and Markdown files, parses each into a document body,
//!     and writes one JSON artifact per document plus the aggregate hierarchy index:
//!
//!         <out>/hierarchy.json
//!         <out>/languages/<slug>.json
//!
//!     The build is fail-fast: any read, parse or naming error aborts the batch, and nothing is
//!     written unless every file compiled. Re-running is always safe; outputs are overwritten
//!     unconditionally.
//!
//!     The library is shell agnostic. Progress is reported through a callback and diagnostics
//!     through `tracing`; printing is left to langref-cli.

pub mod build;
pub mod discover;
pub mod error;
pub mod verify;

pub use build::{BuildOptions, BuildReport, Compiler};
pub use discover::{discover, slug_for_path, SourceFile};
pub use error::CompileError;
pub use verify::{load_index, verify, VerifyReport};

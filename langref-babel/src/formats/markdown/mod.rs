//! Markdown format implementation
//!
//! Data Model:
//!
//!     Markdown documents become an mdast-style tree of [Node]s:
//!     | Markdown        | Node                | Notes                                      |
//!     | Heading         | heading             | depth is the heading level                 |
//!     | Fenced code     | code                | info string split into lang and meta       |
//!     | List / item     | list / listItem     | spread is the inverse of comrak's "tight"  |
//!     | Task list item  | listItem            | checked is true for `[x]`, false for `[ ]` |
//!     | Image           | image               | alt is the flattened text of the label     |
//!     | Soft break      | text                | merged into the surrounding text run       |
//!     | Front matter    | root.frontmatter    | `---` delimited YAML, parsed to JSON       |
//!
//!     Markdown itself never fails to parse; only malformed front matter is an error.
//!
//! Library
//!
//!     We use the comrak crate for parsing: a single, feature-rich, well maintained CommonMark +
//!     GFM implementation.
//!
//! [Node]: langref_core::Node

mod parser;

use crate::error::FormatError;
use crate::format::Format;
use langref_core::DocumentBody;

pub use parser::parse_markdown;

pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "CommonMark with GFM tables, task lists, strikethrough and autolinks"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn parse(&self, source: &str) -> Result<DocumentBody, FormatError> {
        parse_markdown(source).map(DocumentBody::Markup)
    }
}

//! Format implementations
//!
//! This module contains all input formats that produce langref document bodies.

pub mod markdown;
pub mod yaml;

pub use markdown::MarkdownFormat;
pub use yaml::YamlFormat;

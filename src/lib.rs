//! # langref
//!
//! Compiler and client cache for a language-hierarchy reference site.
//!
//! The workspace is split by concern; this crate re-exports each member under a short name so
//! applications can depend on one package:
//!
//! - [model]: slugs, document bodies and the hierarchy index
//! - [babel]: input formats and JSON emission
//! - [config]: layered configuration
//! - [compiler]: content tree to artifacts
//! - [client]: fetch-and-cache over compiled artifacts, with notifications

pub use langref_babel as babel;
pub use langref_client as client;
pub use langref_compiler as compiler;
pub use langref_config as config;
pub use langref_core as model;

//! Foundational types for cross-document reference resolution.
//!
//! This crate defines the pieces the resolution engine is built from:
//!
//! - [`SchemaDocument`] — a parsed API description, represented as a
//!   [`serde_json::Value`] tree of mappings, sequences, and scalars.
//! - [`DocumentPool`] — the read-only set of already-loaded candidate
//!   target documents, keyed by absolute identifier.
//! - [`Pointer`] — an RFC-6901 JSON pointer with escaped/unescaped segment
//!   access, a parent pointer, and the path-item-table addressing rule.
//! - [`Reference`] — the parsed form of a `$ref` marker value,
//!   distinguishing local from remote targets.
//! - [`lookup`] — pointer navigation over a document.
//!
//! # Example
//!
//! ```
//! use openapi_resolver_core::{Pointer, Reference, lookup};
//! use serde_json::json;
//!
//! let document = json!({
//!     "components": { "schemas": { "Pet": { "type": "object" } } }
//! });
//!
//! let reference = Reference::parse("common.yaml#/components/schemas/Pet", "openapi.yaml").unwrap();
//! assert!(!reference.is_local());
//! assert_eq!(reference.target_document(), "common.yaml");
//! assert_eq!(lookup(&document, reference.pointer()), Some(&json!({ "type": "object" })));
//! ```

mod document;
mod pointer;
mod reference;

pub use document::{DocumentPool, PATHS_KEY, SchemaDocument, lookup};
pub use pointer::{Pointer, PointerError, escape, unescape};
pub use reference::{Reference, ReferenceError};

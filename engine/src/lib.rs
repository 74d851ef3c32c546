//! Cross-document reference resolution for parsed API descriptions.
//!
//! Given a root document and a pool of other already-loaded documents it
//! may reference, [`SchemaResolver`] produces a single self-contained
//! document: every remote reference is copied into a local components
//! namespace and rewritten to a same-document pointer, while references
//! already internal to the root are left untouched. Failures never abort:
//! each one becomes a diagnostic in an ordered list and the rest of the
//! document is still processed.
//!
//! The engine is built from three pieces:
//!
//! - [`walk`] — a lazy visitor yielding every reference occurrence in a
//!   document subtree as a [`RefSite`].
//! - [`ComponentsNamespace`] — the local area remote content is relocated
//!   into, mirroring original pointer paths.
//! - [`SchemaResolver`] — the orchestration: classify, import, rewrite,
//!   and finally merge the namespace into the root.
//!
//! Loading documents, parsing text, and consuming the merged document are
//! all the surrounding tool's business; this crate only transforms
//! in-memory trees.
//!
//! # Example
//!
//! A root document that pulls a whole path item out of a shared document:
//! the path item is spliced in wholesale, and the schema it references in
//! turn is relocated into the root's components namespace.
//!
//! ```
//! use std::collections::HashMap;
//! use openapi_resolver_engine::SchemaResolver;
//! use serde_json::json;
//!
//! let root = json!({
//!     "paths": { "/pets": { "$ref": "common.yaml#/paths/~1pets" } }
//! });
//! let mut pool = HashMap::new();
//! pool.insert(
//!     "common.yaml".to_string(),
//!     json!({
//!         "paths": {
//!             "/pets": {
//!                 "get": {
//!                     "responses": {
//!                         "200": { "schema": { "$ref": "#/components/schemas/Pet" } }
//!                     }
//!                 }
//!             }
//!         },
//!         "components": { "schemas": { "Pet": { "type": "object" } } },
//!     }),
//! );
//!
//! let resolved = SchemaResolver::new(root, &pool, Vec::new(), "openapi.yaml").resolve();
//! assert!(resolved.errors().is_empty());
//!
//! // the path item was copied in place of the marker
//! assert_eq!(
//!     resolved.schema()["paths"]["/pets"]["get"]["responses"]["200"]["schema"],
//!     json!({ "$ref": "#/components/schemas/Pet" })
//! );
//! // and the schema it references now lives in the root's own namespace
//! assert_eq!(
//!     resolved.schema()["components"]["schemas"]["Pet"],
//!     json!({ "type": "object" })
//! );
//! ```

mod error;
mod namespace;
mod resolver;
mod walker;

pub use error::ResolveError;
pub use namespace::{ComponentsNamespace, InsertOutcome};
pub use resolver::{ResolvedSchema, SchemaResolver};
pub use walker::{PathSegment, REF_KEY, RefSite, RefSites, locate_mut, walk};

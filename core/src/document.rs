//! Document tree model and pointer navigation.
//!
//! A parsed API description is an arbitrary tree of mapping nodes, sequence
//! nodes, and scalar leaves. That is exactly the shape of
//! [`serde_json::Value`], so that is the document representation:
//! `Value::Object` is the mapping node,
//! `Value::Array` the sequence node, and the remaining variants are scalar
//! leaves. Navigation by [`Pointer`] lives here as well, including the one
//! place where plain RFC-6901 segmenting does not apply: entries of the
//! path-item table are keyed by URL paths that contain literal `/`
//! characters.

use std::collections::HashMap;

use serde_json::Value;

use crate::pointer::Pointer;

/// A parsed API description document.
pub type SchemaDocument = Value;

/// Already-loaded candidate target documents, keyed by absolute identifier
/// (path or URI). Read-only during resolution.
pub type DocumentPool = HashMap<String, SchemaDocument>;

/// Key of the table whose entry names are URL paths.
pub const PATHS_KEY: &str = "paths";

/// Navigates `document` by `pointer`.
///
/// Pointers into the path-item table resolve as the table name plus one
/// literal entry key (see [`Pointer::path_item_key`]); every other pointer
/// follows plain RFC-6901 navigation. A path that does not lead to a value
/// yields `None`, never an error.
///
/// # Examples
///
/// ```
/// use openapi_resolver_core::{Pointer, lookup};
/// use serde_json::json;
///
/// let document = json!({
///     "paths": { "/pets/{petId}": { "get": {} } },
///     "components": { "schemas": { "Pet": { "type": "object" } } },
/// });
///
/// let pointer = Pointer::new("/components/schemas/Pet").unwrap();
/// assert_eq!(lookup(&document, &pointer), Some(&json!({ "type": "object" })));
///
/// let pointer = Pointer::new("/paths/~1pets~1{petId}").unwrap();
/// assert_eq!(lookup(&document, &pointer), Some(&json!({ "get": {} })));
/// ```
pub fn lookup<'a>(document: &'a SchemaDocument, pointer: &Pointer) -> Option<&'a SchemaDocument> {
    match pointer.path_item_key() {
        Some(key) => document.get(PATHS_KEY)?.get(key.as_str()),
        None => document.pointer(pointer.value()),
    }
}

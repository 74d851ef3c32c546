//! RFC-6901 JSON pointers.
//!
//! A [`Pointer`] addresses a node within a document tree as a `/`-delimited
//! path with `~0`/`~1` escaping. Pointers into the path-item table carry one
//! extra rule: entry names there are URL paths containing literal `/`
//! characters, so everything after the table name is a single key rather
//! than further segments (see [`Pointer::path_item_key`]).

use std::fmt;

use thiserror::Error;

use crate::document::PATHS_KEY;

/// Pointer construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointerError {
    /// A non-empty pointer must start with `/`.
    #[error("json pointer must be empty or start with '/': {0}")]
    MissingLeadingSlash(String),
}

/// A JSON pointer into a schema document.
///
/// The empty pointer addresses the whole document.
///
/// # Examples
///
/// ```
/// use openapi_resolver_core::Pointer;
///
/// let pointer = Pointer::new("/components/schemas/Pet").unwrap();
/// assert_eq!(pointer.tokens(), vec!["components", "schemas", "Pet"]);
/// assert_eq!(pointer.parent().unwrap().value(), "/components/schemas");
///
/// // `~1` escapes a literal `/` inside a segment
/// let pointer = Pointer::new("/paths/~1pets~1{petId}").unwrap();
/// assert_eq!(pointer.path_item_key().as_deref(), Some("/pets/{petId}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pointer {
    value: String,
}

impl Pointer {
    /// Creates a pointer from its escaped string form.
    pub fn new(value: impl Into<String>) -> Result<Self, PointerError> {
        let value = value.into();
        if !value.is_empty() && !value.starts_with('/') {
            return Err(PointerError::MissingLeadingSlash(value));
        }
        Ok(Self { value })
    }

    /// The escaped full path string.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` for the empty pointer, which addresses the whole document.
    pub fn is_root(&self) -> bool {
        self.value.is_empty()
    }

    /// Unescaped path segments, in order. The root pointer has none.
    pub fn tokens(&self) -> Vec<String> {
        self.value.split('/').skip(1).map(unescape).collect()
    }

    /// Path with the last segment removed, or `None` for the root pointer.
    pub fn parent(&self) -> Option<Pointer> {
        if self.value.is_empty() {
            return None;
        }
        let cut = self.value.rfind('/')?;
        Some(Pointer {
            value: self.value[..cut].to_string(),
        })
    }

    /// Unescaped name of the last segment, or `None` for the root pointer.
    pub fn last_token(&self) -> Option<String> {
        self.tokens().pop()
    }

    /// The literal entry key when this pointer addresses an entry of the
    /// path-item table.
    ///
    /// Entry names in that table are URL paths, so the remainder after the
    /// table name joins back into one key instead of splitting into further
    /// segments: `/paths/~1pets~1{petId}` addresses the `/pets/{petId}`
    /// entry. Pointers elsewhere, and the bare `/paths` pointer, yield
    /// `None`.
    pub fn path_item_key(&self) -> Option<String> {
        let tokens = self.tokens();
        let (first, rest) = tokens.split_first()?;
        if first != PATHS_KEY || rest.is_empty() {
            return None;
        }
        Some(rest.join("/"))
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Decodes one escaped pointer segment (`~1` → `/`, then `~0` → `~`).
pub fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Encodes one literal segment name for use inside a pointer.
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

//! Reference marker parsing.
//!
//! A reference marker value has the grammar
//! `[<document-path-or-empty>]'#'<json-pointer>`: an optional document part
//! before the fragment separator and a JSON pointer after it. The document
//! part is resolved against the path of the document the reference appears
//! in, which is what distinguishes a local reference (targets that same
//! document) from a remote one (targets another document in the pool).

use thiserror::Error;

use crate::pointer::{Pointer, PointerError};

/// Reference parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The marker value has no `#` fragment separator.
    #[error("reference is missing a '#' fragment separator: {0}")]
    MissingSeparator(String),
    /// The fragment is not a well-formed JSON pointer.
    #[error(transparent)]
    Pointer(#[from] PointerError),
}

/// Parsed form of a reference marker value.
///
/// # Examples
///
/// ```
/// use openapi_resolver_core::Reference;
///
/// let local = Reference::parse("#/components/schemas/Pet", "openapi.yaml").unwrap();
/// assert!(local.is_local());
/// assert_eq!(local.target_document(), "openapi.yaml");
///
/// let remote = Reference::parse("shared/common.yaml#/components/schemas/Pet", "specs/openapi.yaml").unwrap();
/// assert!(!remote.is_local());
/// assert_eq!(remote.target_document(), "specs/shared/common.yaml");
/// assert_eq!(remote.pointer().value(), "/components/schemas/Pet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    raw: String,
    target_document: String,
    pointer: Pointer,
    local: bool,
}

impl Reference {
    /// Parses a marker value found in the document at `context_document`.
    pub fn parse(raw: &str, context_document: &str) -> Result<Self, ReferenceError> {
        let (document, fragment) = raw
            .split_once('#')
            .ok_or_else(|| ReferenceError::MissingSeparator(raw.to_string()))?;
        let pointer = Pointer::new(fragment)?;

        let target_document = if document.is_empty() {
            context_document.to_string()
        } else {
            resolve_against(document, context_document)
        };
        let local = document.is_empty() || target_document == context_document;

        Ok(Self {
            raw: raw.to_string(),
            target_document,
            pointer,
            local,
        })
    }

    /// The marker value exactly as it appeared in the document.
    pub fn value(&self) -> &str {
        &self.raw
    }

    /// Absolute identifier of the document this reference targets.
    pub fn target_document(&self) -> &str {
        &self.target_document
    }

    /// The pointer into the target document.
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// `true` when the target is the document the reference appears in.
    pub fn is_local(&self) -> bool {
        self.local
    }
}

/// Resolves a possibly-relative document path against the path of the
/// document the reference appears in.
fn resolve_against(path: &str, context: &str) -> String {
    if path.contains("://") || path.starts_with('/') {
        return normalize(path);
    }
    let base = context.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    if base.is_empty() {
        normalize(path)
    } else {
        normalize(&format!("{base}/{path}"))
    }
}

/// Collapses `.` and `..` segments without touching a scheme/authority
/// prefix. A `..` that would climb above a relative base is kept literally.
fn normalize(path: &str) -> String {
    let (prefix, rest) = split_scheme(path);
    let absolute = rest.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&"..") => segments.push(".."),
                Some(_) => {
                    segments.pop();
                }
                None => {
                    if !absolute {
                        segments.push("..");
                    }
                }
            },
            other => segments.push(other),
        }
    }

    let separator = if absolute { "/" } else { "" };
    format!("{prefix}{separator}{}", segments.join("/"))
}

/// Splits `scheme://authority` off the front of a URI, if present.
fn split_scheme(path: &str) -> (&str, &str) {
    let Some(index) = path.find("://") else {
        return ("", path);
    };
    let after_scheme = index + "://".len();
    match path[after_scheme..].find('/') {
        Some(slash) => path.split_at(after_scheme + slash),
        None => (path, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_only_reference_is_local() {
        let reference = Reference::parse("#/components/schemas/Pet", "openapi.yaml").unwrap();
        assert!(reference.is_local());
        assert_eq!(reference.target_document(), "openapi.yaml");
        assert_eq!(reference.pointer().value(), "/components/schemas/Pet");
        assert_eq!(reference.value(), "#/components/schemas/Pet");
    }

    #[test]
    fn test_explicit_self_reference_is_local() {
        let reference = Reference::parse("openapi.yaml#/components/schemas/Pet", "openapi.yaml")
            .unwrap();
        assert!(reference.is_local());
        assert_eq!(reference.target_document(), "openapi.yaml");
    }

    #[test]
    fn test_sibling_document_reference_is_remote() {
        let reference = Reference::parse("common.yaml#/components/schemas/Pet", "openapi.yaml")
            .unwrap();
        assert!(!reference.is_local());
        assert_eq!(reference.target_document(), "common.yaml");
    }

    #[test]
    fn test_relative_path_resolves_against_context_directory() {
        let reference =
            Reference::parse("shared/common.yaml#/x", "specs/openapi.yaml").unwrap();
        assert_eq!(reference.target_document(), "specs/shared/common.yaml");

        let reference = Reference::parse("../common.yaml#/x", "specs/openapi.yaml").unwrap();
        assert_eq!(reference.target_document(), "common.yaml");
    }

    #[test]
    fn test_absolute_path_is_taken_as_is() {
        let reference =
            Reference::parse("/srv/specs/common.yaml#/x", "specs/openapi.yaml").unwrap();
        assert_eq!(reference.target_document(), "/srv/specs/common.yaml");
    }

    #[test]
    fn test_url_references_keep_scheme_and_authority() {
        let reference = Reference::parse(
            "https://example.com/specs/common.yaml#/x",
            "openapi.yaml",
        )
        .unwrap();
        assert_eq!(
            reference.target_document(),
            "https://example.com/specs/common.yaml"
        );

        let reference = Reference::parse(
            "pets/common.yaml#/x",
            "https://example.com/specs/openapi.yaml",
        )
        .unwrap();
        assert_eq!(
            reference.target_document(),
            "https://example.com/specs/pets/common.yaml"
        );
    }

    #[test]
    fn test_empty_fragment_addresses_whole_document() {
        let reference = Reference::parse("common.yaml#", "openapi.yaml").unwrap();
        assert!(reference.pointer().is_root());
        assert!(!reference.is_local());
    }

    #[test]
    fn test_missing_separator_is_an_error() {
        assert_eq!(
            Reference::parse("common.yaml", "openapi.yaml"),
            Err(ReferenceError::MissingSeparator("common.yaml".to_string()))
        );
    }

    #[test]
    fn test_malformed_fragment_is_an_error() {
        let parsed = Reference::parse("common.yaml#components/schemas", "openapi.yaml");
        assert!(matches!(parsed, Err(ReferenceError::Pointer(_))));
    }
}

//! Resolution diagnostics.
//!
//! Every failure mode during resolution is non-fatal: diagnostics are
//! appended to an ordered list and traversal of the rest of the document
//! continues. The reference node that produced a diagnostic is left exactly
//! as it appeared in the input.

use thiserror::Error;

/// A diagnostic recorded while resolving references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A diagnostic handed in by the caller before resolution started.
    /// Displayed verbatim.
    #[error("{0}")]
    Upstream(String),

    /// A reference marker value that does not parse.
    #[error("invalid reference {value}: {reason}")]
    InvalidReference {
        /// The marker value as found in the document.
        value: String,
        /// Why it did not parse.
        reason: String,
    },

    /// The reference's target document is not in the documents pool.
    #[error("failed to resolve remote reference: {0}")]
    UnresolvedDocument(String),

    /// The target document exists but the pointer does not resolve to a
    /// value inside it.
    #[error("failed to read remote value {pointer} in {document}")]
    UnresolvedPointer {
        /// The pointer that failed to resolve.
        pointer: String,
        /// The document it was resolved against.
        document: String,
    },

    /// A remote path item resolved to something other than a mapping, so
    /// its keys cannot be spliced into the owning node.
    #[error("remote path item {pointer} in {document} is not a mapping")]
    InvalidPathItem {
        /// The pointer to the offending value.
        pointer: String,
        /// The document it was read from.
        document: String,
    },

    /// Two distinct components claimed the same namespace path. The first
    /// body stored there wins; the second is discarded.
    #[error("conflicting component definitions at {path}, keeping the first")]
    NamingCollision {
        /// The contested namespace path.
        path: String,
    },
}

//! Resolution orchestration.
//!
//! [`SchemaResolver`] drives the walker over the root document, classifies
//! each occurrence with [`Reference::parse`], pulls remote content into the
//! [`ComponentsNamespace`], and rewrites markers to same-document pointers.
//! Resolution is one synchronous call over in-memory documents: the pool is
//! never written, the root and the namespace are mutated in place, and the
//! namespace is merged into the root exactly once at the end.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, warn};

use openapi_resolver_core::{
    DocumentPool, PATHS_KEY, Pointer, Reference, SchemaDocument, lookup,
};

use crate::error::ResolveError;
use crate::namespace::{ComponentsNamespace, InsertOutcome};
use crate::walker::{PathSegment, REF_KEY, RefSite, locate_mut, walk};

/// Mutable resolution state, threaded explicitly through every recursive
/// call so no pass depends on hidden instance-field mutation.
struct ResolutionContext {
    namespace: ComponentsNamespace,
    errors: Vec<ResolveError>,
    /// `(document, pointer)` pairs already imported or currently being
    /// imported. Guarantees termination on circular cross-document
    /// references.
    visited: HashSet<(String, String)>,
    /// Root-relative locations of path-table occurrences that already
    /// produced a diagnostic; the materialization pass leaves them alone.
    failed_sites: HashSet<Vec<PathSegment>>,
}

impl ResolutionContext {
    fn new() -> Self {
        Self {
            namespace: ComponentsNamespace::new(),
            errors: Vec::new(),
            visited: HashSet::new(),
            failed_sites: HashSet::new(),
        }
    }
}

/// Resolves every cross-document reference in a root document against a
/// pool of already-loaded documents.
///
/// Remote content is copied into a components namespace mirroring its
/// original pointer paths, markers are rewritten to same-document pointers,
/// and every failure is collected as a diagnostic instead of aborting.
/// References that are already local to the root are left untouched.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use openapi_resolver_engine::SchemaResolver;
/// use serde_json::json;
///
/// let root = json!({
///     "components": {
///         "responses": {
///             "PetOk": { "schema": { "$ref": "common.yaml#/components/schemas/Pet" } }
///         }
///     }
/// });
/// let mut pool = HashMap::new();
/// pool.insert(
///     "common.yaml".to_string(),
///     json!({ "components": { "schemas": { "Pet": { "type": "object" } } } }),
/// );
///
/// let resolved = SchemaResolver::new(root, &pool, Vec::new(), "openapi.yaml").resolve();
/// assert!(!resolved.has_errors());
/// assert_eq!(
///     resolved.schema()["components"]["schemas"]["Pet"],
///     json!({ "type": "object" })
/// );
/// assert_eq!(
///     resolved.schema()["components"]["responses"]["PetOk"]["schema"]["$ref"],
///     json!("#/components/schemas/Pet")
/// );
/// ```
pub struct SchemaResolver<'a> {
    root: SchemaDocument,
    pool: &'a DocumentPool,
    root_path: String,
    initial_errors: Vec<ResolveError>,
}

impl<'a> SchemaResolver<'a> {
    /// Creates a resolver over `root`, loaded from `root_path`, with the
    /// given pool of candidate target documents.
    ///
    /// `initial_errors` carries diagnostics from the upstream loading step;
    /// when it is non-empty, [`resolve`](Self::resolve) skips all work.
    pub fn new(
        root: SchemaDocument,
        pool: &'a DocumentPool,
        initial_errors: Vec<String>,
        root_path: impl Into<String>,
    ) -> Self {
        Self {
            root,
            pool,
            root_path: root_path.into(),
            initial_errors: initial_errors
                .into_iter()
                .map(ResolveError::Upstream)
                .collect(),
        }
    }

    /// Runs resolution to completion.
    ///
    /// An already-failed load makes resolution meaningless, so pre-existing
    /// errors return the root unmodified and the error list unchanged
    /// rather than piling resolver diagnostics on top of the real problem.
    pub fn resolve(mut self) -> ResolvedSchema {
        if !self.initial_errors.is_empty() {
            debug!(
                errors = self.initial_errors.len(),
                "skipping resolution, upstream loading already failed"
            );
            return ResolvedSchema {
                schema: self.root,
                errors: self.initial_errors,
            };
        }

        let mut ctx = ResolutionContext::new();
        self.expand_path_items(&mut ctx);
        self.materialize_components(&mut ctx);
        ctx.namespace.merge_into(&mut self.root);

        ResolvedSchema {
            schema: self.root,
            errors: ctx.errors,
        }
    }

    /// First pass, over the path-item table only.
    ///
    /// Path-table entries are copied wholesale rather than addressed
    /// indirectly: the resolved value's keys are spliced into the owning
    /// node in place of the marker, after anything the value references
    /// transitively has been pulled into the namespace.
    fn expand_path_items(&mut self, ctx: &mut ResolutionContext) {
        let Some(paths) = self.root.get(PATHS_KEY) else {
            return;
        };
        let sites: Vec<RefSite> = walk(paths).collect();
        if !sites.is_empty() {
            debug!(count = sites.len(), "expanding path-table references");
        }

        for site in sites {
            let root_location = prefix_location(&site.location);
            let reference = match Reference::parse(&site.target, &self.root_path) {
                Ok(reference) => reference,
                Err(error) => {
                    ctx.errors.push(ResolveError::InvalidReference {
                        value: site.target.clone(),
                        reason: error.to_string(),
                    });
                    ctx.failed_sites.insert(root_location);
                    continue;
                }
            };
            if reference.is_local() {
                continue;
            }

            let document_path = reference.target_document().to_string();
            let Some(document) = self.pool.get(&document_path) else {
                ctx.errors
                    .push(ResolveError::UnresolvedDocument(document_path));
                ctx.failed_sites.insert(root_location);
                continue;
            };
            let Some(found) = lookup(document, reference.pointer()) else {
                ctx.errors.push(ResolveError::UnresolvedPointer {
                    pointer: reference.pointer().value().to_string(),
                    document: document_path,
                });
                ctx.failed_sites.insert(root_location);
                continue;
            };
            if !found.is_object() {
                ctx.errors.push(ResolveError::InvalidPathItem {
                    pointer: reference.pointer().value().to_string(),
                    document: document_path,
                });
                ctx.failed_sites.insert(root_location);
                continue;
            }

            let mut value = found.clone();
            for failed in self.localize_value(&mut value, &document_path, ctx) {
                // spliced keys land directly under the owning node, so a
                // value-relative location maps onto the root by prefixing
                let mut location = prefix_location(&site.location);
                location.extend(failed);
                ctx.failed_sites.insert(location);
            }

            let Some(owner) = self
                .root
                .get_mut(PATHS_KEY)
                .and_then(|paths| locate_mut(paths, &site.location))
            else {
                continue;
            };
            splice_into(owner, value);
        }
    }

    /// Second pass, over the whole (now partially expanded) root.
    ///
    /// References local to the root stay untouched; remote ones are
    /// imported into the namespace and rewritten to same-document pointers.
    fn materialize_components(&mut self, ctx: &mut ResolutionContext) {
        let sites: Vec<RefSite> = walk(&self.root).collect();
        for site in sites {
            if ctx.failed_sites.contains(&site.location) {
                continue;
            }
            let reference = match Reference::parse(&site.target, &self.root_path) {
                Ok(reference) => reference,
                Err(error) => {
                    ctx.errors.push(ResolveError::InvalidReference {
                        value: site.target.clone(),
                        reason: error.to_string(),
                    });
                    continue;
                }
            };
            if reference.is_local() {
                continue;
            }

            if self.import_reference(&reference, ctx) {
                if let Some(owner) = locate_mut(&mut self.root, &site.location) {
                    rewrite_marker(owner, reference.pointer());
                }
            }
        }
    }

    /// Rewrites every reference inside a value copied out of
    /// `document_path`, importing what it points at.
    ///
    /// "Local" here is relative to the source document, not the root:
    /// content that was local to its document still has to move into the
    /// namespace, where it keeps its original pointer path. Returns the
    /// value-relative locations of occurrences that produced a diagnostic,
    /// untouched in the value.
    fn localize_value(
        &self,
        value: &mut Value,
        document_path: &str,
        ctx: &mut ResolutionContext,
    ) -> Vec<Vec<PathSegment>> {
        let sites: Vec<RefSite> = walk(value).collect();
        let mut failed = Vec::new();

        for site in sites {
            let reference = match Reference::parse(&site.target, document_path) {
                Ok(reference) => reference,
                Err(error) => {
                    ctx.errors.push(ResolveError::InvalidReference {
                        value: site.target.clone(),
                        reason: error.to_string(),
                    });
                    failed.push(site.location);
                    continue;
                }
            };
            if !self.import_reference(&reference, ctx) {
                failed.push(site.location);
                continue;
            }

            // a reference already in root-fragment form matches its
            // namespace path by construction; one spelled with an explicit
            // document part must still become same-document
            let local_form = format!("#{}", reference.pointer().value());
            if site.target != local_form {
                if let Some(owner) = locate_mut(value, &site.location) {
                    rewrite_marker(owner, reference.pointer());
                }
            }
        }

        failed
    }

    /// Imports the component a reference points at. Returns `true` when the
    /// namespace holds a component at the reference's pointer path
    /// afterwards, i.e. when rewriting the marker to that path is sound.
    fn import_reference(&self, reference: &Reference, ctx: &mut ResolutionContext) -> bool {
        if reference.pointer().is_root() {
            ctx.errors.push(ResolveError::InvalidReference {
                value: reference.value().to_string(),
                reason: "whole-document references cannot be relocated into the components namespace"
                    .to_string(),
            });
            return false;
        }
        self.import_component(reference.target_document(), reference.pointer(), ctx)
    }

    /// The copy-into-namespace procedure: look the component up in its
    /// document, localize a copy of it (recursing into anything it
    /// references), and store the copy under its own pointer path.
    fn import_component(
        &self,
        document_path: &str,
        pointer: &Pointer,
        ctx: &mut ResolutionContext,
    ) -> bool {
        let key = (document_path.to_string(), pointer.value().to_string());
        if !ctx.visited.insert(key.clone()) {
            // already imported, or being imported further up the stack
            return true;
        }

        let Some(document) = self.pool.get(document_path) else {
            ctx.errors
                .push(ResolveError::UnresolvedDocument(document_path.to_string()));
            // released so every failing occurrence reports its own error
            ctx.visited.remove(&key);
            return false;
        };
        let Some(found) = lookup(document, pointer) else {
            ctx.errors.push(ResolveError::UnresolvedPointer {
                pointer: pointer.value().to_string(),
                document: document_path.to_string(),
            });
            ctx.visited.remove(&key);
            return false;
        };

        let mut component = found.clone();
        self.localize_value(&mut component, document_path, ctx);

        match ctx.namespace.insert(pointer, component) {
            InsertOutcome::Stored | InsertOutcome::AlreadyPresent => true,
            InsertOutcome::Collision => {
                warn!(
                    pointer = pointer.value(),
                    document = document_path,
                    "conflicting component definitions, keeping the first"
                );
                ctx.errors.push(ResolveError::NamingCollision {
                    path: pointer.value().to_string(),
                });
                // the first-stored body stays addressable at this path
                true
            }
        }
    }
}

/// Outcome of [`SchemaResolver::resolve`]: the merged root document plus
/// every diagnostic recorded along the way, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    schema: SchemaDocument,
    errors: Vec<ResolveError>,
}

impl ResolvedSchema {
    /// The resolved root document, or the unmodified input if resolution
    /// was skipped.
    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    /// The diagnostics, in the order they were recorded.
    pub fn errors(&self) -> &[ResolveError] {
        &self.errors
    }

    /// `true` when any diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Rendered diagnostic strings, in order. Upstream strings come back
    /// verbatim.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Consumes the result, yielding the document and the diagnostics.
    pub fn into_parts(self) -> (SchemaDocument, Vec<ResolveError>) {
        (self.schema, self.errors)
    }
}

/// Maps a path-table-relative location onto the root document.
fn prefix_location(location: &[PathSegment]) -> Vec<PathSegment> {
    let mut prefixed = Vec::with_capacity(location.len() + 1);
    prefixed.push(PathSegment::Key(PATHS_KEY.to_string()));
    prefixed.extend_from_slice(location);
    prefixed
}

/// Key-by-key replacement of a reference node with resolved content; the
/// marker is removed, every other key the owner already had survives.
fn splice_into(owner: &mut Value, value: Value) {
    let (Value::Object(owner_entries), Value::Object(value_entries)) = (owner, value) else {
        return;
    };
    for (key, entry) in value_entries {
        owner_entries.insert(key, entry);
    }
    owner_entries.remove(REF_KEY);
}

/// Rewrites the marker value to a same-document pointer.
fn rewrite_marker(owner: &mut Value, pointer: &Pointer) {
    if let Value::Object(entries) = owner {
        entries.insert(
            REF_KEY.to_string(),
            Value::String(format!("#{}", pointer.value())),
        );
    }
}

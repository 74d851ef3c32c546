//! Reference-occurrence traversal.
//!
//! [`walk`] is the only traversal primitive the resolver uses: a lazy,
//! restartable, non-mutating iterator over every reference occurrence in a
//! document subtree. Occurrences identify the owning mapping node by its
//! location rather than by alias, so the caller can re-borrow the owner
//! mutably via [`locate_mut`] once classification is done.

use serde_json::Value;

/// Mapping key that marks a node as standing for a value found elsewhere.
pub const REF_KEY: &str = "$ref";

/// One step in the location of a node relative to a walked root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Entry of a mapping node.
    Key(String),
    /// Element of a sequence node.
    Index(usize),
}

/// A reference occurrence: the location of the owning mapping node and the
/// raw marker value found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSite {
    /// Path from the walked root to the mapping that carries the marker.
    pub location: Vec<PathSegment>,
    /// The marker value, e.g. `common.yaml#/components/schemas/Pet`.
    pub target: String,
}

/// Walks `node` for reference occurrences, depth-first.
///
/// A mapping carrying a `$ref` key with a string value produces one
/// [`RefSite`] for the mapping itself; traversal then recurses into every
/// *other* entry, never into the marker value. A `$ref` whose value is not
/// a string is not a reference occurrence and is not recursed into.
/// Sequences are recursed element by element; scalars terminate.
///
/// Each call produces an independent iterator over an unchanged input.
///
/// # Examples
///
/// ```
/// use openapi_resolver_engine::walk;
/// use serde_json::json;
///
/// let document = json!({
///     "a": { "$ref": "#/components/schemas/A" },
///     "b": [{ "$ref": "common.yaml#/components/schemas/B" }],
/// });
///
/// let targets: Vec<String> = walk(&document).map(|site| site.target).collect();
/// assert_eq!(targets, vec![
///     "#/components/schemas/A".to_string(),
///     "common.yaml#/components/schemas/B".to_string(),
/// ]);
/// ```
pub fn walk(node: &Value) -> RefSites<'_> {
    RefSites {
        stack: vec![(node, Vec::new())],
    }
}

/// Iterator returned by [`walk`].
pub struct RefSites<'a> {
    stack: Vec<(&'a Value, Vec<PathSegment>)>,
}

impl Iterator for RefSites<'_> {
    type Item = RefSite;

    fn next(&mut self) -> Option<RefSite> {
        while let Some((node, location)) = self.stack.pop() {
            match node {
                Value::Object(entries) => {
                    let mut target = None;
                    for (key, value) in entries.iter().rev() {
                        if key == REF_KEY {
                            if let Value::String(raw) = value {
                                target = Some(raw.clone());
                            }
                        } else {
                            let mut child = location.clone();
                            child.push(PathSegment::Key(key.clone()));
                            self.stack.push((value, child));
                        }
                    }
                    if let Some(target) = target {
                        return Some(RefSite { location, target });
                    }
                }
                Value::Array(items) => {
                    for (index, value) in items.iter().enumerate().rev() {
                        let mut child = location.clone();
                        child.push(PathSegment::Index(index));
                        self.stack.push((value, child));
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// Re-borrows the node at a location previously yielded by [`walk`].
pub fn locate_mut<'a>(root: &'a mut Value, location: &[PathSegment]) -> Option<&'a mut Value> {
    let mut cursor = root;
    for segment in location {
        cursor = match segment {
            PathSegment::Key(key) => cursor.get_mut(key.as_str())?,
            PathSegment::Index(index) => cursor.get_mut(*index)?,
        };
    }
    Some(cursor)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_walk_yields_sites_at_every_depth() {
        let document = json!({
            "paths": {
                "/pets": {
                    "get": { "responses": { "200": { "$ref": "#/components/responses/Ok" } } }
                }
            },
            "x-extra": { "$ref": "common.yaml#/components/schemas/Pet" },
        });

        let sites: Vec<RefSite> = walk(&document).collect();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].target, "#/components/responses/Ok");
        assert_eq!(
            sites[1].location,
            vec![PathSegment::Key("x-extra".to_string())]
        );
    }

    #[test]
    fn test_walk_recurses_into_sequences() {
        let document = json!({
            "allOf": [
                { "$ref": "#/components/schemas/Base" },
                { "properties": { "name": { "$ref": "#/components/schemas/Name" } } },
            ]
        });

        let sites: Vec<RefSite> = walk(&document).collect();
        assert_eq!(sites.len(), 2);
        assert_eq!(
            sites[0].location,
            vec![
                PathSegment::Key("allOf".to_string()),
                PathSegment::Index(0),
            ]
        );
    }

    #[test]
    fn test_walk_sibling_entries_of_a_marker_are_still_visited() {
        let document = json!({
            "$ref": "#/components/schemas/A",
            "description": { "$ref": "#/components/schemas/B" },
        });

        let targets: Vec<String> = walk(&document).map(|site| site.target).collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&"#/components/schemas/A".to_string()));
        assert!(targets.contains(&"#/components/schemas/B".to_string()));
    }

    #[test]
    fn test_walk_ignores_non_string_markers() {
        let document = json!({
            "$ref": { "nested": { "$ref": "#/hidden" } },
        });

        assert_eq!(walk(&document).count(), 0);
    }

    #[test]
    fn test_walk_is_restartable_and_non_mutating() {
        let document = json!({ "a": { "$ref": "#/x" }, "b": { "$ref": "#/y" } });
        let snapshot = document.clone();

        let first: Vec<RefSite> = walk(&document).collect();
        let second: Vec<RefSite> = walk(&document).collect();
        assert_eq!(first, second);
        assert_eq!(document, snapshot);
    }

    #[test]
    fn test_locate_mut_follows_yielded_locations() {
        let mut document = json!({
            "allOf": [{ "inner": { "$ref": "#/components/schemas/A" } }]
        });

        let site = walk(&document).next().unwrap();
        let owner = locate_mut(&mut document, &site.location).unwrap();
        owner["$ref"] = json!("#/rewritten");

        assert_eq!(
            document["allOf"][0]["inner"]["$ref"],
            json!("#/rewritten")
        );
    }
}

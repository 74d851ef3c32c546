//! The components namespace.
//!
//! The shared local area where copies of remote content are relocated so
//! that the references left in the root document can stay same-document.
//! Namespace paths mirror the original pointer paths of the copied
//! components, which is what lets a reference that was local to its source
//! document keep its pointer unchanged after both sides move here.

use serde_json::{Map, Value};

use openapi_resolver_core::{Pointer, SchemaDocument};

/// Result of storing a component at a namespace path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The slot was empty; the component is now stored there.
    Stored,
    /// The slot already holds structurally equal content; nothing changed.
    AlreadyPresent,
    /// The slot holds different content. The existing value wins and the
    /// candidate is discarded.
    Collision,
}

/// A nested mapping mirroring pointer paths, built incrementally during
/// resolution and merged into the root document once at the end.
#[derive(Debug)]
pub struct ComponentsNamespace {
    tree: Value,
}

impl ComponentsNamespace {
    /// Creates an empty namespace.
    pub fn new() -> Self {
        Self {
            tree: Value::Object(Map::new()),
        }
    }

    /// `true` when nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.tree.as_object().is_none_or(Map::is_empty)
    }

    /// The component stored under `pointer`, if any.
    pub fn get(&self, pointer: &Pointer) -> Option<&Value> {
        let mut cursor = &self.tree;
        for token in pointer.tokens() {
            cursor = cursor.get(token.as_str())?;
        }
        Some(cursor)
    }

    /// Stores `component` under the path the pointer describes.
    ///
    /// Every intermediate segment is materialized as a nested mapping.
    /// Storing equal content twice is a no-op; differing content at an
    /// occupied slot (or a non-mapping in the way of an intermediate
    /// segment) is a collision and leaves the namespace unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use openapi_resolver_core::Pointer;
    /// use openapi_resolver_engine::{ComponentsNamespace, InsertOutcome};
    /// use serde_json::json;
    ///
    /// let mut namespace = ComponentsNamespace::new();
    /// let pointer = Pointer::new("/components/schemas/Pet").unwrap();
    ///
    /// assert_eq!(namespace.insert(&pointer, json!({ "type": "object" })), InsertOutcome::Stored);
    /// assert_eq!(namespace.insert(&pointer, json!({ "type": "object" })), InsertOutcome::AlreadyPresent);
    /// assert_eq!(namespace.insert(&pointer, json!({ "type": "string" })), InsertOutcome::Collision);
    /// assert_eq!(namespace.get(&pointer), Some(&json!({ "type": "object" })));
    /// ```
    pub fn insert(&mut self, pointer: &Pointer, component: Value) -> InsertOutcome {
        let tokens = pointer.tokens();
        let Some((name, dirs)) = tokens.split_last() else {
            // the root pointer has no slot of its own; callers reject
            // whole-document references before getting here
            return InsertOutcome::Collision;
        };

        let mut cursor = &mut self.tree;
        for dir in dirs {
            if dir.is_empty() {
                continue;
            }
            let Value::Object(entries) = cursor else {
                return InsertOutcome::Collision;
            };
            cursor = entries
                .entry(dir.clone())
                .or_insert_with(|| Value::Object(Map::new()));
        }

        let Value::Object(entries) = cursor else {
            return InsertOutcome::Collision;
        };
        match entries.get(name) {
            Some(existing) if *existing == component => InsertOutcome::AlreadyPresent,
            Some(_) => InsertOutcome::Collision,
            None => {
                entries.insert(name.clone(), component);
                InsertOutcome::Stored
            }
        }
    }

    /// Deep-merges the namespace into `root`.
    ///
    /// Two mapping nodes merge recursively key by key, so root keys the
    /// namespace does not define survive; any other pairing is replaced by
    /// the namespace value.
    pub fn merge_into(self, root: &mut SchemaDocument) {
        if self.is_empty() {
            return;
        }
        deep_merge(root, self.tree);
    }
}

impl Default for ComponentsNamespace {
    fn default() -> Self {
        Self::new()
    }
}

fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_entries), Value::Object(source_entries)) => {
            for (key, value) in source_entries {
                match target_entries.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => {
                        deep_merge(slot, value);
                    }
                    _ => {
                        target_entries.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

//! In-process store implementation.
//!
//! One JSON tree behind a mutex; clones share the tree, so each clone stands
//! in for one client's connection to the remote store. Semantics mirror the
//! remote adapter contract exactly: parent-path reads return subtrees,
//! `update` is a shallow merge with `null` meaning "remove key", `delete`
//! drops a whole subtree.

use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};

use super::{Store, StoreError};

#[derive(Clone)]
pub struct MemoryStore {
    root: Arc<Mutex<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            root: Arc::new(Mutex::new(Value::Object(Map::new()))),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Value>, StoreError> {
        self.root
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Remote-store semantics: empty objects and nulls do not exist as values,
/// so drop them eagerly after every mutation.
fn prune(node: &mut Value) {
    if let Value::Object(map) = node {
        map.retain(|_, child| {
            prune(child);
            !child.is_null() && !matches!(child, Value::Object(m) if m.is_empty())
        });
    }
}

/// Descend one level, coercing non-objects to objects so parents spring into
/// existence on write, as the remote store does.
fn child_mut<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
        _ => unreachable!("node was just coerced to an object"),
    }
}

impl Store for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let root = self.lock()?;
        let mut node = &*root;
        for segment in segments(path) {
            match node.get(segment) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        if node.is_null() {
            return Ok(None);
        }
        Ok(Some(node.clone()))
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut root = self.lock()?;
        let mut node = &mut *root;
        for segment in segments(path) {
            node = child_mut(node, segment);
        }
        *node = value;
        prune(&mut root);
        Ok(())
    }

    async fn update(&self, path: &str, partial: Value) -> Result<(), StoreError> {
        let Value::Object(entries) = partial else {
            return Err(StoreError::Rejected {
                path: path.to_string(),
                reason: "update expects an object".to_string(),
            });
        };
        let mut root = self.lock()?;
        let mut node = &mut *root;
        for segment in segments(path) {
            node = child_mut(node, segment);
        }
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        if let Value::Object(map) = node {
            for (key, value) in entries {
                if value.is_null() {
                    map.remove(&key);
                } else {
                    map.insert(key, value);
                }
            }
        }
        prune(&mut root);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        let mut root = self.lock()?;
        let segs = segments(path);
        let Some((last, parents)) = segs.split_last() else {
            *root = Value::Object(Map::new());
            return Ok(());
        };
        let mut node = &mut *root;
        for segment in parents {
            match node.get_mut(*segment) {
                Some(next) => node = next,
                None => return Ok(()),
            }
        }
        if let Value::Object(map) = node {
            map.remove(*last);
        }
        prune(&mut root);
        Ok(())
    }
}

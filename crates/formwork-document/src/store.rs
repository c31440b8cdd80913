use tracing::trace;

use crate::prelude_internal::*;

#[derive(Debug, PartialEq, thiserror::Error, Clone)]
#[error("Store error: {kind} at {path}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub path: FieldPath,
}

#[derive(Debug, PartialEq, thiserror::Error, Clone)]
pub enum StoreErrorKind {
    #[error("Expected map, found {found}")]
    ExpectedMap { found: ValueKind },
    #[error("Expected array, found {found}")]
    ExpectedArray { found: ValueKind },
    #[error("Array index is not a number")]
    InvalidIndex,
    #[error("Array index {index} exceeds the limit of {MAX_ARRAY_INDEX}")]
    IndexOutOfRange { index: usize },
}

/// Largest array index a write may address. Writes pad arrays with nulls up
/// to the index, so the bound also caps the allocation a single write makes.
pub const MAX_ARRAY_INDEX: usize = 9_999;

/// One changed entry reported to the change callback.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub name: String,
    pub value: Value,
}

/// Payload of a change notification: only entries whose value changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeSet {
    pub items: Vec<Change>,
}

impl ChangeSet {
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }
}

pub type ChangeCallback = Box<dyn FnMut(&ChangeSet)>;

/// Owns one data tree and addresses it by path expressions.
///
/// Writes are dirty-checked: a write whose value equals the current leaf is a
/// no-op and does not notify. The store takes the tree by value, so the
/// caller's original is never touched.
pub struct DataStore {
    root: Value,
    queue: Vec<(FieldPath, Value)>,
    on_change: Option<ChangeCallback>,
}

impl core::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataStore")
            .field("root", &self.root)
            .field("queue", &self.queue)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new(Value::empty_map())
    }
}

impl DataStore {
    pub fn new(root: Value) -> Self {
        Self {
            root,
            queue: Vec::new(),
            on_change: None,
        }
    }

    pub fn with_on_change(mut self, callback: impl FnMut(&ChangeSet) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&ChangeSet) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_root(self) -> Value {
        self.root
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.get_path(&FieldPath::parse(path))
    }

    /// Get `expr`, resolving a relative expression against `anchor`.
    pub fn get_from(&self, anchor: &str, expr: &str) -> Option<&Value> {
        self.get_path(&FieldPath::parse(anchor).resolve(expr))
    }

    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        lookup(&self.root, &path.0)
    }

    /// True when the whole chain resolves, including to an explicit null.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Write `value` at `path` and report whether it changed.
    ///
    /// # Panics
    ///
    /// Panics when the path cannot be written, see [`DataStore::try_set`].
    #[track_caller]
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> bool {
        match self.try_set(path, value) {
            Ok(changed) => changed,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_set(&mut self, path: &str, value: impl Into<Value>) -> Result<bool, StoreError> {
        self.try_set_path(&FieldPath::parse(path), value.into())
    }

    pub fn try_set_path(&mut self, path: &FieldPath, value: Value) -> Result<bool, StoreError> {
        let changed = write_path(&mut self.root, path, value.clone())?;
        if changed {
            trace!(path = %path, "store write");
            self.notify(vec![Change {
                name: path.to_string(),
                value,
            }]);
        }
        Ok(changed)
    }

    /// Apply all entries to one working copy and notify once.
    ///
    /// # Panics
    ///
    /// Panics when any entry cannot be written; the store is left untouched.
    #[track_caller]
    pub fn bulk_set<S: AsRef<str>>(
        &mut self,
        entries: impl IntoIterator<Item = (S, Value)>,
    ) -> bool {
        match self.try_bulk_set(entries) {
            Ok(changed) => changed,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_bulk_set<S: AsRef<str>>(
        &mut self,
        entries: impl IntoIterator<Item = (S, Value)>,
    ) -> Result<bool, StoreError> {
        let entries = entries
            .into_iter()
            .map(|(path, value)| (FieldPath::parse(path.as_ref()), value));
        self.apply_bulk(entries)
    }

    /// Queue a write for the next [`DataStore::bulk_exec`].
    pub fn bulk_push(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.queue.push((FieldPath::parse(path), value.into()));
        self
    }

    pub fn has_bulk_queue(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Flush the queue through bulk-set semantics.
    ///
    /// # Panics
    ///
    /// Panics when a queued entry cannot be written.
    #[track_caller]
    pub fn bulk_exec(&mut self) -> bool {
        match self.try_bulk_exec() {
            Ok(changed) => changed,
            Err(err) => panic!("{err}"),
        }
    }

    /// Flush the queue. The queue is cleared even when a write fails.
    pub fn try_bulk_exec(&mut self) -> Result<bool, StoreError> {
        let queue = core::mem::take(&mut self.queue);
        self.apply_bulk(queue)
    }

    fn apply_bulk(
        &mut self,
        entries: impl IntoIterator<Item = (FieldPath, Value)>,
    ) -> Result<bool, StoreError> {
        let mut working = self.root.clone();
        let mut changes = Vec::new();
        for (path, value) in entries {
            if write_path(&mut working, &path, value.clone())? {
                changes.push(Change {
                    name: path.to_string(),
                    value,
                });
            }
        }
        self.root = working;
        trace!(changed = changes.len(), "store bulk write");
        let changed = !changes.is_empty();
        self.notify(changes);
        Ok(changed)
    }

    fn notify(&mut self, items: Vec<Change>) {
        if items.is_empty() {
            return;
        }
        if let Some(callback) = self.on_change.as_mut() {
            callback(&ChangeSet { items });
        }
    }
}

fn lookup<'v>(node: &'v Value, segments: &[PathSegment]) -> Option<&'v Value> {
    segments
        .iter()
        .try_fold(node, |node, segment| match (segment, node) {
            (PathSegment::Key(key), Value::Map(map)) => map.get(key),
            (PathSegment::Index(Some(index)), Value::Array(items)) => items.get(*index),
            _ => None,
        })
}

/// Dirty-checked write of `value` at `path` below `root`.
///
/// Missing or null intermediates become fresh containers (a map before a key,
/// an array before an index); arrays are padded with nulls. Nothing is
/// modified when an error is returned.
pub(crate) fn write_path(
    root: &mut Value,
    path: &FieldPath,
    value: Value,
) -> Result<bool, StoreError> {
    if lookup(root, &path.0) == Some(&value) {
        return Ok(false);
    }
    let error = |kind| StoreError {
        kind,
        path: path.clone(),
    };
    for segment in &path.0 {
        match segment {
            PathSegment::Index(None) => return Err(error(StoreErrorKind::InvalidIndex)),
            PathSegment::Index(Some(index)) if *index > MAX_ARRAY_INDEX => {
                return Err(error(StoreErrorKind::IndexOutOfRange { index: *index }));
            }
            _ => {}
        }
    }
    check_writable(root, &path.0).map_err(error)?;
    write_at(root, &path.0, value);
    Ok(true)
}

/// Walk the existing part of the chain and reject mismatched containers.
fn check_writable(node: &Value, segments: &[PathSegment]) -> Result<(), StoreErrorKind> {
    let Some((head, rest)) = segments.split_first() else {
        return Ok(());
    };
    match (head, node) {
        (_, Value::Null) => Ok(()),
        (PathSegment::Key(key), Value::Map(map)) => match map.get(key) {
            Some(child) => check_writable(child, rest),
            None => Ok(()),
        },
        (PathSegment::Index(Some(index)), Value::Array(items)) => match items.get(*index) {
            Some(child) => check_writable(child, rest),
            None => Ok(()),
        },
        (PathSegment::Key(_), other) => Err(StoreErrorKind::ExpectedMap {
            found: other.kind(),
        }),
        (PathSegment::Index(_), other) => Err(StoreErrorKind::ExpectedArray {
            found: other.kind(),
        }),
    }
}

fn write_at(node: &mut Value, segments: &[PathSegment], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    match head {
        PathSegment::Key(key) => {
            if !matches!(node, Value::Map(_)) {
                *node = Value::empty_map();
            }
            if let Value::Map(map) = node {
                write_at(map.entry_or_null(key), rest, value);
            }
        }
        PathSegment::Index(index) => {
            let index = index.unwrap_or_default();
            if !matches!(node, Value::Array(_)) {
                *node = Value::Array(Vec::new());
            }
            if let Value::Array(items) = node {
                let len = index.saturating_add(1);
                if len > items.len() {
                    items.resize(len, Value::Null);
                }
                if let Some(item) = items.get_mut(index) {
                    write_at(item, rest, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    fn store(json: serde_json::Value) -> DataStore {
        DataStore::new(Value::from(json))
    }

    fn recording(store: DataStore) -> (DataStore, Rc<RefCell<Vec<ChangeSet>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let store = store.with_on_change(move |changes| sink.borrow_mut().push(changes.clone()));
        (store, calls)
    }

    #[test]
    fn test_get_nested_and_missing() {
        let store = store(json!({"a": {"b": [10, {"c": "x"}]}}));
        assert_eq!(store.get("a.b[0]"), Some(&Value::Number(10.0)));
        assert_eq!(store.get("a.b[1].c"), Some(&Value::from("x")));
        assert_eq!(store.get("a.b[5].c"), None);
        assert_eq!(store.get("a.x.y"), None);
        assert_eq!(store.get("a.b[]"), None);
    }

    #[test]
    fn test_has_counts_explicit_null() {
        let store = store(json!({"a": null}));
        assert!(store.has("a"));
        assert!(!store.has("b"));
    }

    #[test]
    fn test_get_from_relative_anchor() {
        let store = store(json!({
            "user": {"address": {"city": "Tokyo", "zip": "100-0001"}, "zip": "999-9999"}
        }));
        assert_eq!(
            store.get_from("user.address.city", ".zip"),
            Some(&Value::from("100-0001"))
        );
        assert_eq!(
            store.get_from("user.address.city", "..zip"),
            Some(&Value::from("999-9999"))
        );
    }

    #[test]
    fn test_get_from_zip_beside_address() {
        let store = store(json!({"user": {"address": {"city": "Tokyo"}, "zip": "100-0001"}}));
        assert_eq!(store.get_from("user.address.city", ".zip"), None);
        assert_eq!(
            store.get_from("user.address.city", "..zip"),
            Some(&Value::from("100-0001"))
        );
    }

    #[test]
    fn test_set_creates_intermediate_containers() {
        let mut store = DataStore::default();
        assert!(store.set("a.b[2].c", "x"));
        assert_eq!(
            store.root().to_json(),
            json!({"a": {"b": [null, null, {"c": "x"}]}})
        );
    }

    #[test]
    fn test_set_same_value_is_noop() {
        let (mut store, calls) = recording(store(json!({})));
        assert!(store.set("name", "Bob"));
        assert!(!store.set("name", "Bob"));
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].items[0].name, "name");
    }

    #[test]
    fn test_set_does_not_touch_original() {
        let original = Value::from(json!({"user": {"name": "Alice"}}));
        let mut store = DataStore::new(original.clone());
        store.set("user.name", "Bob");
        assert_eq!(original.to_json(), json!({"user": {"name": "Alice"}}));
        assert_eq!(store.get("user.name"), Some(&Value::from("Bob")));
    }

    #[test]
    fn test_try_set_through_scalar_fails() {
        let mut store = store(json!({"a": "text"}));
        let err = store.try_set("a.b", 1).unwrap_err();
        assert_eq!(
            err.kind,
            StoreErrorKind::ExpectedMap {
                found: ValueKind::Text
            }
        );
        assert_eq!(store.get("a"), Some(&Value::from("text")));
    }

    #[test]
    fn test_try_set_nan_index_fails() {
        let mut store = DataStore::default();
        let err = store.try_set("items[]", 1).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidIndex);
    }

    #[test]
    fn test_try_set_index_beyond_limit_fails() {
        let mut store = DataStore::default();
        let err = store.try_set("items[18446744073709551615]", 1).unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::IndexOutOfRange { index: usize::MAX });
        let err = store.try_set("items[4000000000].name", "x").unwrap_err();
        assert!(matches!(err.kind, StoreErrorKind::IndexOutOfRange { .. }));
        assert_eq!(store.root().to_json(), json!({}));

        assert!(store.set(&format!("items[{MAX_ARRAY_INDEX}]"), 1));
        assert_eq!(store.root().as_map().unwrap().len(), 1);
    }

    #[test]
    #[should_panic(expected = "Expected array")]
    fn test_set_panics_on_mismatched_container() {
        let mut store = store(json!({"items": {"a": 1}}));
        store.set("items[0]", 1);
    }

    #[test]
    fn test_bulk_set_notifies_once_with_changed_subset() {
        let (mut store, calls) = recording(store(json!({"a": 1})));
        let changed = store.bulk_set([("a", Value::from(1)), ("b", Value::from(2))]);
        assert!(changed);
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].items.len(), 1);
        assert!(calls[0].contains("b"));
    }

    #[test]
    fn test_bulk_set_unchanged_does_not_notify() {
        let (mut store, calls) = recording(store(json!({"a": 1})));
        assert!(!store.bulk_set([("a", Value::from(1))]));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_bulk_set_failure_leaves_store_untouched() {
        let mut store = store(json!({"a": "text"}));
        let result = store.try_bulk_set([("b", Value::from(1)), ("a.c", Value::from(2))]);
        assert!(result.is_err());
        assert!(!store.has("b"));
    }

    #[test]
    fn test_bulk_push_and_exec() {
        let (mut store, calls) = recording(DataStore::default());
        store.bulk_push("items[0]", "foo").bulk_push("items[1]", "bar");
        assert!(store.has_bulk_queue());
        assert!(calls.borrow().is_empty());
        assert!(!store.has("items"));

        assert!(store.bulk_exec());
        assert!(!store.has_bulk_queue());
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].items,
            vec![
                Change {
                    name: "items[0]".to_string(),
                    value: Value::from("foo")
                },
                Change {
                    name: "items[1]".to_string(),
                    value: Value::from("bar")
                },
            ]
        );
    }

    #[test]
    fn test_bulk_exec_empty_queue() {
        let mut store = DataStore::default();
        assert!(!store.bulk_exec());
    }

    #[test]
    fn test_write_through_null_replaces_it() {
        let mut store = store(json!({"a": null}));
        assert!(store.set("a.b", 1));
        assert_eq!(store.get("a.b"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_set_root() {
        let mut store = DataStore::default();
        assert!(store.set("", Value::from(json!({"x": 1}))));
        assert_eq!(store.get("x"), Some(&Value::Number(1.0)));
    }
}

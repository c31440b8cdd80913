//! Property tests for the data store

use std::cell::Cell;
use std::rc::Rc;

use formwork_document::path::{FieldPath, PathSegment};
use formwork_document::store::DataStore;
use formwork_document::value::Value;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,6}".prop_map(PathSegment::Key),
        (0usize..4).prop_map(|i| PathSegment::Index(Some(i))),
    ]
}

fn path() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9_]{0,6}", proptest::collection::vec(segment(), 0..5)).prop_map(|(head, rest)| {
        let mut segments = vec![PathSegment::Key(head)];
        segments.extend(rest);
        FieldPath(segments).to_string()
    })
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        (-1.0e9f64..1.0e9).prop_map(Value::Number),
        ".{0,12}".prop_map(Value::Text),
    ]
}

proptest! {
    /// Invariant: a written value reads back unchanged.
    #[test]
    fn set_then_get_round_trips(path in path(), value in leaf()) {
        let mut store = DataStore::default();
        store.set(&path, value.clone());
        prop_assert_eq!(store.get(&path), Some(&value));
        prop_assert!(store.has(&path));
    }

    /// Invariant: the second identical write is a no-op and does not notify.
    #[test]
    fn repeated_write_is_noop(path in path(), value in leaf()) {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut store =
            DataStore::default().with_on_change(move |_| counter.set(counter.get() + 1));

        prop_assert!(store.set(&path, value.clone()));
        prop_assert!(!store.set(&path, value));
        prop_assert_eq!(calls.get(), 1);
    }

    /// Invariant: the caller's original tree is never modified.
    #[test]
    fn original_is_not_mutated(path in path(), value in leaf()) {
        let original = Value::from(serde_json::json!({"user": {"name": "Alice"}}));
        let mut store = DataStore::new(original.clone());
        let _ = store.try_set(&path, value);
        prop_assert_eq!(original, Value::from(serde_json::json!({"user": {"name": "Alice"}})));
    }
}

#[test]
fn parsed_path_display_is_stable() {
    for expr in ["a", "a.b", "a[0]", "a.b[2].c", "a[1][2]"] {
        assert_eq!(FieldPath::parse(expr).to_string(), expr);
    }
}

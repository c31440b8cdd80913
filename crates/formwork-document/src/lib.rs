//! Path-addressable data tree for formwork.
//!
//! Submitted data (a form multi-map or a parsed JSON body) is translated into a
//! [`Value`](value::Value) tree and wrapped by a [`DataStore`](store::DataStore),
//! which reads and writes nodes through path expressions such as `a.b[2].c`.

/// Path expressions: splitting, index parsing and relative resolution.
pub mod path;

/// A type-safe data-type of the submitted data model.
pub mod value;

/// Insertion-ordered mapping used by [`value::Value::Map`].
pub mod map;

/// Dirty-checked, path-addressable store with bulk writes and change notification.
pub mod store;

/// Translation of raw submissions into a value tree.
pub mod input;

pub use map::Map;

pub(crate) mod prelude_internal {
    #![allow(unused_imports)]
    pub use crate::map::Map;
    pub use crate::path::{FieldPath, PathSegment};
    pub use crate::store::{DataStore, StoreError, StoreErrorKind};
    pub use crate::value::{FileValue, Value, ValueKind, YearMonth};
    pub use thisisplural::Plural;
}

//! Named, insertion-ordered collection of field descriptors.

use formwork_document::path::FieldPath;
use formwork_document::store::DataStore;
use indexmap::IndexMap;

use crate::descriptor::{FieldDescriptor, FieldKind};

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, FieldDescriptor>,
}

/// A field together with the absolute paths it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEdge {
    pub field: String,
    pub refs: Vec<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDescriptor>) -> Self {
        self.insert(name, field);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: impl Into<FieldDescriptor>) {
        self.fields.insert(name.into(), field.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldDescriptor)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Expand every declared `refs` list into absolute paths.
    ///
    /// Array items are expanded against the elements currently in `store`, so
    /// a relative ref `.end` on `periods[]`'s `start` yields one edge per
    /// element (`periods[0].start -> periods[0].end`, ...).
    pub fn ref_graph(&self, store: &DataStore) -> Vec<RefEdge> {
        let mut edges = Vec::new();
        for (name, field) in &self.fields {
            collect_refs(field, &FieldPath::root().child_key(name), store, &mut edges);
        }
        edges
    }
}

fn collect_refs(
    field: &FieldDescriptor,
    path: &FieldPath,
    store: &DataStore,
    edges: &mut Vec<RefEdge>,
) {
    if !field.refs.is_empty() {
        edges.push(RefEdge {
            field: path.to_string(),
            refs: field
                .refs
                .iter()
                .map(|expr| path.resolve(expr).to_string())
                .collect(),
        });
    }
    match &field.kind {
        FieldKind::Array(item) => {
            let len = store
                .get_path(path)
                .and_then(|value| value.as_array())
                .map_or(0, Vec::len);
            for index in 0..len {
                collect_refs(item, &path.child_index(index), store, edges);
            }
        }
        FieldKind::Record(children) => {
            for (name, child) in children {
                collect_refs(child, &path.child_key(name), store, edges);
            }
        }
        _ => {}
    }
}

impl<K: Into<String>, V: Into<FieldDescriptor>> FromIterator<(K, V)> for Schema {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, field)| (name.into(), field.into()))
                .collect(),
        }
    }
}

//! Record (nested struct) fields

use formwork_document::Map;
use formwork_document::path::FieldPath;
use formwork_document::value::Value;
use indexmap::IndexMap;

use super::Walker;
use crate::descriptor::FieldDescriptor;
use crate::error::EngineError;

impl Walker<'_> {
    /// Validate each child at `path.child`, then the record's own chain on the
    /// collected children.
    pub(super) fn record(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        children: &IndexMap<String, FieldDescriptor>,
        path: &FieldPath,
    ) -> Result<Option<Value>, EngineError> {
        let present = match self.store.get_path(path) {
            None | Some(Value::Null) => false,
            Some(Value::Map(_)) => true,
            Some(other) => {
                return Err(EngineError::UnexpectedShape {
                    expected: "map",
                    found: other.kind(),
                    path: path.clone(),
                });
            }
        };

        let mut map = Map::default();
        for (name, child) in children {
            if let Some(value) = self.field(name, child, &path.child_key(name))? {
                map.insert(name.clone(), value);
            }
        }
        let value = (present || !map.is_empty()).then_some(Value::Map(map));
        self.check(label, field, path, value.as_ref());
        Ok(value)
    }
}

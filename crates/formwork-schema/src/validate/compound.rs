//! Array fields

use formwork_document::path::FieldPath;
use formwork_document::value::{Value, ValueKind};

use super::Walker;
use crate::descriptor::FieldDescriptor;
use crate::error::EngineError;

impl Walker<'_> {
    /// Validate every element with `item`, then the array as a whole.
    ///
    /// A single scalar (a form key submitted once) counts as a one-element
    /// array; a mapping is a structural error.
    pub(super) fn array(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        item: &FieldDescriptor,
        path: &FieldPath,
    ) -> Result<Option<Value>, EngineError> {
        let len = match self.store.get_path(path) {
            None | Some(Value::Null) => None,
            Some(Value::Text(text)) if text.is_empty() => None,
            Some(Value::Array(items)) => Some(items.len()),
            Some(Value::Map(_)) => {
                return Err(EngineError::UnexpectedShape {
                    expected: "array",
                    found: ValueKind::Map,
                    path: path.clone(),
                });
            }
            Some(scalar) => {
                let scalar = scalar.clone();
                self.store.try_set_path(path, Value::Array(vec![scalar]))?;
                Some(1)
            }
        };

        let Some(len) = len else {
            self.check(label, field, path, None);
            return Ok(None);
        };
        let mut items = Vec::with_capacity(len);
        let mut present = Vec::with_capacity(len);
        for index in 0..len {
            match self.field(label, item, &path.child_index(index))? {
                Some(value) => {
                    present.push(value.clone());
                    items.push(value);
                }
                None => items.push(Value::Null),
            }
        }
        // Absent and unparsable slots stay null in the output but are not
        // members for the array's own chain.
        self.check(label, field, path, Some(&Value::Array(present)));
        Ok(Some(Value::Array(items)))
    }
}

use indexmap::IndexMap;

use super::{Common, FieldDescriptor, FieldKind, common_options};

/// Builder for a nested struct of named fields.
#[derive(Clone, Default)]
pub struct RecordField {
    common: Common,
    children: IndexMap<String, FieldDescriptor>,
}

pub fn record() -> RecordField {
    RecordField::default()
}

common_options!(RecordField);

impl RecordField {
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDescriptor>) -> Self {
        self.children.insert(name.into(), field.into());
        self
    }
}

impl From<RecordField> for FieldDescriptor {
    fn from(field: RecordField) -> Self {
        field
            .common
            .finish(FieldKind::Record(field.children), Vec::new())
    }
}

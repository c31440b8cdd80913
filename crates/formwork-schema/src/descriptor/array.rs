use formwork_document::value::Value;

use super::{Common, FieldDescriptor, FieldKind, common_options};
use crate::check::Check;
use crate::constraint::Constraint;

/// Builder for an array field. Every element is validated with the item
/// descriptor at `name[i]`; the array-level checks see the whole collection.
#[derive(Clone)]
pub struct ArrayField {
    common: Common,
    item: FieldDescriptor,
    length: Option<Constraint<usize>>,
    min_length: Option<Constraint<usize>>,
    max_length: Option<Constraint<usize>>,
    source: Option<Constraint<Vec<Value>>>,
}

pub fn array(item: impl Into<FieldDescriptor>) -> ArrayField {
    ArrayField {
        common: Common::default(),
        item: item.into(),
        length: None,
        min_length: None,
        max_length: None,
        source: None,
    }
}

common_options!(ArrayField);

impl ArrayField {
    /// Exact number of elements.
    pub fn length(mut self, length: impl Into<Constraint<usize>>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn min_length(mut self, min: impl Into<Constraint<usize>>) -> Self {
        self.min_length = Some(min.into());
        self
    }

    pub fn max_length(mut self, max: impl Into<Constraint<usize>>) -> Self {
        self.max_length = Some(max.into());
        self
    }

    /// Every element must be one of `options`.
    pub fn options<V: Into<Value>>(self, options: impl IntoIterator<Item = V>) -> Self {
        self.source(options.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    pub fn source(mut self, source: impl Into<Constraint<Vec<Value>>>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl From<ArrayField> for FieldDescriptor {
    fn from(field: ArrayField) -> Self {
        let checks = [
            field.length.map(Check::Length),
            field.min_length.map(Check::MinLength),
            field.max_length.map(Check::MaxLength),
            field.source.map(Check::Source),
        ];
        field.common.finish(
            FieldKind::Array(Box::new(field.item)),
            checks.into_iter().flatten().collect(),
        )
    }
}

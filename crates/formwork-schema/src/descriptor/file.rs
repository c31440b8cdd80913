use formwork_document::value::Value;

use super::{Common, FieldDescriptor, FieldKind, Parsed, common_options};
use crate::check::Check;
use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::result::ResultCode;

/// Builder for an uploaded file field.
#[derive(Clone, Default)]
pub struct FileField {
    common: Common,
    accept: Option<Constraint<Vec<String>>>,
    max_size: Option<Constraint<u64>>,
}

pub fn file() -> FileField {
    FileField::default()
}

common_options!(FileField);

impl FileField {
    /// Accepted types: extensions (`.pdf`), wildcards (`image/*`) or exact
    /// media types (`application/json`).
    pub fn accept<S: Into<String>>(self, types: impl IntoIterator<Item = S>) -> Self {
        self.accept_with(types.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    pub fn accept_with(mut self, accept: impl Into<Constraint<Vec<String>>>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Maximum size in bytes.
    pub fn max_size(mut self, max: impl Into<Constraint<u64>>) -> Self {
        self.max_size = Some(max.into());
        self
    }
}

impl From<FileField> for FieldDescriptor {
    fn from(field: FileField) -> Self {
        let checks = [
            field.accept.map(Check::Accept),
            field.max_size.map(Check::MaxSize),
        ];
        field
            .common
            .finish(FieldKind::File, checks.into_iter().flatten().collect())
    }
}

/// An empty upload part or empty text counts as no file.
pub(crate) fn parse(ctx: &ValidationContext<'_>) -> Parsed {
    match ctx.value {
        None | Some(Value::Null) => Parsed::absent(),
        Some(Value::File(file)) if file.is_empty_part() => Parsed::absent(),
        Some(Value::File(file)) => Parsed::value(Value::File(file.clone())),
        Some(Value::Text(text)) if text.is_empty() => Parsed::absent(),
        Some(_) => Parsed::invalid_as(ctx, ResultCode::InvalidFile),
    }
}

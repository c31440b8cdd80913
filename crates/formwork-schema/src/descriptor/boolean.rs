use formwork_document::value::Value;

use super::{Common, FieldDescriptor, FieldKind, Parsed, common_options};
use crate::context::ValidationContext;
use crate::result::ResultCode;

/// Builder for a boolean field. `required` means the value must be `true`
/// (an unchecked checkbox is blank).
#[derive(Clone, Default)]
pub struct BooleanField {
    common: Common,
}

pub fn boolean() -> BooleanField {
    BooleanField::default()
}

common_options!(BooleanField);

impl From<BooleanField> for FieldDescriptor {
    fn from(field: BooleanField) -> Self {
        field.common.finish(FieldKind::Boolean, Vec::new())
    }
}

/// Interpret a submitted form string.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse(ctx: &ValidationContext<'_>) -> Parsed {
    match ctx.value {
        None | Some(Value::Null) => Parsed::absent(),
        Some(Value::Bool(b)) => Parsed::value(Value::Bool(*b)),
        Some(Value::Text(text)) if text.trim().is_empty() => Parsed::absent(),
        Some(Value::Text(text)) => match parse_flag(text) {
            Some(b) => Parsed::value(Value::Bool(b)),
            None => Parsed::invalid_as(ctx, ResultCode::InvalidBoolean),
        },
        Some(Value::Number(n)) if *n == 0.0 || *n == 1.0 => Parsed::value(Value::Bool(*n == 1.0)),
        Some(_) => Parsed::invalid_as(ctx, ResultCode::InvalidBoolean),
    }
}

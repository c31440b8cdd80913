use formwork_document::value::Value;

use super::{Common, FieldDescriptor, FieldKind, Parsed, common_options};
use crate::check::Check;
use crate::config::Config;
use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::numeric::parse_number;
use crate::result::ResultCode;

/// Builder for a numeric field.
#[derive(Clone, Default)]
pub struct NumberField {
    common: Common,
    min: Option<Constraint<f64>>,
    max: Option<Constraint<f64>>,
    precision: Option<Constraint<u32>>,
    source: Option<Constraint<Vec<Value>>>,
}

pub fn number() -> NumberField {
    NumberField::default()
}

common_options!(NumberField);

impl NumberField {
    pub fn min(mut self, min: impl Into<Constraint<f64>>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Constraint<f64>>) -> Self {
        self.max = Some(max.into());
        self
    }

    /// Maximum number of decimal places.
    pub fn precision(mut self, precision: impl Into<Constraint<u32>>) -> Self {
        self.precision = Some(precision.into());
        self
    }

    pub fn options<V: Into<Value>>(self, options: impl IntoIterator<Item = V>) -> Self {
        self.source(options.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    pub fn source(mut self, source: impl Into<Constraint<Vec<Value>>>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl From<NumberField> for FieldDescriptor {
    fn from(field: NumberField) -> Self {
        let checks = [
            field.min.map(Check::Min),
            field.max.map(Check::Max),
            field.precision.map(Check::Precision),
            field.source.map(Check::Source),
        ];
        field
            .common
            .finish(FieldKind::Number, checks.into_iter().flatten().collect())
    }
}

/// Empty input is absent; anything else must be a number or parse as one.
pub(crate) fn parse(ctx: &ValidationContext<'_>, config: &Config) -> Parsed {
    match ctx.value {
        None | Some(Value::Null) => Parsed::absent(),
        Some(Value::Number(n)) => Parsed::value(Value::Number(*n)),
        Some(Value::Text(text)) => {
            let text = if config.trim_text { text.trim() } else { text.as_str() };
            if text.is_empty() {
                return Parsed::absent();
            }
            match parse_number(text) {
                Some(n) => Parsed::value(Value::Number(n)),
                None => Parsed::invalid_as(ctx, ResultCode::InvalidNumber),
            }
        }
        Some(_) => Parsed::invalid_as(ctx, ResultCode::InvalidNumber),
    }
}

use formwork_document::value::Value;

use super::{Common, FieldDescriptor, FieldKind, Parsed, common_options};
use crate::check::Check;
use crate::config::Config;
use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::numeric::format_number;
use crate::pattern::Pattern;
use crate::result::ResultCode;

/// Builder for a string field.
#[derive(Clone, Default)]
pub struct TextField {
    common: Common,
    length: Option<Constraint<usize>>,
    min_length: Option<Constraint<usize>>,
    max_length: Option<Constraint<usize>>,
    pattern: Option<Constraint<Pattern>>,
    source: Option<Constraint<Vec<Value>>>,
}

pub fn string() -> TextField {
    TextField::default()
}

common_options!(TextField);

impl TextField {
    /// Exact length in characters.
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

    /// A literal [`regex::Regex`] or a canned [`Category`](crate::pattern::Category).
    pub fn pattern(mut self, pattern: impl Into<Constraint<Pattern>>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Restrict the value to a fixed set of options.
    pub fn options<V: Into<Value>>(self, options: impl IntoIterator<Item = V>) -> Self {
        self.source(options.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    /// Restrict the value to the allowed values of `source`.
    pub fn source(mut self, source: impl Into<Constraint<Vec<Value>>>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl From<TextField> for FieldDescriptor {
    fn from(field: TextField) -> Self {
        let checks = [
            field.length.map(Check::Length),
            field.min_length.map(Check::MinLength),
            field.max_length.map(Check::MaxLength),
            field.pattern.map(Check::Pattern),
            field.source.map(Check::Source),
        ];
        field
            .common
            .finish(FieldKind::Text, checks.into_iter().flatten().collect())
    }
}

pub(crate) fn parse(ctx: &ValidationContext<'_>, config: &Config) -> Parsed {
    let text = match ctx.value {
        None | Some(Value::Null) => return Parsed::absent(),
        Some(Value::Text(text)) if config.trim_text => text.trim().to_string(),
        Some(Value::Text(text)) => text.clone(),
        Some(Value::Number(n)) => format_number(*n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(value @ (Value::Date(_) | Value::Month(_) | Value::DateTime(_))) => {
            match value.to_json() {
                serde_json::Value::String(text) => text,
                _ => return Parsed::invalid_as(ctx, ResultCode::InvalidText),
            }
        }
        Some(_) => return Parsed::invalid_as(ctx, ResultCode::InvalidText),
    };
    if text.is_empty() {
        Parsed::absent()
    } else {
        Parsed::value(Value::Text(text))
    }
}

//! Field descriptors
//!
//! A [`FieldDescriptor`] is built once from one of the constructor functions
//! ([`string`], [`number`], [`array`], ...) and never changes afterwards. The
//! builder methods may be called in any order; the resulting validator chain
//! always follows the fixed precedence of its kind, starting with `required`
//! and ending with custom validators in declaration order.

use std::sync::Arc;

use formwork_document::value::Value;
use indexmap::IndexMap;

use crate::check::Check;
use crate::config::Config;
use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::message;
use crate::pattern::PatternCache;
use crate::result::{ResultCode, ValidationResult};

pub type Validator =
    Arc<dyn Fn(&ValidationContext<'_>) -> Option<ValidationResult> + Send + Sync>;

/// Options shared by every descriptor builder.
macro_rules! common_options {
    ($builder:ty) => {
        impl $builder {
            /// Display name used in messages. Defaults to the field name.
            pub fn label(mut self, label: impl Into<String>) -> Self {
                self.common.label = Some(label.into());
                self
            }

            pub fn required(
                mut self,
                required: impl Into<$crate::constraint::Constraint<bool>>,
            ) -> Self {
                self.common.required = Some(required.into());
                self
            }

            pub fn mode(
                mut self,
                mode: impl Into<$crate::constraint::Constraint<$crate::descriptor::FieldMode>>,
            ) -> Self {
                self.common.mode = Some(mode.into());
                self
            }

            /// Paths (absolute or relative) whose changes affect this field's
            /// dynamic constraints.
            pub fn refs<S: Into<String>>(mut self, refs: impl IntoIterator<Item = S>) -> Self {
                self.common.refs.extend(refs.into_iter().map(Into::into));
                self
            }

            /// Append a custom validator. Custom validators run last, in the
            /// order they were added.
            pub fn validate(
                mut self,
                validator: impl Fn(
                        &$crate::context::ValidationContext<'_>,
                    ) -> Option<$crate::result::ValidationResult>
                    + Send
                    + Sync
                    + 'static,
            ) -> Self {
                self.common.validators.push(std::sync::Arc::new(validator));
                self
            }
        }
    };
}

pub(crate) use common_options;

pub mod array;
pub mod boolean;
pub mod date;
pub mod file;
pub mod number;
pub mod record;
pub mod text;

pub use array::{ArrayField, array};
pub use boolean::{BooleanField, boolean};
pub use date::{
    DateField, DateKind, DatePart, DatePartField, DateSpec, PairOrder, PairRule, date, date_part,
    datetime, month,
};
pub use file::{FileField, file};
pub use number::{NumberField, number};
pub use record::{RecordField, record};
pub use text::{TextField, string};

/// Interaction mode of a field. Disabled and hidden fields are not validated
/// and produce no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    #[default]
    Enabled,
    Disabled,
    Readonly,
    Hidden,
}

impl FieldMode {
    pub fn is_skipped(&self) -> bool {
        matches!(self, FieldMode::Disabled | FieldMode::Hidden)
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Date(DateSpec),
    DatePart(DatePart),
    File,
    Array(Box<FieldDescriptor>),
    Record(IndexMap<String, FieldDescriptor>),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date(spec) => spec.kind.name(),
            FieldKind::DatePart(_) => "date-part",
            FieldKind::File => "file",
            FieldKind::Array(_) => "array",
            FieldKind::Record(_) => "record",
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct Common {
    pub label: Option<String>,
    pub required: Option<Constraint<bool>>,
    pub mode: Option<Constraint<FieldMode>>,
    pub refs: Vec<String>,
    pub validators: Vec<Validator>,
}

impl Common {
    /// Wrap the kind-specific `checks` between `required` and the custom
    /// validators.
    pub(crate) fn finish(self, kind: FieldKind, checks: Vec<Check>) -> FieldDescriptor {
        let chain = self
            .required
            .map(Check::Required)
            .into_iter()
            .chain(checks)
            .chain(self.validators.into_iter().map(Check::Custom))
            .collect();
        FieldDescriptor {
            kind,
            label: self.label,
            mode: self.mode,
            refs: self.refs,
            checks: chain,
        }
    }
}

#[derive(Clone)]
pub struct FieldDescriptor {
    pub(crate) kind: FieldKind,
    pub(crate) label: Option<String>,
    pub(crate) mode: Option<Constraint<FieldMode>>,
    pub(crate) refs: Vec<String>,
    pub(crate) checks: Vec<Check>,
}

impl core::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("refs", &self.refs)
            .field("checks", &self.checks)
            .finish()
    }
}

/// Output of a descriptor's parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    /// The typed value; `None` when the input was absent or malformed
    pub value: Option<Value>,
    /// Set when non-empty input could not be parsed
    pub result: Option<ValidationResult>,
}

impl Parsed {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn value(value: Value) -> Self {
        Self {
            value: Some(value),
            result: None,
        }
    }

    pub fn invalid(result: ValidationResult) -> Self {
        Self {
            value: None,
            result: Some(result),
        }
    }

    pub(crate) fn invalid_as(ctx: &ValidationContext<'_>, code: ResultCode) -> Self {
        let message = message::render(ctx, &format!("validation.{}", code.as_str()), &[]);
        Self::invalid(ValidationResult::error(code, message))
    }
}

impl FieldDescriptor {
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn refs(&self) -> &[String] {
        &self.refs
    }

    /// Effective mode in `ctx`.
    pub fn mode(&self, ctx: &ValidationContext<'_>) -> FieldMode {
        self.mode
            .as_ref()
            .map_or(FieldMode::Enabled, |mode| mode.evaluate(ctx))
    }

    /// Convert `ctx.value` (raw input) into the canonical typed value.
    ///
    /// Arrays and records are containers; their value passes through
    /// unchanged and the engine parses their elements.
    pub fn parse(&self, ctx: &ValidationContext<'_>, config: &Config) -> Parsed {
        match &self.kind {
            FieldKind::Text => text::parse(ctx, config),
            FieldKind::Number => number::parse(ctx, config),
            FieldKind::Boolean => boolean::parse(ctx),
            FieldKind::Date(spec) => date::parse(spec.kind, ctx, config),
            FieldKind::DatePart(_) => date::parse_part(ctx, config),
            FieldKind::File => file::parse(ctx),
            FieldKind::Array(_) | FieldKind::Record(_) => match ctx.value {
                None | Some(Value::Null) => Parsed::absent(),
                Some(value) => Parsed::value(value.clone()),
            },
        }
    }

    /// Run the validator chain on `ctx.value` and stop at the first result.
    pub fn check(
        &self,
        ctx: &ValidationContext<'_>,
        patterns: &PatternCache,
    ) -> Option<ValidationResult> {
        self.checks.iter().find_map(|check| check.run(ctx, patterns))
    }
}

#[cfg(test)]
mod tests {
    use formwork_document::path::FieldPath;
    use formwork_document::store::DataStore;

    use super::*;
    use crate::env::{Dependencies, Environment};
    use crate::pattern::Category;

    fn check(desc: impl Into<FieldDescriptor>, value: Option<Value>) -> Option<ValidationResult> {
        let desc = desc.into();
        let store = DataStore::default();
        let path = FieldPath::parse("field");
        let env = Environment::default();
        let deps = Dependencies::default();
        let ctx = ValidationContext {
            label: "Field",
            path: &path,
            value: value.as_ref(),
            store: &store,
            deps: &deps,
            env: &env,
        };
        desc.check(&ctx, &PatternCache::new())
    }

    #[test]
    fn test_precedence_is_fixed_regardless_of_builder_order() {
        let desc = string()
            .validate(|_| Some(ValidationResult::error("custom", "custom")))
            .pattern(Category::Numeric)
            .max_length(2)
            .required(true);
        // "abc" violates max length, pattern and the custom validator
        let result = check(desc.clone(), Some("abc".into())).unwrap();
        assert_eq!(result.code, ResultCode::MaxLength);
        let result = check(desc.clone(), Some("ab".into())).unwrap();
        assert_eq!(result.code, ResultCode::Pattern);
        let result = check(desc.clone(), Some("12".into())).unwrap();
        assert_eq!(result.code.as_str(), "custom");
        let result = check(desc, None).unwrap();
        assert_eq!(result.code, ResultCode::Required);
    }

    #[test]
    fn test_custom_validators_run_in_declaration_order() {
        let desc = number()
            .validate(|_| None)
            .validate(|_| Some(ValidationResult::warning("second", "second")))
            .validate(|_| Some(ValidationResult::error("third", "third")));
        let result = check(desc, Some(1.into())).unwrap();
        assert_eq!(result.code.as_str(), "second");
        assert!(!result.is_error());
    }

    #[test]
    fn test_mode_defaults_to_enabled() {
        let desc: FieldDescriptor = boolean().into();
        let store = DataStore::default();
        let path = FieldPath::parse("flag");
        let env = Environment::default();
        let deps = Dependencies::default();
        let ctx = ValidationContext {
            label: "Flag",
            path: &path,
            value: None,
            store: &store,
            deps: &deps,
            env: &env,
        };
        assert_eq!(desc.mode(&ctx), FieldMode::Enabled);
        let hidden: FieldDescriptor = boolean().mode(FieldMode::Hidden).into();
        assert!(hidden.mode(&ctx).is_skipped());
    }
}

//! Individual checks of a descriptor's validator chain.

use formwork_document::value::Value;

use crate::constraint::Constraint;
use crate::context::ValidationContext;
use crate::descriptor::Validator;
use crate::descriptor::date::{PairOrder, PairRule};
use crate::message;
use crate::numeric::{decimal_places, format_number};
use crate::pattern::{Pattern, PatternCache};
use crate::result::{ResultCode, ValidationResult};

/// One link of a validator chain. Descriptors store these already sorted in
/// their fixed precedence order.
#[derive(Clone)]
pub(crate) enum Check {
    Required(Constraint<bool>),
    Length(Constraint<usize>),
    MinLength(Constraint<usize>),
    MaxLength(Constraint<usize>),
    Min(Constraint<f64>),
    Max(Constraint<f64>),
    Precision(Constraint<u32>),
    Pattern(Constraint<Pattern>),
    Source(Constraint<Vec<Value>>),
    Pair(Constraint<PairRule>),
    Accept(Constraint<Vec<String>>),
    MaxSize(Constraint<u64>),
    Custom(Validator),
}

impl core::fmt::Debug for Check {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Check::Required(c) => f.debug_tuple("Required").field(c).finish(),
            Check::Length(c) => f.debug_tuple("Length").field(c).finish(),
            Check::MinLength(c) => f.debug_tuple("MinLength").field(c).finish(),
            Check::MaxLength(c) => f.debug_tuple("MaxLength").field(c).finish(),
            Check::Min(c) => f.debug_tuple("Min").field(c).finish(),
            Check::Max(c) => f.debug_tuple("Max").field(c).finish(),
            Check::Precision(c) => f.debug_tuple("Precision").field(c).finish(),
            Check::Pattern(c) => f.debug_tuple("Pattern").field(c).finish(),
            Check::Source(c) => f.debug_tuple("Source").field(c).finish(),
            Check::Pair(c) => f.debug_tuple("Pair").field(c).finish(),
            Check::Accept(c) => f.debug_tuple("Accept").field(c).finish(),
            Check::MaxSize(c) => f.debug_tuple("MaxSize").field(c).finish(),
            Check::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Check {
    /// Run the check against `ctx.value`. Everything except `Required` and
    /// custom validators passes when the value is absent.
    pub(crate) fn run(
        &self,
        ctx: &ValidationContext<'_>,
        patterns: &PatternCache,
    ) -> Option<ValidationResult> {
        match self {
            Check::Required(c) => {
                let missing = ctx.value.is_none_or(Value::is_blank);
                (missing && c.evaluate(ctx))
                    .then(|| fail(c, ctx, ResultCode::Required, "validation.required", &[]))
            }
            Check::Custom(validator) => validator(ctx),
            _ => {
                let value = ctx.value.filter(|value| !value.is_null())?;
                self.run_present(ctx, value, patterns)
            }
        }
    }

    fn run_present(
        &self,
        ctx: &ValidationContext<'_>,
        value: &Value,
        patterns: &PatternCache,
    ) -> Option<ValidationResult> {
        let items = matches!(value, Value::Array(_));
        match self {
            Check::Length(c) => {
                let length = c.evaluate(ctx);
                let key = if items { "validation.items" } else { "validation.length" };
                (measure(value)? != length).then(|| {
                    fail(c, ctx, ResultCode::Length, key, &[("length", length.to_string())])
                })
            }
            Check::MinLength(c) => {
                let min = c.evaluate(ctx);
                let key = if items { "validation.minItems" } else { "validation.minLength" };
                (measure(value)? < min)
                    .then(|| fail(c, ctx, ResultCode::MinLength, key, &[("min", min.to_string())]))
            }
            Check::MaxLength(c) => {
                let max = c.evaluate(ctx);
                let key = if items { "validation.maxItems" } else { "validation.maxLength" };
                (measure(value)? > max)
                    .then(|| fail(c, ctx, ResultCode::MaxLength, key, &[("max", max.to_string())]))
            }
            Check::Min(c) => {
                let min = c.evaluate(ctx);
                (value.as_f64()? < min).then(|| {
                    fail(c, ctx, ResultCode::Min, "validation.min", &[("min", format_number(min))])
                })
            }
            Check::Max(c) => {
                let max = c.evaluate(ctx);
                (value.as_f64()? > max).then(|| {
                    fail(c, ctx, ResultCode::Max, "validation.max", &[("max", format_number(max))])
                })
            }
            Check::Precision(c) => {
                let precision = c.evaluate(ctx);
                (decimal_places(value.as_f64()?) > precision).then(|| {
                    fail(
                        c,
                        ctx,
                        ResultCode::Precision,
                        "validation.precision",
                        &[("precision", precision.to_string())],
                    )
                })
            }
            Check::Pattern(c) => {
                let pattern = c.evaluate(ctx);
                let text = value.as_str()?;
                (!patterns.is_match(&pattern, text))
                    .then(|| fail(c, ctx, ResultCode::Pattern, &pattern.message_key(), &[]))
            }
            Check::Source(c) => {
                let allowed = c.evaluate(ctx);
                let contained = |v: &Value| allowed.iter().any(|a| loose_eq(a, v));
                let ok = match value {
                    Value::Array(values) => values.iter().all(contained),
                    other => contained(other),
                };
                (!ok).then(|| fail(c, ctx, ResultCode::Source, "validation.source", &[]))
            }
            Check::Pair(c) => {
                let rule = c.evaluate(ctx);
                let this = value.as_datetime()?;
                let other = ctx.date(&rule.target)?;
                let ok = match rule.order {
                    PairOrder::Before => this < other || (rule.allow_equal && this == other),
                    PairOrder::After => this > other || (rule.allow_equal && this == other),
                };
                let key = match rule.order {
                    PairOrder::Before => "validation.pair.before",
                    PairOrder::After => "validation.pair.after",
                };
                (!ok).then(|| {
                    let target = rule.target_label(ctx.path);
                    fail(c, ctx, ResultCode::Pair, key, &[("target", target)])
                })
            }
            Check::Accept(c) => {
                let accepted = c.evaluate(ctx);
                let file = value.as_file()?;
                let ok = accepted.is_empty()
                    || accepted.iter().any(|accept| {
                        if accept.starts_with('.') {
                            file.extension()
                                .is_some_and(|ext| ext.eq_ignore_ascii_case(accept))
                        } else if let Some(major) = accept.strip_suffix("/*") {
                            file.content_type
                                .split_once('/')
                                .is_some_and(|(m, _)| m.eq_ignore_ascii_case(major))
                        } else {
                            file.content_type.eq_ignore_ascii_case(accept)
                        }
                    });
                (!ok).then(|| fail(c, ctx, ResultCode::Accept, "validation.accept", &[]))
            }
            Check::MaxSize(c) => {
                let max = c.evaluate(ctx);
                (value.as_file()?.size > max).then(|| {
                    let params = [("max", max.to_string())];
                    fail(c, ctx, ResultCode::MaxSize, "validation.maxSize", &params)
                })
            }
            Check::Required(_) | Check::Custom(_) => None,
        }
    }
}

fn fail<T: Clone>(
    constraint: &Constraint<T>,
    ctx: &ValidationContext<'_>,
    code: ResultCode,
    key: &str,
    params: &[(&str, String)],
) -> ValidationResult {
    let message = match constraint.custom_message() {
        Some(message) => message(ctx),
        None => message::render(ctx, key, params),
    };
    ValidationResult::error(code, message)
}

/// Characters of a text, elements of an array.
fn measure(value: &Value) -> Option<usize> {
    match value {
        Value::Text(text) => Some(text.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Equality that lets a submitted `"2"` match an allowed `2`.
fn loose_eq(allowed: &Value, value: &Value) -> bool {
    match (allowed, value) {
        (Value::Number(n), Value::Text(text)) | (Value::Text(text), Value::Number(n)) => {
            crate::numeric::parse_number(text) == Some(*n)
        }
        (a, b) => a == b,
    }
}

#[cfg(test)]
mod tests {
    use formwork_document::path::FieldPath;
    use formwork_document::store::DataStore;
    use formwork_document::value::FileValue;
    use serde_json::json;

    use super::*;
    use crate::env::{Dependencies, Environment};
    use crate::pattern::Category;

    fn run(check: Check, store: &DataStore, value: Option<Value>) -> Option<ValidationResult> {
        let path = FieldPath::parse("field");
        let env = Environment::default();
        let deps = Dependencies::default();
        let ctx = ValidationContext {
            label: "Field",
            path: &path,
            value: value.as_ref(),
            store,
            deps: &deps,
            env: &env,
        };
        check.run(&ctx, &PatternCache::new())
    }

    fn code(result: Option<ValidationResult>) -> Option<String> {
        result.map(|r| r.code.to_string())
    }

    #[test]
    fn test_required() {
        let store = DataStore::default();
        let result = run(Check::Required(true.into()), &store, None).unwrap();
        assert_eq!(result.code, ResultCode::Required);
        assert_eq!(result.message, "Field is required.");
        assert!(run(Check::Required(false.into()), &store, None).is_none());
        assert!(run(Check::Required(true.into()), &store, Some("x".into())).is_none());
        assert!(run(Check::Required(true.into()), &store, Some(Value::Bool(false))).is_some());
    }

    #[test]
    fn test_absent_value_skips_bounds() {
        let store = DataStore::default();
        assert!(run(Check::MinLength(3.into()), &store, None).is_none());
        assert!(run(Check::Min(1.0.into()), &store, Some(Value::Null)).is_none());
    }

    #[test]
    fn test_length_counts_characters_and_items() {
        let store = DataStore::default();
        assert!(run(Check::Length(3.into()), &store, Some("日本語".into())).is_none());
        let result = run(Check::MinLength(1.into()), &store, Some(Value::Array(vec![]))).unwrap();
        assert_eq!(result.code, ResultCode::MinLength);
        assert_eq!(result.message, "Field must have at least 1 items.");
        let result = run(Check::MaxLength(2.into()), &store, Some("abc".into())).unwrap();
        assert_eq!(result.message, "Field must be at most 2 characters.");
    }

    #[test]
    fn test_numeric_bounds_and_precision() {
        let store = DataStore::default();
        assert_eq!(
            code(run(Check::Min(10.0.into()), &store, Some(9.5.into()))),
            Some("min".into())
        );
        assert_eq!(
            code(run(Check::Max(10.0.into()), &store, Some(11.into()))),
            Some("max".into())
        );
        assert!(run(Check::Max(10.0.into()), &store, Some(10.into())).is_none());
        assert_eq!(
            code(run(Check::Precision(1.into()), &store, Some(1.25.into()))),
            Some("precision".into())
        );
    }

    #[test]
    fn test_pattern_category_message() {
        let store = DataStore::default();
        let check = Check::Pattern(Category::Email.into());
        let result = run(check, &store, Some("nope".into())).unwrap();
        assert_eq!(result.message, "Field must be a valid email address.");
    }

    #[test]
    fn test_source_membership() {
        let store = DataStore::default();
        let allowed = vec![Value::from("red"), Value::from(2)];
        let check = Check::Source(allowed.into());
        assert!(run(check.clone(), &store, Some("red".into())).is_none());
        assert!(run(check.clone(), &store, Some("2".into())).is_none());
        let both = Value::Array(vec!["red".into(), 2.into()]);
        assert!(run(check.clone(), &store, Some(both)).is_none());
        assert_eq!(code(run(check, &store, Some("blue".into()))), Some("source".into()));
    }

    #[test]
    fn test_accept_and_max_size() {
        let store = DataStore::default();
        let photo = Value::File(FileValue::new("me.JPG", "image/jpeg", vec![0; 10]));
        let accept = |list: &[&str]| {
            let list: Vec<String> = list.iter().map(|s| s.to_string()).collect();
            Check::Accept(list.into())
        };
        assert!(run(accept(&[".jpg"]), &store, Some(photo.clone())).is_none());
        assert!(run(accept(&["image/*"]), &store, Some(photo.clone())).is_none());
        assert!(run(accept(&["image/jpeg"]), &store, Some(photo.clone())).is_none());
        assert_eq!(
            code(run(accept(&["application/pdf", ".png"]), &store, Some(photo.clone()))),
            Some("accept".into())
        );
        assert_eq!(
            code(run(Check::MaxSize(9.into()), &store, Some(photo))),
            Some("maxSize".into())
        );
    }

    #[test]
    fn test_pair_reads_target_through_store() {
        let store = DataStore::new(Value::from(json!({"end": "2024-01-10"})));
        let start = Value::from(chrono::NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        let before = Check::Pair(PairRule::before("end").into());
        let result = run(before, &store, Some(start.clone())).unwrap();
        assert_eq!(result.code, ResultCode::Pair);
        assert_eq!(result.message, "Field must be before end.");
        assert!(run(Check::Pair(PairRule::after("end").into()), &store, Some(start)).is_none());
    }

    #[test]
    fn test_custom_message_wins() {
        let store = DataStore::default();
        let required = Constraint::from(true).message(|ctx| format!("Please fill {}", ctx.name()));
        let check = Check::Required(required);
        assert_eq!(run(check, &store, None).unwrap().message, "Please fill field");
    }
}

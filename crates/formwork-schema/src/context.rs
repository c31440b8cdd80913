//! Validation context handed to parsers, constraints and validators.

use chrono::NaiveDateTime;
use formwork_document::path::FieldPath;
use formwork_document::store::DataStore;
use formwork_document::value::Value;

use crate::descriptor::date::parse_instant;
use crate::env::{Dependencies, Environment};
use crate::numeric;

/// Everything a dynamic constraint may look at while one field is evaluated.
///
/// `store` holds the whole submission; fields already visited by the engine
/// carry their typed value there, fields not visited yet still hold raw input.
#[derive(Clone, Copy, Debug)]
pub struct ValidationContext<'a> {
    pub label: &'a str,
    pub path: &'a FieldPath,
    pub value: Option<&'a Value>,
    pub store: &'a DataStore,
    pub deps: &'a Dependencies,
    pub env: &'a Environment,
}

impl<'a> ValidationContext<'a> {
    /// Absolute path of the field being evaluated, e.g. `items[2].qty`.
    pub fn name(&self) -> String {
        self.path.to_string()
    }

    /// Read another field. Relative expressions (`.end`, `..total`) are
    /// resolved against the current field's path.
    pub fn get(&self, expr: &str) -> Option<&'a Value> {
        self.store.get_path(&self.path.resolve(expr))
    }

    /// Read another field as a number, parsing raw text if needed.
    pub fn number(&self, expr: &str) -> Option<f64> {
        match self.get(expr)? {
            Value::Number(n) => Some(*n),
            Value::Text(text) => numeric::parse_number(text),
            _ => None,
        }
    }

    pub fn text(&self, expr: &str) -> Option<&'a str> {
        self.get(expr)?.as_str()
    }

    pub fn flag(&self, expr: &str) -> bool {
        match self.get(expr) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Text(text)) => crate::descriptor::boolean::parse_flag(text) == Some(true),
            _ => false,
        }
    }

    /// Read another field as a point in time, parsing raw text if needed.
    /// Dates are taken at midnight and months at their first day.
    pub fn date(&self, expr: &str) -> Option<NaiveDateTime> {
        let value = self.get(expr)?;
        value
            .as_datetime()
            .or_else(|| value.as_str().and_then(parse_instant))
    }

    pub fn translate(&self, key: &str) -> String {
        self.env.translate(key)
    }

    /// The same context evaluating a different value.
    pub fn with_value(self, value: Option<&'a Value>) -> Self {
        Self { value, ..self }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_relative_lookup_inside_array_item() {
        let store = DataStore::new(Value::from(json!({
            "periods": [
                {"start": "2024-01-01", "end": "2024-02-01"},
                {"start": "2024-03-01", "end": "1,200"},
            ]
        })));
        let path = FieldPath::parse("periods[1].start");
        let env = Environment::default();
        let deps = Dependencies::default();
        let ctx = ValidationContext {
            label: "Start",
            path: &path,
            value: None,
            store: &store,
            deps: &deps,
            env: &env,
        };

        assert_eq!(ctx.name(), "periods[1].start");
        assert_eq!(ctx.text(".end"), Some("1,200"));
        assert_eq!(ctx.number(".end"), Some(1200.0));
        assert_eq!(
            ctx.date("periods[0].end"),
            NaiveDate::from_ymd_opt(2024, 2, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
        );
        assert_eq!(ctx.date(".missing"), None);
    }

    #[test]
    fn test_flag_reads_form_strings() {
        let store = DataStore::new(Value::from(json!({"agree": "on", "news": "off"})));
        let path = FieldPath::parse("agree");
        let env = Environment::default();
        let deps = Dependencies::default();
        let ctx = ValidationContext {
            label: "Agree",
            path: &path,
            value: None,
            store: &store,
            deps: &deps,
            env: &env,
        };
        assert!(ctx.flag("agree"));
        assert!(!ctx.flag("news"));
        assert!(!ctx.flag("missing"));
    }
}

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::trace;

use crate::prelude_internal::*;
use crate::store::write_path;

#[derive(Debug, PartialEq, thiserror::Error, Clone)]
pub enum InputError {
    #[error("Invalid form key '{key}': {source}")]
    InvalidKey { key: String, source: StoreError },
}

/// How a key submitted more than once is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatedKeys {
    /// All values become the elements of an array
    #[default]
    Array,
    /// The last submitted value wins
    Last,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InputConfig {
    pub repeated_keys: RepeatedKeys,
}

/// One value of a form multi-map.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(FileValue),
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<FileValue> for FormValue {
    fn from(file: FileValue) -> Self {
        FormValue::File(file)
    }
}

impl From<FormValue> for Value {
    fn from(value: FormValue) -> Self {
        match value {
            FormValue::Text(text) => Value::Text(text),
            FormValue::File(file) if file.is_empty_part() => Value::Null,
            FormValue::File(file) => Value::File(file),
        }
    }
}

/// A key/value(s) multi-map as produced by a submitted HTML form.
///
/// Keys are path expressions (`user.name`, `items[0].qty`). A key ending in
/// `[]` always produces an array, even when submitted once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormData {
    entries: Vec<(String, FormValue)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<FormValue>) -> &mut Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a FormValue> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Translate the multi-map into a value tree.
    pub fn into_value(self, config: &InputConfig) -> Result<Value, InputError> {
        let mut grouped: IndexMap<String, (bool, Vec<Value>)> = IndexMap::new();
        for (key, value) in self.entries {
            let (key, forced_array) = match key.strip_suffix("[]") {
                Some(stripped) => (stripped.to_string(), true),
                None => (key, false),
            };
            let slot = grouped.entry(key).or_default();
            slot.0 |= forced_array;
            slot.1.push(value.into());
        }

        let mut root = Value::empty_map();
        for (key, (forced_array, mut values)) in grouped {
            let value = if forced_array {
                Value::Array(values)
            } else if values.len() == 1 {
                values.remove(0)
            } else {
                match config.repeated_keys {
                    RepeatedKeys::Array => Value::Array(values),
                    RepeatedKeys::Last => values.pop().unwrap_or_default(),
                }
            };
            write_path(&mut root, &FieldPath::parse(&key), value)
                .map_err(|source| InputError::InvalidKey { key, source })?;
        }
        Ok(root)
    }
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A raw submission in either of its accepted shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// A form multi-map
    Form(FormData),
    /// A parsed JSON body
    Json(serde_json::Value),
    /// An already built value tree
    Value(Value),
}

impl RawInput {
    pub fn into_value(self, config: &InputConfig) -> Result<Value, InputError> {
        let value = match self {
            RawInput::Form(form) => {
                trace!(entries = form.len(), "translating form input");
                form.into_value(config)?
            }
            RawInput::Json(json) => Value::from(json),
            RawInput::Value(value) => value,
        };
        Ok(value)
    }
}

impl From<FormData> for RawInput {
    fn from(form: FormData) -> Self {
        RawInput::Form(form)
    }
}

impl From<serde_json::Value> for RawInput {
    fn from(json: serde_json::Value) -> Self {
        RawInput::Json(json)
    }
}

impl From<Value> for RawInput {
    fn from(value: Value) -> Self {
        RawInput::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn translate(form: FormData) -> serde_json::Value {
        form.into_value(&InputConfig::default()).unwrap().to_json()
    }

    #[test]
    fn test_dotted_keys_become_nested_maps() {
        let form: FormData = [("user.name", "Alice"), ("user.age", "30")]
            .into_iter()
            .collect();
        assert_eq!(
            translate(form),
            json!({"user": {"name": "Alice", "age": "30"}})
        );
    }

    #[test]
    fn test_repeated_keys_become_array() {
        let form: FormData = [("tag", "a"), ("tag", "b"), ("name", "x")]
            .into_iter()
            .collect();
        assert_eq!(translate(form), json!({"tag": ["a", "b"], "name": "x"}));
    }

    #[test]
    fn test_repeated_keys_last_wins() {
        let form: FormData = [("tag", "a"), ("tag", "b")].into_iter().collect();
        let config = InputConfig {
            repeated_keys: RepeatedKeys::Last,
        };
        assert_eq!(form.into_value(&config).unwrap().to_json(), json!({"tag": "b"}));
    }

    #[test]
    fn test_bracket_suffix_forces_array() {
        let form: FormData = [("tags[]", "only")].into_iter().collect();
        assert_eq!(translate(form), json!({"tags": ["only"]}));
    }

    #[test]
    fn test_indexed_keys_become_array_elements() {
        let form: FormData = [("items[1].qty", "2"), ("items[0].qty", "1")]
            .into_iter()
            .collect();
        assert_eq!(
            translate(form),
            json!({"items": [{"qty": "1"}, {"qty": "2"}]})
        );
    }

    #[test]
    fn test_empty_file_part_is_null() {
        let mut form = FormData::new();
        form.append("avatar", FileValue::new("", "application/octet-stream", vec![]));
        form.append("doc", FileValue::new("a.pdf", "application/pdf", vec![1]));
        let value = form.into_value(&InputConfig::default()).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("avatar"), Some(&Value::Null));
        assert!(matches!(map.get("doc"), Some(Value::File(_))));
    }

    #[test]
    fn test_conflicting_keys_are_rejected() {
        let form: FormData = [("a", "leaf"), ("a.b", "nested")].into_iter().collect();
        let err = form.into_value(&InputConfig::default()).unwrap_err();
        assert!(matches!(err, InputError::InvalidKey { key, .. } if key == "a.b"));
    }

    #[test]
    fn test_oversized_index_is_rejected() {
        let form: FormData = [("items[18446744073709551615]", "x"), ("items[0]", "y")]
            .into_iter()
            .collect();
        let err = form.into_value(&InputConfig::default()).unwrap_err();
        let InputError::InvalidKey { key, source } = err;
        assert_eq!(key, "items[18446744073709551615]");
        assert_eq!(source.kind, StoreErrorKind::IndexOutOfRange { index: usize::MAX });

        let form: FormData = [("items[4000000000]", "x")].into_iter().collect();
        assert!(form.into_value(&InputConfig::default()).is_err());
    }

    #[test]
    fn test_json_input_passes_through() {
        let raw = RawInput::from(json!({"age": 5}));
        let value = raw.into_value(&InputConfig::default()).unwrap();
        assert_eq!(value.to_json(), json!({"age": 5.0}));
    }
}

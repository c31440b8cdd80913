//! Validation engine
//!
//! # Architecture
//!
//! A pass owns a fresh [`DataStore`] seeded from the raw input and walks the
//! schema depth-first:
//! - leaves are parsed, their typed value is written back to the store, then
//!   the validator chain runs until its first result
//! - arrays validate each element at `name[i]`, then the array-level checks
//! - records validate each child at `name.child`, then their own checks
//! - date fields with parts validate each part at `name.part`
//!
//! Field failures become [`ValidationResult`]s keyed by path. Only structural
//! mismatches between schema and input are returned as [`EngineError`].

mod compound;
mod date;
mod primitive;
mod record;
mod state;

pub use state::ValidationState;

use formwork_document::Map;
use formwork_document::input::RawInput;
use formwork_document::path::FieldPath;
use formwork_document::store::DataStore;
use formwork_document::value::Value;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::Config;
use crate::context::ValidationContext;
use crate::descriptor::{DateSpec, FieldDescriptor, FieldKind};
use crate::env::{Dependencies, Environment};
use crate::error::EngineError;
use crate::pattern::PatternCache;
use crate::result::ValidationResult;
use crate::schema::Schema;

// =============================================================================
// Public API
// =============================================================================

/// Typed output and per-field results of one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub has_error: bool,
    /// Mirrors the schema with typed leaves; absent fields are omitted
    pub data: Value,
    pub results: IndexMap<String, ValidationResult>,
}

impl ValidationOutcome {
    pub fn result(&self, path: &str) -> Option<&ValidationResult> {
        self.results.get(path)
    }

    pub fn errors(&self) -> impl Iterator<Item = (&String, &ValidationResult)> {
        self.results.iter().filter(|(_, result)| result.is_error())
    }

    /// `{hasError, data, results}` with results as `{type, code, message}`.
    pub fn to_json(&self) -> serde_json::Value {
        let results: serde_json::Map<String, serde_json::Value> = self
            .results
            .iter()
            .map(|(path, result)| (path.clone(), result.to_json()))
            .collect();
        serde_json::json!({
            "hasError": self.has_error,
            "data": self.data.to_json(),
            "results": results,
        })
    }
}

/// Owns the configuration and the compiled pattern cache. Reuse one engine
/// across passes.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: Config,
    patterns: PatternCache,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            patterns: PatternCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate `input` against `schema`.
    ///
    /// The pass is pure: identical arguments produce identical outcomes.
    pub fn parse_with_schema(
        &self,
        schema: &Schema,
        input: impl Into<RawInput>,
        env: &Environment,
        deps: &Dependencies,
    ) -> Result<ValidationOutcome, EngineError> {
        let root = match input.into().into_value(&self.config.input)? {
            Value::Null => Value::empty_map(),
            root @ Value::Map(_) => root,
            other => {
                return Err(EngineError::UnexpectedShape {
                    expected: "map",
                    found: other.kind(),
                    path: FieldPath::root(),
                });
            }
        };
        debug!(fields = schema.len(), is_server = env.is_server, "validating submission");

        let mut walker = Walker {
            engine: self,
            env,
            deps,
            store: DataStore::new(root),
            state: ValidationState::new(),
        };
        let mut data = Map::default();
        for (name, field) in schema.iter() {
            let path = FieldPath::root().child_key(name);
            if let Some(value) = walker.field(name, field, &path)? {
                data.insert(name.clone(), value);
            }
        }

        let ValidationState { results, has_error } = walker.state;
        debug!(results = results.len(), has_error, "validation finished");
        Ok(ValidationOutcome {
            has_error,
            data: Value::Map(data),
            results,
        })
    }
}

/// [`Engine::parse_with_schema`] with the default configuration.
pub fn parse_with_schema(
    schema: &Schema,
    input: impl Into<RawInput>,
    env: &Environment,
    deps: &Dependencies,
) -> Result<ValidationOutcome, EngineError> {
    Engine::default().parse_with_schema(schema, input, env, deps)
}

// =============================================================================
// Walker
// =============================================================================

struct Walker<'e> {
    engine: &'e Engine,
    env: &'e Environment,
    deps: &'e Dependencies,
    store: DataStore,
    state: ValidationState,
}

impl<'e> Walker<'e> {
    fn context<'a>(
        &'a self,
        label: &'a str,
        path: &'a FieldPath,
        value: Option<&'a Value>,
    ) -> ValidationContext<'a> {
        ValidationContext {
            label,
            path,
            value,
            store: &self.store,
            deps: self.deps,
            env: self.env,
        }
    }

    /// Validate one field of any kind. `name` is the label fallback.
    fn field(
        &mut self,
        name: &str,
        field: &FieldDescriptor,
        path: &FieldPath,
    ) -> Result<Option<Value>, EngineError> {
        let label = field.label().unwrap_or(name);
        let mode = field.mode(&self.context(label, path, self.store.get_path(path)));
        if mode.is_skipped() {
            trace!(path = %path, ?mode, "skipping field");
            return Ok(None);
        }
        trace!(path = %path, kind = field.kind().name(), "validating field");

        match field.kind() {
            FieldKind::Array(item) => self.array(label, field, item, path),
            FieldKind::Record(children) => self.record(label, field, children, path),
            FieldKind::Date(DateSpec {
                kind,
                parts: Some(parts),
            }) => self.date_with_parts(label, field, *kind, parts, path),
            _ => self.leaf(label, field, path),
        }
    }

    /// Run `field`'s validator chain on `value` and record its result.
    fn check(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        path: &FieldPath,
        value: Option<&Value>,
    ) {
        let result = field.check(&self.context(label, path, value), &self.engine.patterns);
        if let Some(result) = result {
            trace!(path = %path, code = %result.code, "field result");
            self.state.record(path, result);
        }
    }
}

//! Leaf fields: strings, numbers, booleans, dates, date parts and files.

use formwork_document::path::FieldPath;
use formwork_document::value::Value;

use super::Walker;
use crate::descriptor::{FieldDescriptor, Parsed};
use crate::error::EngineError;

impl Walker<'_> {
    pub(super) fn leaf(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        path: &FieldPath,
    ) -> Result<Option<Value>, EngineError> {
        let parsed = field.parse(
            &self.context(label, path, self.store.get_path(path)),
            &self.engine.config,
        );
        self.finish(label, field, path, parsed)
    }

    /// Record a parse failure, or write the typed value back and run the
    /// validator chain on it.
    pub(super) fn finish(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        path: &FieldPath,
        parsed: Parsed,
    ) -> Result<Option<Value>, EngineError> {
        if let Some(result) = parsed.result {
            self.state.record(path, result);
            return Ok(None);
        }
        if let Some(value) = &parsed.value {
            self.store.try_set_path(path, value.clone())?;
        }
        self.check(label, field, path, parsed.value.as_ref());
        Ok(parsed.value)
    }
}

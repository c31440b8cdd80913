//! Date-family fields whose parts are addressable on their own.

use formwork_document::path::FieldPath;
use formwork_document::value::Value;
use indexmap::IndexMap;

use super::Walker;
use crate::descriptor::{DateKind, DatePart, FieldDescriptor, Parsed};
use crate::error::EngineError;

impl Walker<'_> {
    /// A mapping of parts (`birth.year`, `birth.month`, ...) is validated part
    /// by part and composed; a composite value is parsed and its extracted
    /// parts are checked against the part descriptors. A failing part skips
    /// the composite chain.
    pub(super) fn date_with_parts(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        kind: DateKind,
        parts: &IndexMap<DatePart, FieldDescriptor>,
        path: &FieldPath,
    ) -> Result<Option<Value>, EngineError> {
        if matches!(self.store.get_path(path), Some(Value::Map(_))) {
            return self.compose_parts(label, field, kind, parts, path);
        }

        let parsed = field.parse(
            &self.context(label, path, self.store.get_path(path)),
            &self.engine.config,
        );
        if let Some(value) = &parsed.value {
            let mut failed = false;
            for (part, descriptor) in parts {
                let Some(n) = part.extract(value) else {
                    continue;
                };
                let part_path = path.child_key(part.as_str());
                let part_label = part_label(label, descriptor, *part);
                self.check(&part_label, descriptor, &part_path, Some(&Value::Number(n)));
                failed |= self.state.has_error_at(&part_path);
            }
            if failed {
                return Ok(parsed.value);
            }
        }
        self.finish(label, field, path, parsed)
    }

    fn compose_parts(
        &mut self,
        label: &str,
        field: &FieldDescriptor,
        kind: DateKind,
        parts: &IndexMap<DatePart, FieldDescriptor>,
        path: &FieldPath,
    ) -> Result<Option<Value>, EngineError> {
        let mut numbers = IndexMap::new();
        let mut failed = false;
        for (part, descriptor) in parts {
            let part_path = path.child_key(part.as_str());
            let part_label = part_label(label, descriptor, *part);
            if let Some(Value::Number(n)) = self.field(&part_label, descriptor, &part_path)? {
                numbers.insert(*part, n);
            }
            failed |= self.state.has_error_at(&part_path);
        }
        if failed {
            return Ok(kind.compose(&numbers));
        }

        let parsed = if numbers.is_empty() {
            Parsed::absent()
        } else {
            match kind.compose(&numbers) {
                Some(value) => Parsed::value(value),
                None => Parsed::invalid_as(&self.context(label, path, None), kind.invalid_code()),
            }
        };
        self.finish(label, field, path, parsed)
    }
}

fn part_label(parent: &str, descriptor: &FieldDescriptor, part: DatePart) -> String {
    descriptor
        .label()
        .map_or_else(|| format!("{parent} ({})", part.as_str()), str::to_string)
}

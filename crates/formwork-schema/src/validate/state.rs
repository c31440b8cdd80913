use formwork_document::path::FieldPath;
use indexmap::IndexMap;

use crate::result::ValidationResult;

/// Results accumulated during one validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationState {
    /// One result per path, in the order fields were visited
    pub results: IndexMap<String, ValidationResult>,
    /// Whether any recorded result has error severity
    pub has_error: bool,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &FieldPath, result: ValidationResult) {
        self.has_error |= result.is_error();
        self.results.insert(path.to_string(), result);
    }

    pub fn has_error_at(&self, path: &FieldPath) -> bool {
        self.results
            .get(&path.to_string())
            .is_some_and(ValidationResult::is_error)
    }
}

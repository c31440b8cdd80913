use formwork_document::input::InputError;
use formwork_document::path::FieldPath;
use formwork_document::store::StoreError;
use formwork_document::value::ValueKind;

/// Failures that mean the schema and the submission do not fit together
/// structurally. Ordinary field failures are results, never errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Expected {expected} at {path}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: ValueKind,
        path: FieldPath,
    },
}

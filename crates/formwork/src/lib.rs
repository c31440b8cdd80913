//! Schema-driven validation and path-addressable data binding.
//!
//! - [`document`]: path expressions, the value tree and the dirty-checked
//!   [`DataStore`](document::store::DataStore)
//! - [`schema`]: field descriptors, the [`Schema`](schema::Schema) and the
//!   validation [`Engine`](schema::Engine)

pub use formwork_document as document;
pub use formwork_schema as schema;

pub use formwork_document::Map;

pub mod prelude {
    pub use formwork_document::input::{FormData, FormValue, RawInput};
    pub use formwork_document::path::{FieldPath, PathSegment};
    pub use formwork_document::store::{ChangeSet, DataStore, StoreError};
    pub use formwork_document::value::{FileValue, Value, YearMonth};
    pub use formwork_schema::{
        Category, Config, Constraint, DatePart, Dependencies, Engine, EngineError, Environment,
        FieldDescriptor, FieldMode, PairRule, ResultCode, Schema, Severity, ValidationContext,
        ValidationOutcome, ValidationResult, array, boolean, date, date_part, datetime, file,
        month, number, parse_with_schema, record, string,
    };
}

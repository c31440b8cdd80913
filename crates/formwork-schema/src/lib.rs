//! Schema-driven validation for formwork.
//!
//! A [`Schema`] maps field names to [`FieldDescriptor`]s. The [`Engine`] walks
//! the schema over a raw submission and produces typed output plus one
//! [`ValidationResult`] per failing field:
//!
//! ```ignore
//! let schema = Schema::new()
//!     .field("age", number())
//!     .field("name", string().required(Constraint::dynamic(|ctx| {
//!         ctx.number("age").is_some_and(|age| age > 10.0)
//!     })));
//! let env = Environment::default();
//! let outcome = parse_with_schema(&schema, json!({"age": 15}), &env, &Dependencies::default())?;
//! assert!(outcome.has_error);
//! ```

mod check;
pub mod config;
pub mod constraint;
pub mod context;
pub mod descriptor;
pub mod env;
mod error;
pub mod message;
pub mod numeric;
pub mod pattern;
pub mod result;
pub mod schema;
pub mod validate;

pub use config::{Config, ConfigError};
pub use constraint::{Constraint, MessageFn};
pub use context::ValidationContext;
pub use descriptor::{
    DatePart, FieldDescriptor, FieldKind, FieldMode, PairRule, Parsed, Validator, array, boolean,
    date, date_part, datetime, file, month, number, record, string,
};
pub use env::{Dependencies, Environment};
pub use error::EngineError;
pub use pattern::{Category, Pattern};
pub use result::{ResultCode, Severity, ValidationResult};
pub use schema::{RefEdge, Schema};
pub use validate::{Engine, ValidationOutcome, parse_with_schema};

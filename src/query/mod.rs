//! Query layer
//!
//! A small typed field-execution layer over the resolvers: a static schema,
//! selection sets parsed from YAML or JSON, an executor with field-level
//! error boundaries and null propagation, and [`QueryEngine`] which ties a
//! query to one request context and a deadline.

mod engine;
mod executor;
pub mod response;
pub mod schema;
pub mod selection;

pub use engine::QueryEngine;
pub use executor::execute;
pub use response::{FieldError, PathSegment, Response, ResponsePath};
pub use schema::{validate, FieldDef, FieldKind, ObjectType};
pub use selection::{Field, SelectionSet};

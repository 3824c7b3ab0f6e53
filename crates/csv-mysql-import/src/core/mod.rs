//! Core data model for the import pipeline.
//!
//! This module provides the foundational types used throughout the system:
//!
//! - [`record`]: Parsed input rows with parse-time typed cells
//! - [`rules`]: The declarative field constraint vocabulary
//! - [`value`]: Statement values ([`SqlValue`]) and the row projection
//! - [`schema`]: Field-to-column mapping for the target table
//!
//! Everything here is store-agnostic and side-effect free; the store and
//! strategy layers consume these types without extending them.

pub mod record;
pub mod rules;
pub mod schema;
pub mod value;

// Re-export commonly used types for convenience
pub use record::{FieldValue, Record};
pub use rules::{Constraint, FieldRules, RuleSet};
pub use schema::ColumnMap;
pub use value::{Literal, SqlRow, SqlValue};

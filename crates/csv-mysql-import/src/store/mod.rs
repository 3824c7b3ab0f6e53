//! Store connection abstraction.
//!
//! The pipeline and strategies talk to the target store through the narrow
//! [`StoreConnection`] trait: execute one parameterized statement, then
//! optionally read the non-fatal diagnostics the store attached to it. The
//! MySQL implementation lives in [`mysql`]; [`diagnostics`] holds the
//! format-dependent parsing that recovers row positions from diagnostic
//! text.

use async_trait::async_trait;

use crate::core::value::Literal;
use crate::error::Result;

pub mod diagnostics;
pub mod mysql;

#[cfg(test)]
pub mod testing;

pub use diagnostics::failed_row_indexes;
pub use mysql::MysqlStore;

/// One non-fatal diagnostic emitted by the store for a statement.
///
/// Shape follows MySQL's `SHOW WARNINGS` rows: a severity level, a numeric
/// code, and a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity label as reported by the store (`Warning`, `Note`, ...).
    pub level: String,
    /// Store-specific condition code.
    pub code: u32,
    /// Message text; for row-level conditions it names the 1-based row
    /// position within the statement.
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic row.
    pub fn new(level: impl Into<String>, code: u32, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            code,
            message: message.into(),
        }
    }
}

/// A live connection to the target store.
///
/// One connection serves one pipeline run, sequentially. `diagnostics`
/// reports on the most recently executed statement, so callers must read it
/// before issuing the next statement; implementations are not required to
/// retain anything older.
#[async_trait]
pub trait StoreConnection: Send {
    /// Execute a statement with named parameter bindings, returning the
    /// affected-row count.
    async fn execute(&mut self, statement: &str, params: Vec<(String, Literal)>) -> Result<u64>;

    /// Non-fatal diagnostics emitted by the most recent statement.
    async fn diagnostics(&mut self) -> Result<Vec<Diagnostic>>;
}

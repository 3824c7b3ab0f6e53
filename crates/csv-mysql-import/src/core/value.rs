//! SQL value types for statement construction.
//!
//! Column values are a tagged union: a [`Literal`] is bound as a statement
//! parameter, while an [`SqlValue::Expr`] is spliced verbatim into the
//! statement text (store-side expressions such as `NOW()`). Builders match
//! on the two cases exhaustively; nothing downstream inspects types at
//! runtime.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::core::record::{FieldValue, Record};

/// A literal scalar bound as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// SQL NULL.
    Null,

    /// Text value.
    Text(String),

    /// 64-bit signed integer.
    Int(i64),

    /// Decimal value with exact precision.
    Decimal(Decimal),

    /// Timestamp without timezone.
    DateTime(NaiveDateTime),
}

/// A column value destined for a statement: bound literal or raw expression.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Bound as a named parameter.
    Literal(Literal),

    /// Emitted verbatim in the statement text. Never bound, never escaped;
    /// only code-declared expressions belong here.
    Expr(String),
}

impl SqlValue {
    /// SQL NULL literal.
    #[must_use]
    pub fn null() -> Self {
        SqlValue::Literal(Literal::Null)
    }

    /// Text literal.
    pub fn text(s: impl Into<String>) -> Self {
        SqlValue::Literal(Literal::Text(s.into()))
    }

    /// Integer literal.
    #[must_use]
    pub fn int(v: i64) -> Self {
        SqlValue::Literal(Literal::Int(v))
    }

    /// Decimal literal.
    #[must_use]
    pub fn decimal(v: Decimal) -> Self {
        SqlValue::Literal(Literal::Decimal(v))
    }

    /// Timestamp literal.
    #[must_use]
    pub fn datetime(v: NaiveDateTime) -> Self {
        SqlValue::Literal(Literal::DateTime(v))
    }

    /// Raw store-side expression, e.g. `NOW()`.
    pub fn expr(sql: impl Into<String>) -> Self {
        SqlValue::Expr(sql.into())
    }

    /// Check if this value is a raw expression.
    #[must_use]
    pub fn is_expr(&self) -> bool {
        matches!(self, SqlValue::Expr(_))
    }
}

impl From<Literal> for SqlValue {
    fn from(v: Literal) -> Self {
        SqlValue::Literal(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::text(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::int(v)
    }
}

impl From<Decimal> for SqlValue {
    fn from(v: Decimal) -> Self {
        SqlValue::decimal(v)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(v: NaiveDateTime) -> Self {
        SqlValue::datetime(v)
    }
}

/// The store-facing projection of one record.
///
/// Produced by the row transform just before statement construction, or by
/// [`SqlRow::from_record`] when no transform is configured. The original
/// [`Record`] is kept unmodified for failure reporting; a `SqlRow` never
/// flows back into results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlRow {
    values: Vec<(String, SqlValue)>,
}

impl SqlRow {
    /// Empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity projection: every cell becomes a bound literal.
    ///
    /// Numbers bind as decimals, everything else as its original text
    /// (empty cells bind as `""`, matching what the source file contained).
    pub fn from_record(record: &Record) -> Self {
        let values = record
            .fields()
            .map(|(name, cell)| {
                let value = match cell {
                    FieldValue::Number { value, .. } => SqlValue::decimal(*value),
                    other => SqlValue::text(other.raw()),
                };
                (name.to_string(), value)
            })
            .collect();
        Self { values }
    }

    /// Add or replace one field value, keeping insertion order.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.values.push((field, value)),
        }
        self
    }

    /// Look up a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Number of field values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

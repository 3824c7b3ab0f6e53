//! Parsed input records with typed cells.
//!
//! A [`Record`] is one logical row of the source file: the field names from
//! the header row, in source order, each mapped to a [`FieldValue`] cell.
//! Cells are classified once, when the row is parsed; validation and display
//! never re-interpret the text.

use std::str::FromStr;

use rust_decimal::Decimal;

/// A single cell value, classified at parse time.
///
/// The original text is retained in every non-empty variant so that length
/// and pattern checks, failure tables, and logs always show exactly what the
/// source file contained.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Empty cell (`""`).
    Empty,

    /// Cell whose exact text parses as a decimal number.
    Number {
        /// Original cell text.
        raw: String,
        /// Parsed value.
        value: Decimal,
    },

    /// Any other cell.
    Text(String),
}

impl FieldValue {
    /// Classify one raw cell.
    pub fn from_raw(raw: String) -> Self {
        if raw.is_empty() {
            return FieldValue::Empty;
        }
        match Decimal::from_str(&raw) {
            Ok(value) => FieldValue::Number { raw, value },
            Err(_) => FieldValue::Text(raw),
        }
    }

    /// The original cell text (`""` for an empty cell).
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            FieldValue::Empty => "",
            FieldValue::Number { raw, .. } => raw,
            FieldValue::Text(s) => s,
        }
    }

    /// The numeric value, if the cell parsed as a number.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Check if the cell is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }
}

/// One logical input row.
///
/// Field order follows the source header. Identity is positional: a record
/// is reported back (in failure lists and partition tables) as the same
/// object that was parsed, never a reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Build a record from already-classified cells.
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Build a record from raw header/cell pairs, classifying each cell.
    pub fn from_raw(pairs: Vec<(String, String)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(name, raw)| (name, FieldValue::from_raw(raw)))
                .collect(),
        }
    }

    /// Look up a cell by field name.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// The original text of a cell, or `""` when the field is absent.
    ///
    /// Used for table display, where absent and empty cells render the same.
    #[must_use]
    pub fn raw(&self, field: &str) -> &str {
        self.get(field).map(FieldValue::raw).unwrap_or("")
    }

    /// The numeric value of a cell, if present and numeric.
    #[must_use]
    pub fn decimal(&self, field: &str) -> Option<Decimal> {
        self.get(field).and_then(FieldValue::as_decimal)
    }

    /// Iterate fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields in this record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

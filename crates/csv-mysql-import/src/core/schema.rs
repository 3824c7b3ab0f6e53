//! Target schema mapping from record fields to store columns.

/// Ordered mapping from record field name to store column name.
///
/// Declaration order defines the column order of generated statements, so a
/// statement built from the same map is always byte-stable for a given row
/// set.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one field to a store column, keeping declaration order.
    pub fn map(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.entries.push((field.into(), column.into()));
        self
    }

    /// Iterate `(field, column)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(field, column)| (field.as_str(), column.as_str()))
    }

    /// Store column names in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, column)| column.as_str())
    }

    /// The store column a field maps to.
    #[must_use]
    pub fn column(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, column)| column.as_str())
    }

    /// Columns for the given update fields, in map declaration order.
    ///
    /// Fields not present in the map are ignored, mirroring an intersection:
    /// the caller declares which fields refresh on conflict, the map decides
    /// which of those actually exist.
    pub fn update_targets<'a>(&'a self, update_fields: &[String]) -> Vec<&'a str> {
        self.entries
            .iter()
            .filter(|(field, _)| update_fields.iter().any(|f| f == field))
            .map(|(_, column)| column.as_str())
            .collect()
    }

    /// Number of mapped fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

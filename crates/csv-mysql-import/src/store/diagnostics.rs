//! Row-position recovery from store diagnostics.
//!
//! MySQL reports per-row problems of a multi-row statement as warnings whose
//! message ends in `at row N`, with N 1-based within that statement. This is
//! the only place that knows the message format; everything else works with
//! the returned indexes. Diagnostics that do not carry a parseable position
//! (null-coercion notes, statement-level warnings) are logged and excluded,
//! never dropped silently.

use std::collections::BTreeSet;

use tracing::warn;

use crate::store::Diagnostic;

/// Extract the zero-based row indexes named by a statement's diagnostics.
///
/// A row that produced several diagnostics appears once. The returned set is
/// ordered, so failure reporting that walks it preserves row order.
pub fn failed_row_indexes(diagnostics: &[Diagnostic]) -> BTreeSet<usize> {
    let mut indexes = BTreeSet::new();
    for diagnostic in diagnostics {
        match parse_row_position(&diagnostic.message) {
            Some(position) => {
                indexes.insert(position - 1);
            }
            None => {
                warn!(
                    level = %diagnostic.level,
                    code = diagnostic.code,
                    message = %diagnostic.message,
                    "diagnostic without parseable row position, not attributed to any row"
                );
            }
        }
    }
    indexes
}

/// Parse the trailing `at row N` of a diagnostic message (N >= 1).
fn parse_row_position(message: &str) -> Option<usize> {
    let (_, suffix) = message.rsplit_once(" at row ")?;
    match suffix.trim().parse::<usize>() {
        Ok(position) if position >= 1 => Some(position),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(message: &str) -> Diagnostic {
        Diagnostic::new("Warning", 1366, message)
    }

    #[test]
    fn test_extracts_one_based_positions_as_zero_based() {
        let diagnostics = vec![
            warning("Incorrect integer value: 'many' for column 'intStock' at row 3"),
            warning("Out of range value for column 'decCost' at row 1"),
        ];
        let indexes = failed_row_indexes(&diagnostics);
        assert_eq!(indexes.into_iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_deduplicates_rows_with_multiple_diagnostics() {
        let diagnostics = vec![
            warning("Incorrect integer value: 'x' for column 'intStock' at row 2"),
            warning("Data truncated for column 'strProductCode' at row 2"),
        ];
        let indexes = failed_row_indexes(&diagnostics);
        assert_eq!(indexes.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_message_without_row_suffix_is_skipped() {
        let diagnostics = vec![
            Diagnostic::new("Warning", 1048, "Column 'strProductName' cannot be null"),
            warning("Incorrect integer value: 'x' for column 'intStock' at row 4"),
        ];
        let indexes = failed_row_indexes(&diagnostics);
        assert_eq!(indexes.into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_unparseable_suffix_is_skipped() {
        let diagnostics = vec![
            warning("something odd happened at row twelve"),
            warning("another message at row "),
            warning("zero is not a valid position at row 0"),
        ];
        assert!(failed_row_indexes(&diagnostics).is_empty());
    }

    #[test]
    fn test_last_occurrence_of_marker_wins() {
        // The phrase can occur inside quoted values; only the suffix counts.
        let diagnostics = vec![warning(
            "Incorrect value: 'fails at row 9' for column 'strProductDesc' at row 5",
        )];
        let indexes = failed_row_indexes(&diagnostics);
        assert_eq!(indexes.into_iter().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_empty_diagnostics() {
        assert!(failed_row_indexes(&[]).is_empty());
    }
}

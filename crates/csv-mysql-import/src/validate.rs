//! Record validation and partitioning.
//!
//! [`validate`] walks the input once, in order, and moves every record into
//! exactly one partition: invalid (missing field or failed constraint),
//! skipped (business filter), or valid. Moving rather than copying makes the
//! disjointness invariant structural: a record cannot end up in two
//! partitions because it is owned by one.

use tracing::debug;

use crate::core::record::Record;
use crate::core::rules::RuleSet;

/// Business filter deciding whether an otherwise-valid record is excluded
/// from persistence. `true` means skip.
pub type FilterPredicate = dyn Fn(&Record) -> bool + Send + Sync;

/// Outcome of validating one input sequence.
///
/// Invariant: `valid.len() + invalid.len() + skipped.len() == processed`,
/// and each partition preserves input order.
#[derive(Debug, Default)]
pub struct ValidationResult {
    processed: usize,
    valid: Vec<Record>,
    invalid: Vec<Record>,
    skipped: Vec<Record>,
}

impl ValidationResult {
    /// Total number of records examined.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Records that passed every rule and the filter.
    #[must_use]
    pub fn valid(&self) -> &[Record] {
        &self.valid
    }

    /// Records missing a declared field or failing a constraint.
    #[must_use]
    pub fn invalid(&self) -> &[Record] {
        &self.invalid
    }

    /// Rule-conforming records excluded by the business filter.
    #[must_use]
    pub fn skipped(&self) -> &[Record] {
        &self.skipped
    }
}

/// Classify every record against the rule set and filter.
///
/// Per record, fields are checked in rule declaration order and the first
/// missing field or failed constraint classifies it invalid without looking
/// further. Records that satisfy every rule are then either skipped (filter
/// returns `true`) or valid. Never fails; an empty input yields an empty
/// result with `processed == 0`.
pub fn validate(records: Vec<Record>, rules: &RuleSet, filter: &FilterPredicate) -> ValidationResult {
    let mut result = ValidationResult {
        processed: records.len(),
        ..Default::default()
    };

    'records: for (position, record) in records.into_iter().enumerate() {
        for field_rules in rules.iter() {
            let Some(cell) = record.get(field_rules.field()) else {
                debug!(position, field = field_rules.field(), "record invalid: field missing");
                result.invalid.push(record);
                continue 'records;
            };
            if let Some(constraint) = field_rules.first_violation(cell) {
                debug!(
                    position,
                    field = field_rules.field(),
                    ?constraint,
                    cell = cell.raw(),
                    "record invalid: constraint failed"
                );
                result.invalid.push(record);
                continue 'records;
            }
        }

        if filter(&record) {
            debug!(position, "record skipped by business filter");
            result.skipped.push(record);
        } else {
            result.valid.push(record);
        }
    }

    result
}

//! Product stock feed import profile.
//!
//! The concrete import this repository ships: field rules, the business skip
//! filter, the `tblProductData` column map, and the row transform adding the
//! computed columns. [`pipeline`] assembles them into a ready-to-run
//! [`ImportPipeline`]; callers only pick the strategy and batch size.

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::core::record::Record;
use crate::core::rules::{Constraint, RuleSet};
use crate::core::schema::ColumnMap;
use crate::core::value::{SqlRow, SqlValue};
use crate::pipeline::ImportPipeline;

/// Target store table.
pub const TABLE: &str = "tblProductData";

/// Source field names as they appear in the CSV header.
pub mod fields {
    pub const CODE: &str = "Product Code";
    pub const NAME: &str = "Product Name";
    pub const DESCRIPTION: &str = "Product Description";
    pub const STOCK: &str = "Stock";
    pub const COST: &str = "Cost in GBP";
    pub const DISCONTINUED: &str = "Discontinued";

    /// Computed at import time, not present in the source file.
    pub const ADDED: &str = "Added";
    /// Computed from [`DISCONTINUED`], not present in the source file.
    pub const DISCONTINUED_AT: &str = "Discontinued At";
}

/// Validation rules for one feed record.
pub fn rules() -> RuleSet {
    RuleSet::new()
        .field(
            fields::CODE,
            vec![Constraint::Required, Constraint::Length { min: 1, max: 10 }],
        )
        .field(
            fields::NAME,
            vec![Constraint::Required, Constraint::Length { min: 1, max: 50 }],
        )
        .field(
            fields::DESCRIPTION,
            vec![Constraint::Required, Constraint::Length { min: 1, max: 255 }],
        )
        .field(
            fields::STOCK,
            vec![
                Constraint::Required,
                Constraint::Numeric,
                Constraint::Pattern(whole_number()),
            ],
        )
        .field(
            fields::COST,
            vec![Constraint::Required, Constraint::Numeric, Constraint::Positive],
        )
        .field(fields::DISCONTINUED, vec![Constraint::one_of(["yes", ""])])
}

fn whole_number() -> regex::Regex {
    // Stock must be a non-negative whole number; the pattern is anchored so
    // signs and fractions fail even though they parse as numeric.
    regex::Regex::new(r"^[0-9]\d*$").expect("whole-number pattern is valid")
}

/// Business skip: items too cheap and low-stock to list, or too expensive.
///
/// Runs only on rule-conforming records, so cost and stock are numeric; a
/// record missing either value is kept.
pub fn should_skip(record: &Record) -> bool {
    let (Some(cost), Some(stock)) = (
        record.decimal(fields::COST),
        record.decimal(fields::STOCK),
    ) else {
        return false;
    };
    (cost < Decimal::from(5) && stock < Decimal::from(10)) || cost >= Decimal::from(1000)
}

/// Field-to-column mapping, in statement column order.
pub fn column_map() -> ColumnMap {
    ColumnMap::new()
        .map(fields::CODE, "strProductCode")
        .map(fields::NAME, "strProductName")
        .map(fields::DESCRIPTION, "strProductDesc")
        .map(fields::STOCK, "intStock")
        .map(fields::COST, "decCost")
        .map(fields::ADDED, "dtmAdded")
        .map(fields::DISCONTINUED_AT, "dtmDiscontinued")
}

/// Fields refreshed when the product code already exists.
///
/// Code and the added timestamp are write-once.
pub fn update_fields() -> [&'static str; 5] {
    [
        fields::NAME,
        fields::DESCRIPTION,
        fields::STOCK,
        fields::COST,
        fields::DISCONTINUED_AT,
    ]
}

/// Project one validated record to its store row.
///
/// Stock binds as an integer and cost as an exact decimal; either falls back
/// to its original text if the value cannot be represented, leaving the store
/// to interpret it. `dtmAdded` is the store's own clock via `NOW()`, and
/// `dtmDiscontinued` is the import timestamp when the feed says "yes",
/// otherwise NULL.
pub fn row_transform(record: &Record) -> SqlRow {
    let stock = match record.decimal(fields::STOCK).and_then(|v| v.to_i64()) {
        Some(stock) => SqlValue::int(stock),
        None => SqlValue::text(record.raw(fields::STOCK)),
    };
    let cost = match record.decimal(fields::COST) {
        Some(cost) => SqlValue::decimal(cost),
        None => SqlValue::text(record.raw(fields::COST)),
    };
    let discontinued_at = if record.raw(fields::DISCONTINUED) == "yes" {
        SqlValue::datetime(Utc::now().naive_utc())
    } else {
        SqlValue::null()
    };

    SqlRow::new()
        .set(fields::CODE, record.raw(fields::CODE))
        .set(fields::NAME, record.raw(fields::NAME))
        .set(fields::DESCRIPTION, record.raw(fields::DESCRIPTION))
        .set(fields::STOCK, stock)
        .set(fields::COST, cost)
        .set(fields::ADDED, SqlValue::expr("NOW()"))
        .set(fields::DISCONTINUED_AT, discontinued_at)
}

/// The fully configured product import pipeline.
///
/// Strategy and batch size keep their defaults; callers override them from
/// CLI or config.
pub fn pipeline() -> ImportPipeline {
    ImportPipeline::new(TABLE, rules(), column_map())
        .with_filter(should_skip)
        .with_update_fields(update_fields())
        .with_transform(row_transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Literal;
    use crate::store::testing::MockStore;
    use crate::validate::validate;

    fn record(
        code: &str,
        name: &str,
        desc: &str,
        stock: &str,
        cost: &str,
        discontinued: &str,
    ) -> Record {
        Record::from_raw(vec![
            (fields::CODE.to_string(), code.to_string()),
            (fields::NAME.to_string(), name.to_string()),
            (fields::DESCRIPTION.to_string(), desc.to_string()),
            (fields::STOCK.to_string(), stock.to_string()),
            (fields::COST.to_string(), cost.to_string()),
            (fields::DISCONTINUED.to_string(), discontinued.to_string()),
        ])
    }

    #[test]
    fn test_feed_scenarios() {
        let records = vec![
            // Empty code fails Required.
            record("", "Name", "Desc", "10", "399.99", ""),
            // Cheap and low stock.
            record("C1", "N", "D", "5", "3", "yes"),
            // Too expensive.
            record("C1", "N", "D", "5", "1001", "yes"),
            record("C1", "N", "D", "5", "30.44", ""),
        ];

        let result = validate(records, &rules(), &should_skip);

        assert_eq!(result.processed(), 4);
        assert_eq!(result.invalid().len(), 1);
        assert_eq!(result.skipped().len(), 2);
        assert_eq!(result.valid().len(), 1);
        assert_eq!(result.valid()[0].raw(fields::COST), "30.44");
    }

    #[test]
    fn test_rule_failures() {
        let invalid = [
            record("P0123456789", "N", "D", "1", "10", ""), // code too long
            record("C1", "", "D", "1", "10", ""),           // empty name
            record("C1", "N", "D", "-1", "10", ""),         // negative stock
            record("C1", "N", "D", "1.5", "10", ""),        // fractional stock
            record("C1", "N", "D", "many", "10", ""),       // non-numeric stock
            record("C1", "N", "D", "1", "free", ""),        // non-numeric cost
            record("C1", "N", "D", "1", "-10", ""),         // negative cost
            record("C1", "N", "D", "1", "10", "no"),        // bad choice
        ];
        for rec in invalid {
            let result = validate(vec![rec], &rules(), &should_skip);
            assert_eq!(result.invalid().len(), 1, "{:?}", result);
        }

        let ok = validate(
            vec![record("C1", "N", "D", "0", "10", "yes")],
            &rules(),
            &should_skip,
        );
        assert_eq!(ok.valid().len(), 1);
    }

    #[test]
    fn test_skip_boundaries() {
        // Both conditions must hold for the cheap-and-low branch.
        assert!(should_skip(&record("C1", "N", "D", "9", "4.99", "")));
        assert!(!should_skip(&record("C1", "N", "D", "10", "4.99", "")));
        assert!(!should_skip(&record("C1", "N", "D", "9", "5", "")));
        // The expensive branch is inclusive at 1000.
        assert!(should_skip(&record("C1", "N", "D", "500", "1000", "")));
        assert!(!should_skip(&record("C1", "N", "D", "500", "999.99", "")));
    }

    #[test]
    fn test_transform_types_and_computed_columns() {
        let row = row_transform(&record("P001", "TV", "32in colour", "10", "399.99", "yes"));

        assert_eq!(row.get(fields::CODE), Some(&SqlValue::text("P001")));
        assert_eq!(row.get(fields::STOCK), Some(&SqlValue::int(10)));
        assert_eq!(
            row.get(fields::COST),
            Some(&SqlValue::decimal(Decimal::new(39999, 2)))
        );
        assert_eq!(row.get(fields::ADDED), Some(&SqlValue::expr("NOW()")));
        assert!(matches!(
            row.get(fields::DISCONTINUED_AT),
            Some(SqlValue::Literal(Literal::DateTime(_)))
        ));
    }

    #[test]
    fn test_transform_not_discontinued_is_null() {
        let row = row_transform(&record("P001", "TV", "32in colour", "10", "399.99", ""));
        assert_eq!(row.get(fields::DISCONTINUED_AT), Some(&SqlValue::null()));
    }

    #[tokio::test]
    async fn test_pipeline_statement_shape() {
        let mut store = MockStore::new();
        let records = vec![record("P001", "TV", "32in colour", "10", "399.99", "")];

        pipeline().persist(&mut store, &records).await.unwrap();

        let executed = &store.executed()[0];
        assert!(executed.statement.starts_with("INSERT INTO `tblProductData`"));
        assert!(executed.statement.contains("`strProductCode`"));
        assert!(executed.statement.contains("NOW()"));
        assert!(executed
            .statement
            .contains("ON DUPLICATE KEY UPDATE `strProductName` = VALUES(`strProductName`)"));
        // Code is write-once.
        assert!(!executed.statement.contains("`strProductCode` = VALUES"));
        assert_eq!(
            executed.binding("intStock_r0"),
            Some(&Literal::Int(10))
        );
        assert_eq!(
            executed.binding("decCost_r0"),
            Some(&Literal::Decimal(Decimal::new(39999, 2)))
        );
    }
}

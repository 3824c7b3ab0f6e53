//! Per-record upsert strategy.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::record::Record;
use crate::error::Result;
use crate::store::StoreConnection;
use crate::strategy::{
    build_upsert_statement, project, ImportResult, InsertPlan, InsertStrategy, StrategyKind,
};

/// Writes one statement per record.
///
/// Maximal isolation at the cost of round trips: an execution failure is
/// caught, the original record is added to the failure list, and the run
/// continues with the next record.
#[derive(Debug, Clone, Default)]
pub struct EachInsert;

impl EachInsert {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InsertStrategy for EachInsert {
    fn can_insert(&self, kind: StrategyKind) -> bool {
        kind == StrategyKind::Each
    }

    async fn insert(
        &self,
        store: &mut dyn StoreConnection,
        plan: &InsertPlan<'_>,
        records: &[Record],
    ) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        for (position, record) in records.iter().enumerate() {
            let row = project(plan, record);
            let (statement, params) = build_upsert_statement(plan, std::slice::from_ref(&row))?;

            match store.execute(&statement, params).await {
                Ok(affected) => debug!(position, affected, "record upserted"),
                Err(err) => {
                    warn!(
                        position,
                        error = %err,
                        "store rejected record, reporting original and continuing"
                    );
                    result.record_failure(record.clone());
                }
            }
        }

        Ok(result)
    }
}

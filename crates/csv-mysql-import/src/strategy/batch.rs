//! Chunked multi-row upsert strategy.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::record::Record;
use crate::core::value::SqlRow;
use crate::error::Result;
use crate::store::{failed_row_indexes, StoreConnection};
use crate::strategy::{
    build_upsert_statement, project, ImportResult, InsertPlan, InsertStrategy, StrategyKind,
};

/// MySQL's hard limit on placeholders in one prepared statement.
const MYSQL_MAX_PLACEHOLDERS: usize = 65535;

/// Writes records in chunks of at most `batch_size`, one multi-row upsert
/// statement per chunk.
///
/// In permissive insert mode the store accepts the statement even when
/// individual rows are bad and reports those rows through diagnostics; the
/// strategy reads the diagnostics after every chunk and maps the named row
/// positions back to the original records. A statement-level failure
/// (connection lost, malformed statement) aborts the run: per-row outcomes
/// inside that chunk cannot be determined, so pretending to know them would
/// corrupt the report.
#[derive(Debug, Clone, Default)]
pub struct BatchInsert;

impl BatchInsert {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InsertStrategy for BatchInsert {
    fn can_insert(&self, kind: StrategyKind) -> bool {
        kind == StrategyKind::Batch
    }

    async fn insert(
        &self,
        store: &mut dyn StoreConnection,
        plan: &InsertPlan<'_>,
        records: &[Record],
    ) -> Result<ImportResult> {
        let mut result = ImportResult::default();
        if records.is_empty() {
            return Ok(result);
        }

        // Keep every chunk under the placeholder limit even for wide maps.
        let max_rows = (MYSQL_MAX_PLACEHOLDERS / plan.columns.len().max(1)).max(1);
        let chunk_size = plan.batch_size.clamp(1, max_rows);

        for (chunk_index, chunk) in records.chunks(chunk_size).enumerate() {
            let rows: Vec<SqlRow> = chunk.iter().map(|record| project(plan, record)).collect();
            let (statement, params) = build_upsert_statement(plan, &rows)?;

            debug!(
                chunk = chunk_index,
                rows = chunk.len(),
                bindings = params.len(),
                "executing chunk upsert"
            );
            let affected = store.execute(&statement, params).await?;
            debug!(chunk = chunk_index, affected, "chunk statement accepted");

            let diagnostics = store.diagnostics().await?;
            if diagnostics.is_empty() {
                continue;
            }

            for index in failed_row_indexes(&diagnostics) {
                match chunk.get(index) {
                    Some(record) => {
                        warn!(
                            chunk = chunk_index,
                            row = index,
                            "store rejected row, reporting original record"
                        );
                        result.record_failure(record.clone());
                    }
                    None => warn!(
                        chunk = chunk_index,
                        row = index,
                        rows = chunk.len(),
                        "diagnostic names a row outside the chunk, ignoring"
                    ),
                }
            }
        }

        Ok(result)
    }
}

//! Import pipeline - main workflow coordinator.
//!
//! [`ImportPipeline`] is the one component that knows the whole chain: it
//! reads the source file, partitions the records through the validator, and
//! hands the valid partition to the configured upsert strategy. Persistence
//! runs only when the caller supplies a store connection *and* at least one
//! record survived validation; a run that leaves zero valid records is the
//! distinct "source unusable" outcome, not an error.

use std::path::Path;

use tracing::{debug, info};

use crate::core::record::Record;
use crate::core::rules::RuleSet;
use crate::core::schema::ColumnMap;
use crate::core::value::SqlRow;
use crate::error::Result;
use crate::source::read_records;
use crate::store::StoreConnection;
use crate::strategy::{
    ImportResult, InsertPlan, InsertStrategy, StrategyImpl, StrategyKind, DEFAULT_BATCH_SIZE,
};
use crate::validate::{validate, ValidationResult};

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// How the input partitioned.
    pub validation: ValidationResult,

    /// Records the store rejected; `None` when persistence did not run
    /// (dry run, or nothing valid to persist).
    pub import: Option<ImportResult>,

    /// The strategy the run was configured with.
    pub strategy: StrategyKind,
}

impl RunReport {
    /// True when validation left nothing to persist.
    ///
    /// Covers both an all-invalid/all-skipped input and an empty source
    /// file; either way the file needs fixing before an import can do
    /// anything.
    #[must_use]
    pub fn source_unusable(&self) -> bool {
        self.validation.valid().is_empty()
    }

    /// Number of records the store rejected (0 when persistence did not run).
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.import.as_ref().map_or(0, ImportResult::failed_count)
    }
}

/// The configured import workflow for one target table.
///
/// Built once with the rule set and column map, then reused across runs.
/// Configuration is builder-style; defaults are the batched strategy with
/// chunks of [`DEFAULT_BATCH_SIZE`].
pub struct ImportPipeline {
    table: String,
    rules: RuleSet,
    columns: ColumnMap,
    filter: Box<dyn Fn(&Record) -> bool + Send + Sync>,
    update_fields: Vec<String>,
    transform: Option<Box<dyn Fn(&Record) -> SqlRow + Send + Sync>>,
    kind: StrategyKind,
    strategy: StrategyImpl,
    batch_size: usize,
}

impl ImportPipeline {
    /// Create a pipeline for one table with its rules and column map.
    ///
    /// Starts with no business filter, no row transform, no update fields
    /// (plain inserts), and the batched strategy.
    pub fn new(table: impl Into<String>, rules: RuleSet, columns: ColumnMap) -> Self {
        Self {
            table: table.into(),
            rules,
            columns,
            filter: Box::new(|_| false),
            update_fields: Vec::new(),
            transform: None,
            kind: StrategyKind::Batch,
            strategy: StrategyImpl::for_kind(StrategyKind::Batch),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the business filter; records it returns `true` for are skipped.
    pub fn with_filter(mut self, filter: impl Fn(&Record) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Declare the fields refreshed on conflict; everything else is
    /// write-once.
    pub fn with_update_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.update_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-record projection applied before statement construction.
    pub fn with_transform(
        mut self,
        transform: impl Fn(&Record) -> SqlRow + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Select the upsert strategy; the implementation is resolved here, not
    /// per run.
    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        self.kind = kind;
        self.strategy = StrategyImpl::for_kind(kind);
        self
    }

    /// Override the chunk size used by the batched strategy.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// The configured strategy kind.
    #[must_use]
    pub fn strategy(&self) -> StrategyKind {
        self.kind
    }

    /// Read and classify the source file without touching the store.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidationResult> {
        info!("Phase 1: Reading source file");
        let records = read_records(path)?;

        info!("Phase 2: Validating {} records", records.len());
        let validation = validate(records, &self.rules, self.filter.as_ref());
        debug!(
            processed = validation.processed(),
            valid = validation.valid().len(),
            invalid = validation.invalid().len(),
            skipped = validation.skipped().len(),
            "validation finished"
        );
        Ok(validation)
    }

    /// Upsert already-validated records through the configured strategy.
    pub async fn persist(
        &self,
        store: &mut dyn StoreConnection,
        records: &[Record],
    ) -> Result<ImportResult> {
        info!(
            "Phase 3: Upserting {} records into {} via \"{}\" strategy",
            records.len(),
            self.table,
            self.kind
        );
        let plan = InsertPlan {
            table: &self.table,
            columns: &self.columns,
            update_fields: &self.update_fields,
            transform: self.transform.as_deref(),
            batch_size: self.batch_size,
        };
        self.strategy.insert(store, &plan, records).await
    }

    /// Run the whole workflow: read, validate, and - when a store is given
    /// and the source is usable - persist.
    pub async fn run(
        &self,
        path: impl AsRef<Path>,
        store: Option<&mut dyn StoreConnection>,
    ) -> Result<RunReport> {
        let validation = self.validate_file(path)?;

        let import = match store {
            Some(store) if !validation.valid().is_empty() => {
                Some(self.persist(store, validation.valid()).await?)
            }
            Some(_) => {
                info!("no valid records, skipping persistence");
                None
            }
            None => None,
        };

        Ok(RunReport {
            validation,
            import,
            strategy: self.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::core::rules::Constraint;
    use crate::core::value::SqlValue;
    use crate::store::testing::MockStore;
    use crate::store::Diagnostic;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    fn pipeline() -> ImportPipeline {
        let rules = RuleSet::new()
            .field("Code", vec![Constraint::Required, Constraint::Length { min: 1, max: 10 }])
            .field("Stock", vec![Constraint::Required, Constraint::Numeric]);
        let columns = ColumnMap::new().map("Code", "strCode").map("Stock", "intStock");

        ImportPipeline::new("tblTest", rules, columns)
            .with_update_fields(["Stock"])
            .with_filter(|record: &Record| record.raw("Code").starts_with("SKIP"))
    }

    #[tokio::test]
    async fn test_dry_run_validates_without_store() {
        let file = csv_file("Code,Stock\nP1,10\n,5\nSKIP1,3\n");

        let report = pipeline().run(file.path(), None).await.unwrap();

        assert_eq!(report.validation.processed(), 3);
        assert_eq!(report.validation.valid().len(), 1);
        assert_eq!(report.validation.invalid().len(), 1);
        assert_eq!(report.validation.skipped().len(), 1);
        assert!(report.import.is_none());
        assert!(!report.source_unusable());
        assert_eq!(report.failed_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_run_persists_valid_records_only() {
        let file = csv_file("Code,Stock\nP1,10\n,5\nP2,7\nSKIP1,3\n");
        let mut store = MockStore::new();

        let report = pipeline()
            .run(file.path(), Some(&mut store))
            .await
            .unwrap();

        assert_eq!(report.validation.valid().len(), 2);
        assert_eq!(report.failed_count(), 0);
        // Default batch strategy: both valid records in one statement.
        assert_eq!(store.executed().len(), 1);
        let statement = &store.executed()[0].statement;
        assert!(statement.contains(":strCode_r0"));
        assert!(statement.contains(":strCode_r1"));
        assert!(statement.contains("ON DUPLICATE KEY UPDATE `intStock` = VALUES(`intStock`)"));
    }

    #[tokio::test]
    async fn test_unusable_source_skips_persistence_entirely() {
        let file = csv_file("Code,Stock\n,5\nSKIP1,3\n");
        let mut store = MockStore::new();

        let report = pipeline()
            .run(file.path(), Some(&mut store))
            .await
            .unwrap();

        assert!(report.source_unusable());
        assert!(report.import.is_none());
        assert!(store.executed().is_empty());
    }

    #[tokio::test]
    async fn test_empty_source_is_unusable() {
        let file = csv_file("Code,Stock\n");
        let report = pipeline().run(file.path(), None).await.unwrap();

        assert_eq!(report.validation.processed(), 0);
        assert!(report.source_unusable());
    }

    #[tokio::test]
    async fn test_each_strategy_issues_one_statement_per_record() {
        let file = csv_file("Code,Stock\nP1,10\nP2,7\n");
        let mut store = MockStore::new();

        let report = pipeline()
            .with_strategy(StrategyKind::Each)
            .run(file.path(), Some(&mut store))
            .await
            .unwrap();

        assert_eq!(report.strategy, StrategyKind::Each);
        assert_eq!(store.executed().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_and_each_persist_the_same_set() {
        let file = csv_file("Code,Stock\nP1,10\n,5\nP2,7\nSKIP1,3\nP3,1\n");

        let mut batch_store = MockStore::new();
        let batch_report = pipeline()
            .run(file.path(), Some(&mut batch_store))
            .await
            .unwrap();

        let mut each_store = MockStore::new();
        let each_report = pipeline()
            .with_strategy(StrategyKind::Each)
            .run(file.path(), Some(&mut each_store))
            .await
            .unwrap();

        assert_eq!(batch_report.failed_count(), 0);
        assert_eq!(each_report.failed_count(), 0);

        // Without soft failures the two strategies bind the same codes in the
        // same order; only the statement grouping differs.
        let bound_codes = |store: &MockStore| -> Vec<String> {
            store
                .executed()
                .iter()
                .flat_map(|executed| executed.params.iter())
                .filter(|(name, _)| name.starts_with("strCode"))
                .map(|(_, value)| format!("{value:?}"))
                .collect()
        };
        assert_eq!(bound_codes(&batch_store), bound_codes(&each_store));
        assert_eq!(batch_store.executed().len(), 1);
        assert_eq!(each_store.executed().len(), 3);
    }

    #[tokio::test]
    async fn test_batch_size_controls_chunking() {
        let file = csv_file("Code,Stock\nP1,1\nP2,2\nP3,3\n");
        let mut store = MockStore::new();

        pipeline()
            .with_batch_size(2)
            .run(file.path(), Some(&mut store))
            .await
            .unwrap();

        assert_eq!(store.executed().len(), 2);
    }

    #[tokio::test]
    async fn test_transform_feeds_statements_and_failures_keep_originals() {
        let file = csv_file("Code,Stock\nP1,10\nP2,7\n");
        let mut store = MockStore::new();
        store.script_diagnostics(vec![Diagnostic::new(
            "Warning",
            1366,
            "Incorrect integer value: 'x' for column 'intStock' at row 2",
        )]);

        let report = pipeline()
            .with_transform(|record: &Record| {
                SqlRow::from_record(record).set("Stock", SqlValue::expr("DEFAULT"))
            })
            .run(file.path(), Some(&mut store))
            .await
            .unwrap();

        // The expression was inlined for every row.
        assert!(store.executed()[0].statement.contains("DEFAULT"));
        // The diagnostic maps back to the untouched original record.
        assert_eq!(report.failed_count(), 1);
        let failed = report.import.as_ref().unwrap().failed();
        assert_eq!(failed[0].raw("Code"), "P2");
        assert_eq!(failed[0].raw("Stock"), "7");
    }

    #[tokio::test]
    async fn test_missing_file_propagates_before_validation() {
        let err = pipeline().run("missing.csv", None).await.unwrap_err();
        assert!(matches!(err, crate::error::ImportError::SourceNotFound(_)));
    }
}

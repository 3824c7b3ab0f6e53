//! Upsert strategy implementations.
//!
//! Two ways of writing validated records to the store:
//!
//! - [`batch`]: one multi-row statement per chunk, soft failures recovered
//!   from store diagnostics
//! - [`each`]: one statement per record, failures isolated per record
//!
//! Both construct the same upsert statement shape through
//! [`build_upsert_statement`]; they differ only in grouping and in how
//! failures are detected. Strategy selection is a closed enum
//! ([`StrategyImpl`]) dispatched statically rather than through a trait
//! object.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::record::Record;
use crate::core::schema::ColumnMap;
use crate::core::value::{Literal, SqlRow, SqlValue};
use crate::error::{ImportError, Result};
use crate::store::StoreConnection;

pub mod batch;
pub mod each;

pub use batch::BatchInsert;
pub use each::EachInsert;

/// Default number of records per multi-row statement.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Per-record projection applied just before statement construction.
///
/// Receives the validated record and returns the store-facing row, typically
/// adding computed columns (raw expressions, timestamps). The record itself
/// is never modified; failure reporting always uses the original.
pub type RowTransform = dyn Fn(&Record) -> SqlRow + Send + Sync;

/// Which upsert strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Chunked multi-row statements.
    Batch,
    /// One statement per record.
    Each,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Batch => write!(f, "batch"),
            StrategyKind::Each => write!(f, "each"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "batch" => Ok(StrategyKind::Batch),
            "each" => Ok(StrategyKind::Each),
            other => Err(ImportError::Config(format!(
                "Unknown strategy: '{}'. Supported strategies: batch, each",
                other
            ))),
        }
    }
}

/// Everything a strategy needs to write one record set.
#[derive(Clone, Copy)]
pub struct InsertPlan<'a> {
    /// Target table name.
    pub table: &'a str,
    /// Field-to-column mapping; declaration order is statement column order.
    pub columns: &'a ColumnMap,
    /// Fields whose columns are refreshed on conflict.
    pub update_fields: &'a [String],
    /// Optional projection applied per record before building statements.
    pub transform: Option<&'a RowTransform>,
    /// Maximum records per multi-row statement.
    pub batch_size: usize,
}

/// Records the store rejected, in original relative order.
///
/// A valid record absent from this list was persisted.
#[derive(Debug, Default)]
pub struct ImportResult {
    failed: Vec<Record>,
}

impl ImportResult {
    /// Rejected records with their original (pre-transform) field values.
    #[must_use]
    pub fn failed(&self) -> &[Record] {
        &self.failed
    }

    /// Number of rejected records.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub(crate) fn record_failure(&mut self, record: Record) {
        self.failed.push(record);
    }
}

/// Capability interface every upsert strategy implements.
#[async_trait]
pub trait InsertStrategy: Send + Sync {
    /// Whether this strategy serves the given kind tag.
    fn can_insert(&self, kind: StrategyKind) -> bool;

    /// Upsert `records` into the store following `plan`.
    ///
    /// Returns the records the store rejected. A statement-level failure the
    /// strategy cannot attribute to a single record propagates as an error.
    async fn insert(
        &self,
        store: &mut dyn StoreConnection,
        plan: &InsertPlan<'_>,
        records: &[Record],
    ) -> Result<ImportResult>;
}

/// Enum-based static dispatch over the two known strategies.
#[derive(Debug, Clone)]
pub enum StrategyImpl {
    Batch(BatchInsert),
    Each(EachInsert),
}

impl StrategyImpl {
    /// Resolve the strategy for a kind tag at construction time.
    #[must_use]
    pub fn for_kind(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Batch => StrategyImpl::Batch(BatchInsert::new()),
            StrategyKind::Each => StrategyImpl::Each(EachInsert::new()),
        }
    }
}

#[async_trait]
impl InsertStrategy for StrategyImpl {
    fn can_insert(&self, kind: StrategyKind) -> bool {
        match self {
            StrategyImpl::Batch(s) => s.can_insert(kind),
            StrategyImpl::Each(s) => s.can_insert(kind),
        }
    }

    async fn insert(
        &self,
        store: &mut dyn StoreConnection,
        plan: &InsertPlan<'_>,
        records: &[Record],
    ) -> Result<ImportResult> {
        match self {
            StrategyImpl::Batch(s) => s.insert(store, plan, records).await,
            StrategyImpl::Each(s) => s.insert(store, plan, records).await,
        }
    }
}

/// Project one record through the plan's transform (identity when absent).
pub(crate) fn project(plan: &InsertPlan<'_>, record: &Record) -> SqlRow {
    match plan.transform {
        Some(transform) => transform(record),
        None => SqlRow::from_record(record),
    }
}

/// Quote a MySQL identifier.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Placeholder name for one column of one row within a statement.
///
/// Unique across columns and rows of the chunk: the column part keeps
/// identifier characters of the store column name, the suffix is the row's
/// position within the chunk.
pub(crate) fn bind_name(column: &str, row_index: usize) -> String {
    let ident: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{ident}_r{row_index}")
}

/// Build one upsert statement for `rows`, already projected.
///
/// Literals become named placeholders registered in the returned binding
/// list; raw expressions are spliced into the tuple verbatim. With no update
/// fields the statement is a plain INSERT.
pub(crate) fn build_upsert_statement(
    plan: &InsertPlan<'_>,
    rows: &[SqlRow],
) -> Result<(String, Vec<(String, Literal)>)> {
    let column_list: Vec<String> = plan.columns.columns().map(quote_ident).collect();
    let mut params = Vec::new();
    let mut tuples = Vec::with_capacity(rows.len());

    for (row_index, row) in rows.iter().enumerate() {
        let mut slots = Vec::with_capacity(column_list.len());
        for (field, column) in plan.columns.iter() {
            let value = row.get(field).ok_or_else(|| {
                ImportError::statement(
                    plan.table,
                    format!("row projection is missing field '{}'", field),
                )
            })?;
            match value {
                SqlValue::Expr(sql) => slots.push(sql.clone()),
                SqlValue::Literal(literal) => {
                    let name = bind_name(column, row_index);
                    slots.push(format!(":{}", name));
                    params.push((name, literal.clone()));
                }
            }
        }
        tuples.push(format!("({})", slots.join(", ")));
    }

    let mut statement = format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_ident(plan.table),
        column_list.join(", "),
        tuples.join(", ")
    );

    let update_clause: Vec<String> = plan
        .columns
        .update_targets(plan.update_fields)
        .into_iter()
        .map(|column| {
            let quoted = quote_ident(column);
            format!("{} = VALUES({})", quoted, quoted)
        })
        .collect();
    if !update_clause.is_empty() {
        statement.push_str(" ON DUPLICATE KEY UPDATE ");
        statement.push_str(&update_clause.join(", "));
    }

    Ok((statement, params))
}

//! # csv-mysql-import
//!
//! CSV to MySQL product import library.
//!
//! This library provides the core functionality for importing tabular CSV
//! feeds into a MySQL store with support for:
//!
//! - **Declarative validation** partitioning records into valid, invalid,
//!   and skipped
//! - **Business filtering** separate from validity (skip, don't reject)
//! - **Batched upserts** via multi-row `INSERT ... ON DUPLICATE KEY UPDATE`
//! - **Soft-failure recovery** mapping store diagnostics back to the
//!   offending source records
//! - **Raw store expressions** for computed columns such as `NOW()`
//!
//! ## Example
//!
//! ```rust,no_run
//! use csv_mysql_import::{product, Config, MysqlStore};
//!
//! #[tokio::main]
//! async fn main() -> csv_mysql_import::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let mut store = MysqlStore::connect(&config.database).await?;
//!     let report = product::pipeline()
//!         .run("stock.csv", Some(&mut store))
//!         .await?;
//!     println!(
//!         "{} persisted, {} failed",
//!         report.validation.valid().len() - report.failed_count(),
//!         report.failed_count()
//!     );
//!     store.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod product;
pub mod source;
pub mod store;
pub mod strategy;
pub mod validate;

// Re-exports for convenient access
pub use config::{Config, DatabaseConfig, ImportConfig};
pub use crate::core::{
    ColumnMap, Constraint, FieldValue, Literal, Record, RuleSet, SqlRow, SqlValue,
};
pub use error::{ImportError, Result};
pub use pipeline::{ImportPipeline, RunReport};
pub use source::read_records;
pub use store::{Diagnostic, MysqlStore, StoreConnection};
pub use strategy::{ImportResult, InsertStrategy, StrategyKind, DEFAULT_BATCH_SIZE};
pub use validate::{validate, FilterPredicate, ValidationResult};

//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::strategy::{StrategyKind, DEFAULT_BATCH_SIZE};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target database connection (MySQL).
    pub database: DatabaseConfig,

    /// Import behavior configuration.
    #[serde(default)]
    pub import: ImportConfig,
}

/// Target database (MySQL) configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password (default: empty, for local development setups).
    #[serde(default)]
    pub password: String,
}

// Manual Debug so the password never reaches logs or error output.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Import behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Records per multi-row statement (default: 50).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Upsert strategy (default: batch).
    #[serde(default = "default_strategy")]
    pub strategy: StrategyKind,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            strategy: default_strategy(),
        }
    }
}

// Default value functions for serde
fn default_mysql_port() -> u16 {
    3306
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_strategy() -> StrategyKind {
    StrategyKind::Batch
}

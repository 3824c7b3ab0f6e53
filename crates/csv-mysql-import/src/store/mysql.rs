//! MySQL store connection using mysql_async.

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, OptsBuilder, Params};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::core::value::Literal;
use crate::error::{ImportError, Result};
use crate::store::{Diagnostic, StoreConnection};

/// A single MySQL connection serving one import run.
///
/// The session is switched to permissive insert mode at handshake so that a
/// bad row in a multi-row INSERT surfaces as a warning attached to the
/// statement instead of aborting it; warnings are then read back through
/// [`StoreConnection::diagnostics`].
pub struct MysqlStore {
    conn: Conn,
}

impl MysqlStore {
    /// Connect and verify the connection with a round trip.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let builder = OptsBuilder::default()
            .ip_or_hostname(&config.host)
            .tcp_port(config.port)
            .db_name(Some(&config.database))
            .user(Some(&config.user))
            .pass(Some(&config.password))
            // utf8mb4 for full Unicode support; empty sql_mode for
            // permissive inserts (per-row warnings, not statement errors)
            .init(vec!["SET NAMES utf8mb4", "SET SESSION sql_mode = ''"]);

        let mut conn = Conn::new(builder)
            .await
            .map_err(|e| ImportError::store(e, "connecting to MySQL"))?;

        conn.query_drop("SELECT 1")
            .await
            .map_err(|e| ImportError::store(e, "testing MySQL connection"))?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "connected to MySQL"
        );

        Ok(Self { conn })
    }

    /// Close the connection cleanly.
    pub async fn disconnect(self) -> Result<()> {
        self.conn
            .disconnect()
            .await
            .map_err(|e| ImportError::store(e, "closing MySQL connection"))
    }
}

#[async_trait]
impl StoreConnection for MysqlStore {
    async fn execute(&mut self, statement: &str, params: Vec<(String, Literal)>) -> Result<u64> {
        debug!(bindings = params.len(), "executing statement");

        if params.is_empty() {
            self.conn
                .query_drop(statement)
                .await
                .map_err(|e| ImportError::store(e, "executing statement"))?;
        } else {
            let pairs: Vec<(String, mysql_async::Value)> = params
                .into_iter()
                .map(|(name, value)| (name, literal_to_mysql(value)))
                .collect();
            self.conn
                .exec_drop(statement, Params::from(pairs))
                .await
                .map_err(|e| ImportError::store(e, "executing statement"))?;
        }

        Ok(self.conn.affected_rows())
    }

    async fn diagnostics(&mut self) -> Result<Vec<Diagnostic>> {
        let rows: Vec<(String, u32, String)> = self
            .conn
            .query("SHOW WARNINGS")
            .await
            .map_err(|e| ImportError::store(e, "reading statement diagnostics"))?;

        Ok(rows
            .into_iter()
            .map(|(level, code, message)| Diagnostic {
                level,
                code,
                message,
            })
            .collect())
    }
}

/// Convert a bound literal to the driver's value type.
fn literal_to_mysql(value: Literal) -> mysql_async::Value {
    match value {
        Literal::Null => mysql_async::Value::NULL,
        Literal::Text(s) => mysql_async::Value::from(s),
        Literal::Int(v) => mysql_async::Value::from(v),
        // DECIMAL goes over the wire as text to avoid precision loss
        Literal::Decimal(d) => mysql_async::Value::from(d.to_string()),
        Literal::DateTime(dt) => mysql_async::Value::from(dt),
    }
}

//! Scripted in-memory store double for strategy and pipeline tests.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::core::value::Literal;
use crate::error::{ImportError, Result};
use crate::store::{Diagnostic, StoreConnection};

/// One statement the mock saw, with its bindings.
#[derive(Debug, Clone)]
pub struct ExecutedStatement {
    pub statement: String,
    pub params: Vec<(String, Literal)>,
}

impl ExecutedStatement {
    /// The bound literal for a placeholder name, if any.
    pub fn binding(&self, name: &str) -> Option<&Literal> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }
}

/// Store double that records statements and replays scripted diagnostics.
///
/// Each successful `execute` consumes the next scripted diagnostics entry
/// (defaulting to none), which `diagnostics` then returns until the next
/// statement runs, mimicking the statement-scoped warning buffer of the
/// real store.
#[derive(Debug, Default)]
pub struct MockStore {
    executed: Vec<ExecutedStatement>,
    scripted: VecDeque<Vec<Diagnostic>>,
    current: Vec<Diagnostic>,
    fail_markers: Vec<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the diagnostics the next executed statement will report.
    pub fn script_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.scripted.push_back(diagnostics);
    }

    /// Make `execute` fail whenever a bound text value contains `marker`.
    pub fn fail_when_bound(&mut self, marker: impl Into<String>) {
        self.fail_markers.push(marker.into());
    }

    /// Statements executed so far, in order.
    pub fn executed(&self) -> &[ExecutedStatement] {
        &self.executed
    }
}

#[async_trait]
impl StoreConnection for MockStore {
    async fn execute(&mut self, statement: &str, params: Vec<(String, Literal)>) -> Result<u64> {
        for marker in &self.fail_markers {
            let hit = params.iter().any(|(_, value)| {
                matches!(value, Literal::Text(text) if text.contains(marker.as_str()))
            });
            if hit {
                return Err(ImportError::statement(
                    "mock",
                    format!("refused statement binding '{marker}'"),
                ));
            }
        }

        self.current = self.scripted.pop_front().unwrap_or_default();
        let rows = params.len().max(1) as u64;
        self.executed.push(ExecutedStatement {
            statement: statement.to_string(),
            params,
        });
        Ok(rows)
    }

    async fn diagnostics(&mut self) -> Result<Vec<Diagnostic>> {
        Ok(self.current.clone())
    }
}

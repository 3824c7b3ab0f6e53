//! Error types for the import library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for import operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source file does not exist
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Source file exists but cannot be parsed as CSV
    #[error("Malformed CSV source: {0}")]
    Csv(#[from] csv::Error),

    /// Store connection error with context about where it occurred
    #[error("Store error: {message}\n  Context: {context}")]
    Store { message: String, context: String },

    /// Statement execution failed for a specific table
    #[error("Statement failed for table {table}: {message}")]
    Statement { table: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ImportError {
    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        ImportError::Config(message.into())
    }

    /// Create a Store error with context about where it occurred
    pub fn store(err: impl std::fmt::Display, context: impl Into<String>) -> Self {
        ImportError::Store {
            message: err.to_string(),
            context: context.into(),
        }
    }

    /// Create a Statement error
    pub fn statement(table: impl Into<String>, message: impl Into<String>) -> Self {
        ImportError::Statement {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

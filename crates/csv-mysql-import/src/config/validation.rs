//! Configuration validation.

use super::Config;
use crate::error::{ImportError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.database.host.is_empty() {
        return Err(ImportError::Config("database.host is required".into()));
    }
    if config.database.database.is_empty() {
        return Err(ImportError::Config("database.database is required".into()));
    }
    if config.database.user.is_empty() {
        return Err(ImportError::Config("database.user is required".into()));
    }

    if config.import.batch_size == 0 {
        return Err(ImportError::Config(
            "import.batch_size must be at least 1".into(),
        ));
    }

    Ok(())
}

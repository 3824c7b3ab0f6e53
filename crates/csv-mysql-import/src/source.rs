//! CSV file reading.
//!
//! The header row defines the field names; every data row becomes one
//! [`Record`] with its cells classified at parse time. Headers are taken
//! verbatim (no trimming), and a data row whose cell count differs from the
//! header is a malformed source, not a short record.

use std::path::Path;

use tracing::{debug, info};

use crate::core::record::Record;
use crate::error::{ImportError, Result};

/// Read all records from a CSV file.
///
/// Fails with [`ImportError::SourceNotFound`] before touching the file when
/// the path does not exist, and with [`ImportError::Csv`] for unreadable or
/// ragged content. A file containing only a header row yields an empty
/// vector.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    debug!(fields = headers.len(), "parsed header row");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(Record::from_raw(
            headers
                .iter()
                .cloned()
                .zip(row.iter().map(str::to_string))
                .collect(),
        ));
    }

    info!(path = %path.display(), records = records.len(), "read CSV source");
    Ok(records)
}

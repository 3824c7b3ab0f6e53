//! Console and JSON presentation of run results.

use csv_mysql_import::{Record, Result};
use serde::Serialize;

/// Render records as an aligned plain-text table.
///
/// Headers are the rule-declared field names; cells show the original text
/// of each record's fields, so a human can fix the source file and re-run.
/// Absent fields render as empty cells.
pub fn record_table(headers: &[&str], records: &[Record]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for record in records {
        for (i, header) in headers.iter().enumerate() {
            widths[i] = widths[i].max(record.raw(header).chars().count());
        }
    }

    let mut separator = String::from("+");
    for width in &widths {
        separator.push_str(&"-".repeat(width + 2));
        separator.push('+');
    }

    let mut out = String::new();
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_row(headers.iter().copied(), &widths));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for record in records {
        let cells = headers.iter().map(|header| record.raw(header));
        out.push_str(&format_row(cells, &widths));
        out.push('\n');
    }
    out.push_str(&separator);
    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths) {
        line.push_str(&format!(" {:<width$} |", cell, width = width));
    }
    line
}

/// Machine-readable summary of one run, printed with `--output-json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub file: String,
    pub strategy: String,
    pub executed: bool,
    pub rows_processed: usize,
    pub valid_rows: usize,
    pub incorrect_rows: usize,
    pub skipped_rows: usize,
    /// Present only when persistence ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_rows: Option<usize>,
    pub duration_seconds: f64,
}

impl RunSummary {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// src/core/ingest/tabular.rs
//
// Header-aware delimited table parsing. Lead columns are searched by name
// before falling back to the first column that is numeric throughout.

use super::coerce_token;
use crate::error::{EkgError, Result};
use log::debug;

/// Column names recognized as the signal lead, in priority order.
const COLUMN_PRIORITY: [&str; 3] = ["value", "lead_i", "lead_ii"];

pub fn parse(payload: &[u8]) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(payload))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(payload);

    let headers = reader
        .headers()
        .map_err(|e| EkgError::Parse(format!("unreadable table header: {e}")))?
        .clone();
    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| EkgError::Parse(format!("malformed table row: {e}")))?;

    if records.is_empty() {
        return Err(EkgError::Parse("table has no data rows".into()));
    }

    for name in COLUMN_PRIORITY {
        if let Some(idx) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
            return column_values(&records, idx).ok_or_else(|| {
                EkgError::Parse(format!("column '{name}' contains non-numeric values"))
            });
        }
    }

    for idx in 0..headers.len() {
        if let Some(values) = column_values(&records, idx) {
            debug!(
                "no named lead column; using first numeric column '{}'",
                headers.get(idx).unwrap_or("")
            );
            return Ok(values);
        }
    }

    Err(EkgError::Parse(
        "no numeric column found; expected one of value, lead_i, lead_ii or an all-numeric column"
            .into(),
    ))
}

/// All values of column `idx`, or `None` if any row is missing the field or
/// holds a non-numeric value.
fn column_values(records: &[csv::StringRecord], idx: usize) -> Option<Vec<f64>> {
    records
        .iter()
        .map(|record| record.get(idx).and_then(coerce_token))
        .collect()
}

/// Tab-delimited tables are recognized by a tab in the header line;
/// everything else parses as comma-separated.
fn sniff_delimiter(payload: &[u8]) -> u8 {
    let first_line = payload.split(|&b| b == b'\n').next().unwrap_or(payload);
    if first_line.contains(&b'\t') {
        b'\t'
    } else {
        b','
    }
}

// src/core/ingest/structured.rs
//
// JSON uploads: either a mapping holding the series under a known key, or a
// bare list of samples.

use super::coerce_token;
use crate::error::{EkgError, Result};
use log::debug;
use serde_json::Value;

/// Mapping keys recognized as the signal series, in priority order.
const KEY_PRIORITY: [&str; 6] = ["values", "data", "ekg", "signal", "lead_i", "lead_ii"];

pub fn parse(payload: &[u8]) -> Result<Vec<f64>> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| EkgError::Parse(format!("invalid JSON upload: {e}")))?;

    match value {
        Value::Array(items) => coerce_series(&items)
            .ok_or_else(|| EkgError::Parse("list upload contains non-numeric entries".into())),
        Value::Object(map) => {
            for key in KEY_PRIORITY {
                if let Some(v) = map.get(key) {
                    let items = v.as_array().ok_or_else(|| {
                        EkgError::Parse(format!("key '{key}' does not hold a list"))
                    })?;
                    return coerce_series(items).ok_or_else(|| {
                        EkgError::Parse(format!("key '{key}' contains non-numeric entries"))
                    });
                }
            }
            // Fall back to the first entry holding a non-empty numeric list
            // (document order; serde_json preserves it).
            for (key, v) in &map {
                if let Some(items) = v.as_array() {
                    if !items.is_empty() {
                        if let Some(series) = coerce_series(items) {
                            debug!("no named series key; falling back to '{key}'");
                            return Ok(series);
                        }
                    }
                }
            }
            Err(EkgError::Parse(
                "no usable series key; expected one of values, data, ekg, signal, lead_i, lead_ii \
                 or an entry holding a numeric list"
                    .into(),
            ))
        }
        _ => Err(EkgError::Parse(
            "JSON upload must be an object or a list of numbers".into(),
        )),
    }
}

fn coerce_series(items: &[Value]) -> Option<Vec<f64>> {
    items.iter().map(coerce_entry).collect()
}

/// Numbers, or numeric strings; upload tooling is sloppy about quoting.
fn coerce_entry(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => coerce_token(s),
        _ => None,
    }
}

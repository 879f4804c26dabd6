//! Upload decoding into a flat numeric sample sequence.
//!
//! The supported encodings form a closed set of strategies dispatched on the
//! declared format hint (file extension or content type). Parsing is a pure
//! function of the payload bytes; nothing is consumed irreversibly.

mod delimited;
mod structured;
mod tabular;

use crate::error::{EkgError, Result};
use serde::Serialize;
use std::path::Path;

/// Resolved upload encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    /// Delimited table with a header row (CSV/TSV).
    Csv,
    /// Structured object or bare list (JSON).
    Json,
    /// Raw separated numeric text.
    Text,
}

impl UploadFormat {
    /// Resolve a format hint: a file extension (with or without the leading
    /// dot) or a MIME content type.
    pub fn from_hint(hint: &str) -> Result<Self> {
        let h = hint.trim().trim_start_matches('.').to_ascii_lowercase();
        match h.as_str() {
            "csv" | "tsv" | "text/csv" | "application/csv" => Ok(UploadFormat::Csv),
            "json" | "application/json" => Ok(UploadFormat::Json),
            "txt" | "dat" | "text/plain" => Ok(UploadFormat::Text),
            _ => Err(EkgError::Parse(format!(
                "unsupported format '{hint}'; supported formats: csv, tsv, json, txt, dat"
            ))),
        }
    }

    /// Resolve from a file path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                EkgError::Parse(format!(
                    "no file extension on '{}'; supported formats: csv, tsv, json, txt, dat",
                    path.display()
                ))
            })?;
        Self::from_hint(ext)
    }

    pub fn name(&self) -> &'static str {
        match self {
            UploadFormat::Csv => "csv",
            UploadFormat::Json => "json",
            UploadFormat::Text => "text",
        }
    }
}

/// Decode an upload into samples using the strategy for `format`.
pub fn parse(payload: &[u8], format: UploadFormat) -> Result<Vec<f64>> {
    match format {
        UploadFormat::Csv => tabular::parse(payload),
        UploadFormat::Json => structured::parse(payload),
        UploadFormat::Text => delimited::parse(payload),
    }
}

/// Shared numeric coercion: finite floats only. NaN and infinities are
/// rejected here so the filter chain never sees them.
pub(crate) fn coerce_token(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

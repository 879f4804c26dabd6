// src/core/ingest/delimited.rs
//
// Raw separated numeric text. The separator is not declared, so candidates
// are tried in a fixed order and the first one producing a plausible sample
// count wins.

use super::coerce_token;
use crate::error::{EkgError, Result};
use log::debug;

/// A candidate must yield more than this many numeric tokens to be accepted.
/// Guards against a false-positive separator choice on short or malformed
/// input.
const MIN_TOKENS: usize = 100;

/// Candidate separators, in priority order.
const SEPARATORS: [char; 4] = ['\n', ',', ' ', '\t'];

pub fn parse(payload: &[u8]) -> Result<Vec<f64>> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| EkgError::Parse("text upload is not valid UTF-8".into()))?;

    for sep in SEPARATORS {
        let values = split_numeric(text, sep);
        if values.len() > MIN_TOKENS {
            debug!("separator {:?} yielded {} samples", sep, values.len());
            return Ok(values);
        }
    }

    Err(EkgError::Parse(format!(
        "could not detect a separator yielding more than {MIN_TOKENS} numeric samples \
         (tried newline, comma, space, tab)"
    )))
}

/// Tokens under `sep` that parse as finite floats; empty and unparseable
/// tokens are dropped.
fn split_numeric(text: &str, sep: char) -> Vec<f64> {
    text.split(sep).filter_map(coerce_token).collect()
}

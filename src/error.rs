//! Tagged error taxonomy for the screening pipeline.
//!
//! Every pipeline stage returns one of these variants rather than a partial
//! result. The hosting transport maps client-class errors to 4xx-style
//! responses and everything else to 5xx; the core stays transport-agnostic.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EkgError {
    /// Upload could not be decoded into a numeric sample sequence.
    #[error("parse error: {0}")]
    Parse(String),

    /// Input decoded but fails a pipeline precondition (too short, bad
    /// threshold, empty window batch, window/model length mismatch).
    #[error("validation error: {0}")]
    Validation(String),

    /// The filter chain failed on degenerate input.
    #[error("conditioning error: {0}")]
    Conditioning(String),

    /// The reconstruction model artifact is missing or unreadable, or the
    /// model violated its shape contract.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
}

impl EkgError {
    /// Whether the failure is attributable to the caller's input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EkgError::ModelUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, EkgError>;

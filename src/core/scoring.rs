// src/core/scoring.rs
//
// Reconstruction-error scoring protocol: each window through the model,
// mean-squared error per window, arithmetic mean across windows.

use crate::core::model::Reconstructor;
use crate::error::{EkgError, Result};
use serde::Serialize;

/// Per-window and aggregate reconstruction error for one signal.
#[derive(Debug, Clone, Serialize)]
pub struct ReconstructionScore {
    /// MSE between each input window and its reconstruction.
    pub per_window: Vec<f64>,
    /// Arithmetic mean of the per-window errors, the thresholded scalar.
    /// Always the mean, never the median or max.
    pub mean_error: f64,
}

/// Score a window batch against the reconstruction model.
pub fn score_windows(
    model: &dyn Reconstructor,
    batch: &[Vec<f64>],
) -> Result<ReconstructionScore> {
    if batch.is_empty() {
        return Err(EkgError::Validation(
            "signal too short to form any windows".into(),
        ));
    }
    let expected = model.input_len();
    if let Some(window) = batch.iter().find(|w| w.len() != expected) {
        return Err(EkgError::Validation(format!(
            "window length {} does not match model input length {expected}",
            window.len()
        )));
    }

    let reconstructed = model.reconstruct(batch)?;
    if reconstructed.len() != batch.len() {
        return Err(EkgError::ModelUnavailable(format!(
            "model returned {} windows for a batch of {}",
            reconstructed.len(),
            batch.len()
        )));
    }

    let mut per_window = Vec::with_capacity(batch.len());
    for (input, output) in batch.iter().zip(&reconstructed) {
        if output.len() != input.len() {
            return Err(EkgError::ModelUnavailable(format!(
                "model changed window length {} to {}",
                input.len(),
                output.len()
            )));
        }
        let mse = input
            .iter()
            .zip(output)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            / input.len() as f64;
        per_window.push(mse);
    }

    let mean_error = per_window.iter().sum::<f64>() / per_window.len() as f64;
    Ok(ReconstructionScore {
        per_window,
        mean_error,
    })
}

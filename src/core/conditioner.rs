// src/core/conditioner.rs
//
// Deterministic conditioning chain applied before scoring. The stage order
// is fixed: the filters assume the canonical rate, and standardization must
// see fully filtered amplitude statistics.

use crate::config::{PipelineConfig, STD_EPSILON};
use crate::core::dsp::{bandpass_filter, notch_filter, resample, stats};
use crate::error::Result;

/// Conditioned signal, retained in two parallel variants.
///
/// Both derive from the same notch+bandpass output; standardization is the
/// only divergence. The unstandardized variant feeds feature extraction, the
/// standardized one feeds windowing and the model.
#[derive(Debug, Clone)]
pub struct ConditionedSignal {
    /// Filtered, physically scaled amplitudes (feature path).
    pub filtered: Vec<f64>,
    /// Filtered, zero-mean/unit-variance amplitudes (model path).
    pub standardized: Vec<f64>,
    /// Canonical rate both variants are sampled at (Hz).
    pub rate: f64,
}

/// Run the full conditioning chain: resample to the canonical rate, notch
/// out powerline interference, bandpass to the physiological EKG band, then
/// branch into the filtered and standardized variants.
pub fn condition(
    samples: &[f64],
    input_rate: f64,
    cfg: &PipelineConfig,
) -> Result<ConditionedSignal> {
    let resampled = resample(samples, input_rate, cfg.target_rate);
    let notched = notch_filter(&resampled, cfg.target_rate, cfg.notch_freq, cfg.notch_q)?;
    let filtered = bandpass_filter(
        &notched,
        cfg.target_rate,
        cfg.band_low,
        cfg.band_high,
        cfg.band_order,
    )?;
    let standardized = standardize(&filtered);
    Ok(ConditionedSignal {
        filtered,
        standardized,
        rate: cfg.target_rate,
    })
}

/// Zero-mean, unit-variance scaling with an epsilon floor on the divisor, so
/// a constant trace maps to zeros instead of dividing by zero.
pub fn standardize(x: &[f64]) -> Vec<f64> {
    let m = stats::mean(x);
    let s = stats::std_dev(x) + STD_EPSILON;
    x.iter().map(|v| (v - m) / s).collect()
}

// src/core/features.rs
//
// Hand-crafted amplitude and rhythm features over the filtered,
// unstandardized signal. These back the hybrid overrides: cheap, explainable
// checks for failure modes the autoencoder was not trained to penalize.

use crate::config::{PipelineConfig, STD_EPSILON};
use crate::core::dsp::stats;
use serde::Serialize;

/// Shortest signal (in seconds) the rhythm feature will evaluate.
const MIN_RHYTHM_SECONDS: f64 = 0.6;

/// Amplitude dispersion and rhythm periodicity of one conditioned signal.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSet {
    /// Standard deviation of the filtered amplitude.
    pub amp_std: f64,
    /// Peak-to-peak range of the filtered amplitude.
    pub amp_ptp: f64,
    /// Median absolute deviation of the filtered amplitude.
    pub amp_mad: f64,
    /// Maximum normalized autocorrelation within the heart-rate lag band.
    pub ac_peak: f64,
}

/// Compute the feature set from the filtered (unstandardized) signal.
pub fn extract(filtered: &[f64], rate: f64, cfg: &PipelineConfig) -> FeatureSet {
    FeatureSet {
        amp_std: stats::std_dev(filtered),
        amp_ptp: stats::peak_to_peak(filtered),
        amp_mad: stats::median_abs_deviation(filtered),
        ac_peak: autocorr_peak(filtered, rate, cfg.bpm_low, cfg.bpm_high),
    }
}

/// Maximum normalized autocorrelation within the lag band covering
/// `[bpm_low, bpm_high]`.
///
/// The signal is zero-mean/unit-variance normalized internally for this
/// computation only; it deliberately does not reuse the conditioner's
/// standardized variant, keeping the feature numerically independent of the
/// model input path. Returns 0.0 for signals shorter than ~0.6 s, for a
/// degenerate lag band, and for flat traces with no energy.
pub fn autocorr_peak(x: &[f64], rate: f64, bpm_low: f64, bpm_high: f64) -> f64 {
    if x.len() < (MIN_RHYTHM_SECONDS * rate) as usize {
        return 0.0;
    }

    // Fastest plausible beat maps to the shortest lag.
    let lag_lo = (60.0 / bpm_high * rate).round() as usize;
    let lag_hi = (60.0 / bpm_low * rate).round() as usize;
    if lag_hi <= lag_lo + 1 || lag_hi >= x.len() {
        return 0.0;
    }

    let m = stats::mean(x);
    let s = stats::std_dev(x) + STD_EPSILON;
    let normalized: Vec<f64> = x.iter().map(|v| (v - m) / s).collect();

    let ac = stats::autocorrelation(&normalized, lag_hi);
    ac[lag_lo..=lag_hi]
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max)
}

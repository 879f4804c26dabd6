//! Pipeline configuration and calibration bounds.

mod calibration;

pub use calibration::{Calibration, CalibrationCache};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Epsilon floor added to standard deviations before division so a flat
/// trace standardizes to zeros instead of raising a division error.
pub const STD_EPSILON: f64 = 1e-8;

/// DSP and decision parameters for the screening pipeline.
///
/// The defaults mirror the preprocessing the bundled autoencoder was trained
/// against; changing window or filter parameters requires a matching model
/// artifact and a recalibrated threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Canonical sample rate every signal is resampled to (Hz).
    pub target_rate: f64,
    /// Powerline notch center frequency (Hz).
    pub notch_freq: f64,
    /// Notch quality factor.
    pub notch_q: f64,
    /// Bandpass lower cutoff (Hz).
    pub band_low: f64,
    /// Bandpass upper cutoff (Hz).
    pub band_high: f64,
    /// Bandpass order per edge, realized as cascaded biquad sections.
    pub band_order: usize,
    /// Window length in seconds.
    pub win_sec: f64,
    /// Window step in seconds.
    pub step_sec: f64,
    /// Minimum accepted signal length in samples at the canonical rate.
    pub min_samples: usize,
    /// Lower edge of the plausible heart-rate band for the rhythm feature (BPM).
    pub bpm_low: f64,
    /// Upper edge of the plausible heart-rate band (BPM).
    pub bpm_high: f64,
    /// Reconstruction-error threshold used when a request does not supply
    /// one. Model- and preprocessing-specific; override alongside the model
    /// artifact.
    pub default_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_rate: 250.0,
            notch_freq: 60.0,
            notch_q: 30.0,
            band_low: 0.5,
            band_high: 40.0,
            band_order: 4,
            win_sec: 2.0,
            step_sec: 1.0,
            min_samples: 500,
            bpm_low: 50.0,
            bpm_high: 150.0,
            default_threshold: 0.00012,
        }
    }
}

impl PipelineConfig {
    /// Window length in samples at the canonical rate.
    pub fn win_len(&self) -> usize {
        (self.win_sec * self.target_rate).round() as usize
    }

    /// Window step in samples at the canonical rate.
    pub fn step_len(&self) -> usize {
        (self.step_sec * self.target_rate).round() as usize
    }
}

/// Default location of the persisted reconstruction model artifact.
pub fn default_model_path() -> PathBuf {
    data_dir().join("autoencoder.bin")
}

/// Default location of the optional calibration bounds document.
pub fn default_calibration_path() -> PathBuf {
    data_dir().join("calibration.json")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ekgcheckr")
}

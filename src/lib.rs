//! EKGCheckr - Screen EKG waveforms for anomalies
//!
//! An anomaly screening tool that flags abnormal electrocardiogram uploads by
//! reconstructing short windows of the conditioned signal through a trained
//! autoencoder and thresholding the reconstruction error, optionally refined
//! by calibrated amplitude and rhythm overrides.
//!
//! ## Features
//!
//! - **Format-agnostic ingestion**: CSV/TSV tables, JSON objects or lists,
//!   and raw separated text all normalize to one sample sequence
//! - **Deterministic conditioning**: Fourier resampling to 250 Hz, zero-phase
//!   60 Hz notch, zero-phase 0.5-40 Hz bandpass, standardization
//! - **Reconstruction scoring**: overlapping 2 s windows through the model,
//!   mean squared error per window, mean across windows
//! - **Hybrid overrides**: calibrated amplitude-dispersion and
//!   rhythm-periodicity checks that can escalate a normal verdict
//! - **Auditable reports**: verdict plus error, window count, fired flags,
//!   payload digest, and optional waveform plot
//!
//! ## Module Structure
//!
//! - `core` - Screening pipeline stages and DSP utilities
//! - `cli` - Command-line output formatting
//! - `config` - Pipeline parameters and calibration bounds
//! - `testgen` - Synthetic waveform generation for tests and fixtures
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ekgcheckr::{PipelineConfig, Screener, ScreeningOptions};
//!
//! let screener = Screener::new(
//!     PipelineConfig::default(),
//!     ekgcheckr::config::default_model_path(),
//!     ekgcheckr::config::default_calibration_path(),
//! );
//! let payload = std::fs::read("trace.csv")?;
//! let screening = screener.screen(&payload, "csv", &ScreeningOptions::default())?;
//! println!("{:?}: error {:.2e}", screening.result, screening.reconstruction_error);
//! ```
//!
//! ## Decision modes
//!
//! | Mode       | Rule                                                        |
//! |------------|-------------------------------------------------------------|
//! | Model-only | normal iff mean reconstruction error <= threshold           |
//! | Hybrid     | model-only verdict, then AMP/AC overrides may force abnormal |
//!
//! Hybrid mode requires a calibration document; without one it silently
//! behaves exactly like model-only mode. Overrides never downgrade an
//! abnormal verdict.

// Core screening pipeline
pub mod core;

// Command-line output formatting
pub mod cli;

// Configuration and calibration
pub mod config;

// Error taxonomy
pub mod error;

// Synthetic waveforms for tests and fixtures
pub mod testgen;

// Re-export commonly used types at crate root for convenience
pub use config::{default_calibration_path, default_model_path, Calibration, CalibrationCache, PipelineConfig};
pub use core::{
    condition, decide, make_windows, score_windows, standardize, ConditionedSignal, Decision,
    DenseAutoencoder, FeatureSet, ModelCache, OverrideFlag, ReconstructionScore, Reconstructor,
    Screener, Screening, ScreeningOptions, UploadFormat, Verdict,
};
pub use error::EkgError;

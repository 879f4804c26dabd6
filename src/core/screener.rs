// src/core/screener.rs
//
// Request-scoped screening pipeline facade. Owns the injected model and
// calibration caches; everything else is computed afresh per request, so
// screenings are safe to run fully in parallel.

use crate::config::{CalibrationCache, PipelineConfig};
use crate::core::conditioner::{condition, ConditionedSignal};
use crate::core::decision::{decide, OverrideFlag, Verdict};
use crate::core::features;
use crate::core::ingest::{self, UploadFormat};
use crate::core::model::{ModelCache, Reconstructor};
use crate::core::scoring::score_windows;
use crate::core::windowing::make_windows;
use crate::error::{EkgError, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Per-request parameters accepted at the boundary.
#[derive(Debug, Clone)]
pub struct ScreeningOptions {
    /// Declared sample rate of the upload (Hz).
    pub input_rate: f64,
    /// Reconstruction-error threshold; `None` uses the configured default.
    pub threshold: Option<f64>,
    /// Arm the calibrated feature overrides.
    pub use_hybrid: bool,
}

impl Default for ScreeningOptions {
    fn default() -> Self {
        Self {
            input_rate: 250.0,
            threshold: None,
            use_hybrid: false,
        }
    }
}

/// One screening verdict with its auditable breakdown. Immutable, one per
/// request, never persisted by this tool.
#[derive(Debug, Clone, Serialize)]
pub struct Screening {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub result: Verdict,
    pub reconstruction_error: f64,
    pub threshold: f64,
    pub windows: usize,
    pub samples_processed: usize,
    pub flags: Vec<OverrideFlag>,
    pub hybrid: bool,
    pub file_format: UploadFormat,
    pub payload_md5: String,
    pub window_errors: Vec<f64>,
}

/// Screening pipeline with process-lifetime model and calibration handles.
pub struct Screener {
    config: PipelineConfig,
    model: ModelCache,
    calibration: CalibrationCache,
}

impl Screener {
    /// Screener backed by on-disk artifacts. Nothing is loaded until the
    /// first screening needs it.
    pub fn new(config: PipelineConfig, model_path: PathBuf, calibration_path: PathBuf) -> Self {
        Self {
            config,
            model: ModelCache::new(model_path),
            calibration: CalibrationCache::new(calibration_path),
        }
    }

    /// Screener with injected collaborators, for tests and embedding.
    pub fn with_model(
        config: PipelineConfig,
        model: Arc<dyn Reconstructor>,
        calibration: Option<crate::config::Calibration>,
    ) -> Self {
        Self {
            config,
            model: ModelCache::preloaded(model),
            calibration: CalibrationCache::preloaded(calibration),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Screen one upload. See `screen_detailed` for the variant that also
    /// returns the conditioned signal.
    pub fn screen(&self, payload: &[u8], hint: &str, opts: &ScreeningOptions) -> Result<Screening> {
        self.screen_detailed(payload, hint, opts)
            .map(|(screening, _)| screening)
    }

    /// Screen one upload and return the conditioned signal alongside the
    /// verdict (used for waveform rendering).
    pub fn screen_detailed(
        &self,
        payload: &[u8],
        hint: &str,
        opts: &ScreeningOptions,
    ) -> Result<(Screening, ConditionedSignal)> {
        if payload.is_empty() {
            return Err(EkgError::Validation("empty upload".into()));
        }
        let threshold = opts.threshold.unwrap_or(self.config.default_threshold);
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(EkgError::Validation(format!(
                "invalid threshold {threshold}; must be a positive finite number"
            )));
        }
        if !opts.input_rate.is_finite() || opts.input_rate <= 0.0 {
            return Err(EkgError::Validation(format!(
                "invalid input rate {}; must be a positive finite number",
                opts.input_rate
            )));
        }

        let format = UploadFormat::from_hint(hint)?;
        let samples = ingest::parse(payload, format)?;
        if samples.len() < self.config.min_samples {
            return Err(EkgError::Validation(format!(
                "signal too short: {} samples, need at least {}",
                samples.len(),
                self.config.min_samples
            )));
        }

        let conditioned = condition(&samples, opts.input_rate, &self.config)?;
        let batch = make_windows(
            &conditioned.standardized,
            self.config.win_len(),
            self.config.step_len(),
        );
        if batch.is_empty() {
            return Err(EkgError::Validation(
                "signal too short to form any windows".into(),
            ));
        }

        let model = self.model.get()?;
        let score = score_windows(model.as_ref(), &batch)?;
        let features = features::extract(&conditioned.filtered, conditioned.rate, &self.config);
        let decision = decide(
            score.mean_error,
            threshold,
            &features,
            self.calibration.get(),
            opts.use_hybrid,
        );

        debug!(
            "screened {} windows: error {:.6e} vs threshold {:.6e} -> {:?} (flags {:?})",
            batch.len(),
            score.mean_error,
            threshold,
            decision.result,
            decision.flags
        );

        let screening = Screening {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            result: decision.result,
            reconstruction_error: score.mean_error,
            threshold,
            windows: batch.len(),
            samples_processed: conditioned.standardized.len(),
            flags: decision.flags,
            hybrid: decision.hybrid,
            file_format: format,
            payload_md5: format!("{:x}", md5::compute(payload)),
            window_errors: score.per_window,
        };
        Ok((screening, conditioned))
    }
}

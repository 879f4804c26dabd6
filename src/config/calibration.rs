// src/config/calibration.rs
//
// Externally derived feature bounds enabling the hybrid decision overrides.
// The derivation process lives outside this tool; the document is consumed
// purely as injected configuration data.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Calibrated bounds for the feature-based overrides.
///
/// Every field is optional; a missing bound leaves that side unconstrained
/// (`[0, +inf)` for amplitude ranges, `0` for the autocorrelation floor).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub amp_std_lo: Option<f64>,
    pub amp_std_hi: Option<f64>,
    pub amp_ptp_lo: Option<f64>,
    pub amp_ptp_hi: Option<f64>,
    pub ac_peak_lo: Option<f64>,
}

impl Calibration {
    /// `[lo, hi]` range for the amplitude standard deviation.
    pub fn amp_std_bounds(&self) -> (f64, f64) {
        (
            self.amp_std_lo.unwrap_or(0.0),
            self.amp_std_hi.unwrap_or(f64::INFINITY),
        )
    }

    /// `[lo, hi]` range for the peak-to-peak amplitude.
    pub fn amp_ptp_bounds(&self) -> (f64, f64) {
        (
            self.amp_ptp_lo.unwrap_or(0.0),
            self.amp_ptp_hi.unwrap_or(f64::INFINITY),
        )
    }

    /// Minimum acceptable autocorrelation peak.
    pub fn ac_floor(&self) -> f64 {
        self.ac_peak_lo.unwrap_or(0.0)
    }
}

/// Process-lifetime, load-once calibration cache.
///
/// The first caller triggers the load; concurrent callers block on the same
/// initialization and observe the same outcome. A missing or malformed
/// document resolves to `None`, which silently disables hybrid overrides;
/// it is never a request failure.
pub struct CalibrationCache {
    path: PathBuf,
    cell: OnceLock<Option<Calibration>>,
}

impl CalibrationCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cell: OnceLock::new(),
        }
    }

    /// Cache wrapping an already-resolved calibration (tests, embedding).
    pub fn preloaded(calibration: Option<Calibration>) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceLock::from(calibration),
        }
    }

    pub fn get(&self) -> Option<&Calibration> {
        self.cell.get_or_init(|| load(&self.path)).as_ref()
    }
}

fn load(path: &Path) -> Option<Calibration> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(
                "calibration unavailable ({}: {e}); hybrid overrides disabled",
                path.display()
            );
            return None;
        }
    };
    match serde_json::from_slice::<Calibration>(&bytes) {
        Ok(calibration) => {
            info!("loaded calibration bounds from {}", path.display());
            Some(calibration)
        }
        Err(e) => {
            warn!(
                "malformed calibration document {} ({e}); hybrid overrides disabled",
                path.display()
            );
            None
        }
    }
}

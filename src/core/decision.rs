// src/core/decision.rs
//
// Hybrid decision rule. Reconstruction error alone under-detects signals the
// autoencoder happens to reconstruct well but that are physiologically
// implausible; the calibrated feature overrides sit on top of the learned
// verdict and can only tighten it.

use crate::config::Calibration;
use crate::core::features::FeatureSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Normal,
    Abnormal,
}

/// Feature override that fired during hybrid evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverrideFlag {
    /// Amplitude dispersion outside the calibrated range.
    #[serde(rename = "AMP")]
    Amp,
    /// Autocorrelation peak below the calibrated floor.
    #[serde(rename = "AC")]
    Ac,
}

/// Final verdict with its auditable override breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub result: Verdict,
    pub flags: Vec<OverrideFlag>,
    /// Whether hybrid overrides were actually armed: requested by the caller
    /// and backed by a loaded calibration.
    pub hybrid: bool,
}

/// Combine the aggregate reconstruction error with the optional feature
/// overrides.
///
/// Flags only ever escalate normal to abnormal, never the reverse, and both
/// can fire on the same request. Requesting hybrid mode without a loaded
/// calibration silently degrades to model-only; that is not an error.
pub fn decide(
    mean_error: f64,
    threshold: f64,
    features: &FeatureSet,
    calibration: Option<&Calibration>,
    use_hybrid: bool,
) -> Decision {
    let mut result = if mean_error <= threshold {
        Verdict::Normal
    } else {
        Verdict::Abnormal
    };
    let mut flags = Vec::new();

    let armed = use_hybrid && calibration.is_some();
    if let (true, Some(cal)) = (use_hybrid, calibration) {
        let (std_lo, std_hi) = cal.amp_std_bounds();
        let (ptp_lo, ptp_hi) = cal.amp_ptp_bounds();
        if features.amp_std < std_lo
            || features.amp_std > std_hi
            || features.amp_ptp < ptp_lo
            || features.amp_ptp > ptp_hi
        {
            flags.push(OverrideFlag::Amp);
        }
        if features.ac_peak < cal.ac_floor() {
            flags.push(OverrideFlag::Ac);
        }
        if !flags.is_empty() {
            result = Verdict::Abnormal;
        }
    }

    Decision {
        result,
        flags,
        hybrid: armed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(amp_std: f64, amp_ptp: f64, ac_peak: f64) -> FeatureSet {
        FeatureSet {
            amp_std,
            amp_ptp,
            amp_mad: amp_std * 0.7,
            ac_peak,
        }
    }

    fn calibration() -> Calibration {
        Calibration {
            amp_std_lo: Some(0.1),
            amp_std_hi: Some(2.0),
            amp_ptp_lo: Some(0.5),
            amp_ptp_hi: Some(8.0),
            ac_peak_lo: Some(0.3),
        }
    }

    #[test]
    fn test_model_only_thresholding() {
        let f = features(1.0, 3.0, 0.8);
        let below = decide(0.0001, 0.00012, &f, None, false);
        assert_eq!(below.result, Verdict::Normal);
        assert!(below.flags.is_empty());
        assert!(!below.hybrid);

        let above = decide(0.001, 0.00012, &f, None, false);
        assert_eq!(above.result, Verdict::Abnormal);
        assert!(above.flags.is_empty());
    }

    #[test]
    fn test_threshold_boundary_is_normal() {
        let f = features(1.0, 3.0, 0.8);
        let at = decide(0.00012, 0.00012, &f, None, false);
        assert_eq!(at.result, Verdict::Normal);
    }

    #[test]
    fn test_hybrid_without_calibration_degrades_to_model_only() {
        let f = features(100.0, 500.0, 0.0); // wildly out of any range
        let d = decide(0.0001, 0.00012, &f, None, true);
        assert_eq!(d.result, Verdict::Normal);
        assert!(d.flags.is_empty());
        assert!(!d.hybrid);
    }

    #[test]
    fn test_amp_flag_escalates() {
        let cal = calibration();
        let f = features(5.0, 3.0, 0.8); // std above the hi bound
        let d = decide(0.0001, 0.00012, &f, Some(&cal), true);
        assert_eq!(d.result, Verdict::Abnormal);
        assert_eq!(d.flags, vec![OverrideFlag::Amp]);
        assert!(d.hybrid);
    }

    #[test]
    fn test_ac_flag_escalates() {
        let cal = calibration();
        let f = features(1.0, 3.0, 0.1); // peak below the floor
        let d = decide(0.0001, 0.00012, &f, Some(&cal), true);
        assert_eq!(d.result, Verdict::Abnormal);
        assert_eq!(d.flags, vec![OverrideFlag::Ac]);
    }

    #[test]
    fn test_both_flags_accumulate() {
        let cal = calibration();
        let f = features(5.0, 3.0, 0.1);
        let d = decide(0.0001, 0.00012, &f, Some(&cal), true);
        assert_eq!(d.flags, vec![OverrideFlag::Amp, OverrideFlag::Ac]);
        assert_eq!(d.result, Verdict::Abnormal);
    }

    #[test]
    fn test_flags_never_rescue_abnormal() {
        let cal = calibration();
        let f = features(1.0, 3.0, 0.8); // everything in range
        let d = decide(0.5, 0.00012, &f, Some(&cal), true);
        assert_eq!(d.result, Verdict::Abnormal);
        assert!(d.flags.is_empty());
    }

    #[test]
    fn test_missing_bounds_are_unconstrained() {
        let cal = Calibration::default();
        let f = features(1e6, 1e7, 0.0);
        let d = decide(0.0001, 0.00012, &f, Some(&cal), true);
        // no bounds set: nothing can fire, ac floor defaults to 0 and
        // 0.0 < 0.0 is false
        assert_eq!(d.result, Verdict::Normal);
        assert!(d.flags.is_empty());
        assert!(d.hybrid);
    }

    #[test]
    fn test_in_range_features_pass() {
        let cal = calibration();
        let f = features(1.0, 3.0, 0.8);
        let d = decide(0.0001, 0.00012, &f, Some(&cal), true);
        assert_eq!(d.result, Verdict::Normal);
        assert!(d.flags.is_empty());
    }
}

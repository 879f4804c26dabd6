// tests/pipeline_test.rs
//
// End-to-end screening scenarios over synthetic waveforms, with stub
// reconstructors standing in for the trained model.

use ekgcheckr::error::Result;
use ekgcheckr::testgen::{
    demo_autoencoder, flat_line, sinus_rhythm, IdentityReconstructor, WaveformConfig,
};
use ekgcheckr::{
    Calibration, EkgError, PipelineConfig, Reconstructor, Screener, ScreeningOptions, Verdict,
};
use std::sync::Arc;

/// Reconstructor standing in for a model that cannot track its input at all:
/// it answers every window with silence.
struct ZeroReconstructor {
    input_len: usize,
}

impl Reconstructor for ZeroReconstructor {
    fn input_len(&self) -> usize {
        self.input_len
    }
    fn reconstruct(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(batch.iter().map(|w| vec![0.0; w.len()]).collect())
    }
}

/// Moving-average smoother: a crude stand-in for an autoencoder that
/// reproduces the trend but not the noise.
struct SmoothingReconstructor {
    input_len: usize,
    width: usize,
}

impl Reconstructor for SmoothingReconstructor {
    fn input_len(&self) -> usize {
        self.input_len
    }
    fn reconstruct(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(batch
            .iter()
            .map(|w| {
                (0..w.len())
                    .map(|i| {
                        let lo = i.saturating_sub(self.width / 2);
                        let hi = (i + self.width / 2 + 1).min(w.len());
                        w[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
                    })
                    .collect()
            })
            .collect())
    }
}

fn csv_payload(values: &[f64]) -> Vec<u8> {
    let mut out = String::from("value\n");
    for v in values {
        out.push_str(&format!("{v}\n"));
    }
    out.into_bytes()
}

fn screener_with(model: Arc<dyn Reconstructor>, calibration: Option<Calibration>) -> Screener {
    Screener::with_model(PipelineConfig::default(), model, calibration)
}

#[test]
fn clean_sinus_rhythm_screens_normal_with_identity_model() {
    // 10 s, 250 Hz, 70 BPM, noise sigma 0.05
    let trace = sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.05,
            ..Default::default()
        },
        10.0,
    );
    let screener = screener_with(Arc::new(IdentityReconstructor::new(500)), None);
    let screening = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap();

    assert_eq!(screening.result, Verdict::Normal);
    assert_eq!(screening.reconstruction_error, 0.0);
    assert_eq!(screening.windows, 9);
    assert_eq!(screening.samples_processed, 2500);
    assert!(screening.flags.is_empty());
}

#[test]
fn smoothing_model_error_is_small_and_stable() {
    let trace = sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.05,
            ..Default::default()
        },
        10.0,
    );
    let screener = screener_with(
        Arc::new(SmoothingReconstructor {
            input_len: 500,
            width: 3,
        }),
        None,
    );
    let screening = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap();

    // smoothing mostly removes the sigma-0.05 noise on a standardized
    // signal; the residual is small and consistent across windows
    assert!(screening.reconstruction_error > 0.0);
    assert!(screening.reconstruction_error < 0.05);
    let max = screening
        .window_errors
        .iter()
        .cloned()
        .fold(f64::MIN, f64::max);
    let min = screening
        .window_errors
        .iter()
        .cloned()
        .fold(f64::MAX, f64::min);
    assert!(max < 3.0 * min, "unstable per-window errors: {min}..{max}");
}

#[test]
fn zero_model_screens_abnormal() {
    let trace = sinus_rhythm(&WaveformConfig::default(), 10.0);
    let screener = screener_with(Arc::new(ZeroReconstructor { input_len: 500 }), None);
    let screening = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap();
    // a standardized window has unit variance, so the silence answer scores
    // an error near 1.0, far above any plausible threshold
    assert_eq!(screening.result, Verdict::Abnormal);
    assert!(screening.reconstruction_error > 0.5);
}

#[test]
fn flat_line_windows_and_rhythm_feature() {
    let trace = flat_line(250.0, 10.0);
    let screener = screener_with(Arc::new(IdentityReconstructor::new(500)), None);
    let screening = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap();
    // the windower still produces the expected count for a silent trace
    assert_eq!(screening.windows, 9);

    // and the rhythm feature reports exactly zero periodicity
    let conditioned = ekgcheckr::condition(&trace, 250.0, &PipelineConfig::default()).unwrap();
    let peak = ekgcheckr::core::features::autocorr_peak(&conditioned.filtered, 250.0, 50.0, 150.0);
    assert_eq!(peak, 0.0);
}

#[test]
fn hybrid_without_calibration_equals_model_only() {
    let trace = sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.05,
            ..Default::default()
        },
        10.0,
    );
    let screener = screener_with(Arc::new(IdentityReconstructor::new(500)), None);

    let model_only = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap();
    let hybrid = screener
        .screen(
            &csv_payload(&trace),
            "csv",
            &ScreeningOptions {
                use_hybrid: true,
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(model_only.result, hybrid.result);
    assert!(hybrid.flags.is_empty());
    assert!(!hybrid.hybrid);
}

#[test]
fn hybrid_flags_only_escalate() {
    let trace = sinus_rhythm(&WaveformConfig::default(), 10.0);
    // calibration so permissive nothing fires, and one so strict everything
    // does; in neither case may hybrid mode rescue an abnormal verdict
    let permissive = Calibration::default();
    let strict = Calibration {
        amp_std_lo: Some(1e6),
        ..Default::default()
    };

    for calibration in [permissive, strict] {
        let screener = screener_with(
            Arc::new(ZeroReconstructor { input_len: 500 }),
            Some(calibration),
        );
        let screening = screener
            .screen(
                &csv_payload(&trace),
                "csv",
                &ScreeningOptions {
                    use_hybrid: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(screening.result, Verdict::Abnormal);
    }
}

#[test]
fn strict_calibration_escalates_normal_to_abnormal() {
    let trace = sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.05,
            ..Default::default()
        },
        10.0,
    );
    let strict = Calibration {
        amp_std_lo: Some(1e6), // impossible lower bound: AMP always fires
        ..Default::default()
    };
    let screener = screener_with(Arc::new(IdentityReconstructor::new(500)), Some(strict));

    let model_only = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap();
    assert_eq!(model_only.result, Verdict::Normal);

    let hybrid = screener
        .screen(
            &csv_payload(&trace),
            "csv",
            &ScreeningOptions {
                use_hybrid: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(hybrid.result, Verdict::Abnormal);
    assert!(!hybrid.flags.is_empty());
    assert!(hybrid.hybrid);
}

#[test]
fn missing_model_artifact_surfaces_as_server_error_at_first_request() {
    let dir = tempfile::tempdir().unwrap();
    let screener = Screener::new(
        PipelineConfig::default(),
        dir.path().join("missing.bin"),
        dir.path().join("missing.json"),
    );
    let trace = sinus_rhythm(&WaveformConfig::default(), 10.0);
    let err = screener
        .screen(&csv_payload(&trace), "csv", &ScreeningOptions::default())
        .unwrap_err();
    assert!(matches!(err, EkgError::ModelUnavailable(_)));
    assert!(!err.is_client_error());
}

#[test]
fn persisted_identity_artifact_screens_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("autoencoder.bin");
    demo_autoencoder(500).save(&model_path).unwrap();

    let calibration_path = dir.path().join("calibration.json");
    std::fs::write(&calibration_path, r#"{"ac_peak_lo": 0.2}"#).unwrap();

    let screener = Screener::new(PipelineConfig::default(), model_path, calibration_path);
    let trace = sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.02,
            ..Default::default()
        },
        10.0,
    );
    let screening = screener
        .screen(
            &csv_payload(&trace),
            "csv",
            &ScreeningOptions {
                use_hybrid: true,
                ..Default::default()
            },
        )
        .unwrap();

    // a periodic sinus trace clears the autocorrelation floor, and the
    // identity artifact reconstructs perfectly
    assert_eq!(screening.result, Verdict::Normal);
    assert!(screening.hybrid);
    assert!(screening.flags.is_empty());
}

#[test]
fn custom_threshold_flips_the_verdict() {
    let trace = sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.05,
            ..Default::default()
        },
        10.0,
    );
    let screener = screener_with(
        Arc::new(SmoothingReconstructor {
            input_len: 500,
            width: 3,
        }),
        None,
    );
    let payload = csv_payload(&trace);

    let strict = screener
        .screen(
            &payload,
            "csv",
            &ScreeningOptions {
                threshold: Some(1e-9),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(strict.result, Verdict::Abnormal);

    let lenient = screener
        .screen(
            &payload,
            "csv",
            &ScreeningOptions {
                threshold: Some(1.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(lenient.result, Verdict::Normal);
}

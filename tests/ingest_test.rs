// tests/ingest_test.rs
//
// Cross-format parsing equivalence and boundary validation, driven through
// the full screener so errors surface exactly where the contract says.

use ekgcheckr::testgen::{sinus_rhythm, IdentityReconstructor, WaveformConfig};
use ekgcheckr::{EkgError, PipelineConfig, Screener, ScreeningOptions};
use std::sync::Arc;

fn identity_screener() -> Screener {
    Screener::with_model(
        PipelineConfig::default(),
        Arc::new(IdentityReconstructor::new(500)),
        None,
    )
}

fn samples(n_seconds: f64) -> Vec<f64> {
    sinus_rhythm(
        &WaveformConfig {
            noise_std: 0.02,
            ..Default::default()
        },
        n_seconds,
    )
}

fn as_csv(values: &[f64]) -> Vec<u8> {
    let mut out = String::from("value\n");
    for v in values {
        out.push_str(&format!("{v}\n"));
    }
    out.into_bytes()
}

fn as_json(values: &[f64]) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({ "signal": values })).unwrap()
}

fn as_text(values: &[f64]) -> Vec<u8> {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

#[test]
fn json_and_csv_uploads_screen_identically() {
    let screener = identity_screener();
    let opts = ScreeningOptions::default();
    let values = samples(2.4); // 600 samples

    let from_csv = screener.screen(&as_csv(&values), "csv", &opts).unwrap();
    let from_json = screener.screen(&as_json(&values), "json", &opts).unwrap();

    assert_eq!(from_csv.result, from_json.result);
    assert_eq!(from_csv.reconstruction_error, from_json.reconstruction_error);
    assert_eq!(from_csv.threshold, from_json.threshold);
    assert_eq!(from_csv.windows, from_json.windows);
    assert_eq!(from_csv.samples_processed, from_json.samples_processed);
    assert_eq!(from_csv.flags, from_json.flags);
    assert_eq!(from_csv.hybrid, from_json.hybrid);
    assert_eq!(from_csv.window_errors, from_json.window_errors);
}

#[test]
fn all_three_formats_agree_on_the_same_series() {
    let screener = identity_screener();
    let opts = ScreeningOptions::default();
    let values = samples(4.0);

    let from_csv = screener.screen(&as_csv(&values), "csv", &opts).unwrap();
    let from_json = screener.screen(&as_json(&values), "json", &opts).unwrap();
    let from_text = screener.screen(&as_text(&values), "txt", &opts).unwrap();

    assert_eq!(from_csv.reconstruction_error, from_json.reconstruction_error);
    assert_eq!(from_json.reconstruction_error, from_text.reconstruction_error);
    assert_eq!(from_csv.windows, from_text.windows);
}

#[test]
fn too_short_signal_fails_in_every_format() {
    let screener = identity_screener();
    let opts = ScreeningOptions::default();
    let values = samples(1.6); // 400 samples, below the 500 minimum

    for (payload, hint) in [
        (as_csv(&values), "csv"),
        (as_json(&values), "json"),
        (as_text(&values), "txt"),
    ] {
        let err = screener.screen(&payload, hint, &opts).unwrap_err();
        match err {
            EkgError::Validation(msg) => {
                assert!(msg.contains("signal too short"), "hint {hint}: {msg}")
            }
            other => panic!("hint {hint}: expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn unrecognized_hint_fails_naming_supported_formats() {
    let screener = identity_screener();
    let err = screener
        .screen(b"value\n1\n", "pdf", &ScreeningOptions::default())
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("pdf"));
    assert!(msg.contains("csv") && msg.contains("json"));
    assert!(err.is_client_error());
}

#[test]
fn separator_detection_needs_plausible_sample_count() {
    let screener = identity_screener();
    // 50 numbers: parses under newline but below the 100-token minimum
    let short: Vec<u8> = (0..50)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes();
    let err = screener
        .screen(&short, "txt", &ScreeningOptions::default())
        .unwrap_err();
    assert!(matches!(err, EkgError::Parse(_)));
}

#[test]
fn quoted_numbers_in_json_coerce() {
    let screener = identity_screener();
    let values = samples(2.4);
    let quoted: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let payload = serde_json::to_vec(&serde_json::json!({ "data": quoted })).unwrap();
    let plain = screener
        .screen(&as_json(&values), "json", &ScreeningOptions::default())
        .unwrap();
    let coerced = screener
        .screen(&payload, "json", &ScreeningOptions::default())
        .unwrap();
    assert_eq!(plain.reconstruction_error, coerced.reconstruction_error);
}

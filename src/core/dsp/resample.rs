//! Fourier-domain ratio resampling.
//!
//! The conditioning chain assumes the canonical rate before any filter
//! coefficients are computed, so resampling always runs first. Equal input
//! and output rates return the input unchanged, byte for byte.

use num_complex::Complex;
use rustfft::FftPlanner;

/// Resample `x` from `rate_in` to `rate_out` by truncating or zero-padding
/// the spectrum. Output length is `floor(n * rate_out / rate_in)`.
pub fn resample(x: &[f64], rate_in: f64, rate_out: f64) -> Vec<f64> {
    if x.is_empty() || (rate_in - rate_out).abs() < f64::EPSILON {
        return x.to_vec();
    }
    let n_in = x.len();
    let n_out = (n_in as f64 * rate_out / rate_in) as usize;
    if n_out == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n_in);
    let mut spectrum: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut spectrum);

    // Keep the lowest min(n_in, n_out) bins, split between the positive and
    // negative frequency halves.
    let n_keep = n_in.min(n_out);
    let nyq = n_keep / 2 + 1;
    let mut out_spectrum = vec![Complex::new(0.0, 0.0); n_out];
    out_spectrum[..nyq].copy_from_slice(&spectrum[..nyq]);
    if n_keep > 2 {
        let tail = n_keep - nyq;
        out_spectrum[n_out - tail..].copy_from_slice(&spectrum[n_in - tail..]);
    }
    if n_keep % 2 == 0 {
        if n_out < n_in {
            // Downsampling folds the mirrored Nyquist bin into the kept one.
            let folded = spectrum[n_in - n_keep / 2];
            out_spectrum[n_keep / 2] += folded;
        } else if n_out > n_in {
            // Upsampling splits the Nyquist bin across both halves.
            out_spectrum[n_keep / 2] *= 0.5;
            let half = out_spectrum[n_keep / 2];
            out_spectrum[n_out - n_keep / 2] = half;
        }
    }

    let ifft = planner.plan_fft_inverse(n_out);
    ifft.process(&mut out_spectrum);

    // rustfft leaves both transforms unnormalized; dividing by the input
    // length recovers amplitudes scaled by n_out / n_in.
    let scale = 1.0 / n_in as f64;
    out_spectrum.iter().map(|c| c.re * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / rate).sin())
            .collect()
    }

    #[test]
    fn test_equal_rates_is_exact_identity() {
        let x = sine(7.0, 250.0, 1000);
        let y = resample(&x, 250.0, 250.0);
        assert_eq!(x, y);
    }

    #[test]
    fn test_downsample_halves_length() {
        let x = sine(10.0, 500.0, 2000);
        let y = resample(&x, 500.0, 250.0);
        assert_eq!(y.len(), 1000);
    }

    #[test]
    fn test_downsampled_sine_keeps_shape() {
        let rate_in = 500.0;
        let x = sine(5.0, rate_in, 2000);
        let y = resample(&x, rate_in, 250.0);
        // Compare against the sine evaluated at the new sample instants; the
        // Fourier method is near-exact for a bin-aligned tone.
        for (i, &v) in y.iter().enumerate() {
            let expected = (2.0 * PI * 5.0 * i as f64 / 250.0).sin();
            assert!(
                (v - expected).abs() < 1e-6,
                "sample {i}: {v} vs {expected}"
            );
        }
    }

    #[test]
    fn test_upsample_preserves_amplitude() {
        // 6.25 Hz at 250 Hz: 40 samples per cycle, peaks land on samples
        let x = sine(6.25, 250.0, 1000);
        let y = resample(&x, 250.0, 500.0);
        assert_eq!(y.len(), 2000);
        let peak_in = x.iter().cloned().fold(0.0f64, f64::max);
        let peak_out = y.iter().cloned().fold(0.0f64, f64::max);
        assert!((peak_in - peak_out).abs() < 1e-6);
    }

    #[test]
    fn test_empty_input() {
        assert!(resample(&[], 500.0, 250.0).is_empty());
    }
}

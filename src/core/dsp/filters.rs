//! IIR biquad sections and zero-phase filtering.
//!
//! The notch and bandpass stages both run each section forward and backward
//! over the signal, so the cascade introduces no net group delay and QRS peak
//! timing survives into the windowing stage.

use crate::error::{EkgError, Result};
use std::f64::consts::PI;

/// Second-order IIR section, coefficients normalized so `a0 == 1`.
#[derive(Debug, Clone, Copy)]
pub struct Biquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Biquad {
    /// Notch section centered on `freq` with quality factor `q` (RBJ
    /// cookbook formulation, prewarped via the bilinear transform).
    pub fn notch(freq: f64, q: f64, rate: f64) -> Self {
        let w0 = 2.0 * PI * freq / rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        let a0 = 1.0 + alpha;
        Self {
            b0: 1.0 / a0,
            b1: -2.0 * cos_w0 / a0,
            b2: 1.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Low-pass section at `freq` with the given section Q.
    pub fn lowpass(freq: f64, q: f64, rate: f64) -> Self {
        let w0 = 2.0 * PI * freq / rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        let a0 = 1.0 + alpha;
        let b1 = 1.0 - cos_w0;
        Self {
            b0: b1 / 2.0 / a0,
            b1: b1 / a0,
            b2: b1 / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// High-pass section at `freq` with the given section Q.
    pub fn highpass(freq: f64, q: f64, rate: f64) -> Self {
        let w0 = 2.0 * PI * freq / rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();
        let a0 = 1.0 + alpha;
        let b1 = 1.0 + cos_w0;
        Self {
            b0: b1 / 2.0 / a0,
            b1: -b1 / a0,
            b2: b1 / 2.0 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Single forward pass in transposed direct form II.
    fn process(&self, x: &[f64]) -> Vec<f64> {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        x.iter()
            .map(|&x| {
                let y = self.b0 * x + z1;
                z1 = self.b1 * x - self.a1 * y + z2;
                z2 = self.b2 * x - self.a2 * y;
                y
            })
            .collect()
    }
}

/// Section Q values for a Butterworth cascade of `order` poles.
///
/// `order` must be even; the poles pair into `order / 2` sections.
fn butterworth_qs(order: usize) -> Vec<f64> {
    (0..order / 2)
        .map(|k| {
            let theta = PI * (2.0 * k as f64 + 1.0) / (2.0 * order as f64);
            1.0 / (2.0 * theta.cos())
        })
        .collect()
}

/// Zero-phase filtering: forward and backward passes over the section
/// cascade with odd-reflection edge padding (matching `filtfilt` semantics).
///
/// Fails on input shorter than the padding needed for stable edges, and on
/// non-finite output from an unstable combination of input and coefficients.
pub fn filtfilt(sections: &[Biquad], x: &[f64]) -> Result<Vec<f64>> {
    let pad = 3 * (2 * sections.len() + 1);
    if x.len() <= pad {
        return Err(EkgError::Conditioning(format!(
            "signal too short for zero-phase filtering ({} samples, need more than {})",
            x.len(),
            pad
        )));
    }

    let mut y = odd_extend(x, pad);
    for section in sections {
        y = section.process(&y);
    }
    y.reverse();
    for section in sections {
        y = section.process(&y);
    }
    y.reverse();

    let out: Vec<f64> = y[pad..pad + x.len()].to_vec();
    if out.iter().any(|v| !v.is_finite()) {
        return Err(EkgError::Conditioning(
            "filter produced non-finite output on degenerate input".into(),
        ));
    }
    Ok(out)
}

/// Odd extension around both edges: reflects the signal and mirrors it
/// through the endpoint value, which keeps the filter state continuous.
fn odd_extend(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        out.push(2.0 * x[0] - x[i]);
    }
    out.extend_from_slice(x);
    for i in 1..=pad {
        out.push(2.0 * x[n - 1] - x[n - 1 - i]);
    }
    out
}

/// Zero-phase powerline notch.
pub fn notch_filter(x: &[f64], rate: f64, freq: f64, q: f64) -> Result<Vec<f64>> {
    filtfilt(&[Biquad::notch(freq, q, rate)], x)
}

/// Zero-phase Butterworth bandpass, realized as a high-pass cascade at the
/// lower cutoff followed by a low-pass cascade at the upper cutoff, each of
/// `order` poles.
pub fn bandpass_filter(
    x: &[f64],
    rate: f64,
    low: f64,
    high: f64,
    order: usize,
) -> Result<Vec<f64>> {
    if order == 0 || order % 2 != 0 {
        return Err(EkgError::Conditioning(format!(
            "bandpass order must be a positive even number, got {order}"
        )));
    }
    if !(0.0 < low && low < high && high < rate / 2.0) {
        return Err(EkgError::Conditioning(format!(
            "bandpass cutoffs {low}-{high} Hz invalid for rate {rate} Hz"
        )));
    }
    let mut sections = Vec::with_capacity(order);
    for q in butterworth_qs(order) {
        sections.push(Biquad::highpass(low, q, rate));
    }
    for q in butterworth_qs(order) {
        sections.push(Biquad::lowpass(high, q, rate));
    }
    filtfilt(&sections, x)
}

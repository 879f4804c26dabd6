// src/core/visualization/waveform.rs
//
// Waveform plot for screening reports: the filtered trace as a min/max
// envelope, with windows whose reconstruction error exceeded the threshold
// shaded behind it.

use anyhow::Result;
use image::{ImageBuffer, Rgb};
use std::path::Path;

const BACKGROUND: Rgb<u8> = Rgb([252, 252, 252]);
const TRACE: Rgb<u8> = Rgb([30, 30, 80]);
const MIDLINE: Rgb<u8> = Rgb([210, 210, 210]);
const FLAGGED: Rgb<u8> = Rgb([255, 214, 214]);

/// Waveform plot configuration.
#[derive(Debug, Clone)]
pub struct WaveformConfig {
    pub width: u32,
    pub height: u32,
    /// Truncate the plot after this many seconds; `None` plots everything.
    pub max_seconds: Option<f64>,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 400,
            max_seconds: Some(30.0),
        }
    }
}

/// Render the filtered signal to a PNG, shading windows whose error exceeds
/// `threshold`.
pub fn render_waveform(
    signal: &[f64],
    rate: f64,
    window_errors: &[f64],
    threshold: f64,
    win_len: usize,
    step_len: usize,
    config: &WaveformConfig,
    output_path: &Path,
) -> Result<()> {
    let max_samples = config
        .max_seconds
        .map(|s| (s * rate) as usize)
        .unwrap_or(signal.len());
    let signal = &signal[..signal.len().min(max_samples)];
    if signal.is_empty() {
        anyhow::bail!("nothing to plot: empty signal");
    }

    let width = config.width.max(1);
    let height = config.height.max(1);
    let mut img = ImageBuffer::from_pixel(width, height, BACKGROUND);

    // Shade flagged windows first so the trace draws over them.
    let samples_per_col = signal.len() as f64 / width as f64;
    for (i, &err) in window_errors.iter().enumerate() {
        if err <= threshold {
            continue;
        }
        let start = i * step_len;
        let end = (start + win_len).min(signal.len());
        if start >= signal.len() {
            break;
        }
        let x0 = (start as f64 / samples_per_col) as u32;
        let x1 = ((end as f64 / samples_per_col) as u32).min(width - 1);
        for x in x0..=x1 {
            for y in 0..height {
                img.put_pixel(x, y, FLAGGED);
            }
        }
    }

    let lo = signal.iter().cloned().fold(f64::MAX, f64::min);
    let hi = signal.iter().cloned().fold(f64::MIN, f64::max);
    let span = (hi - lo).max(1e-12);
    let margin = 0.05 * span;
    let to_y = |v: f64| -> u32 {
        let norm = (v - lo + margin) / (span + 2.0 * margin);
        let y = (1.0 - norm) * (height - 1) as f64;
        y.round().clamp(0.0, (height - 1) as f64) as u32
    };

    // Faint zero/midline reference.
    let mid_y = to_y((lo + hi) / 2.0);
    for x in 0..width {
        img.put_pixel(x, mid_y, MIDLINE);
    }

    // Min/max column envelope keeps QRS spikes visible at any zoom.
    for x in 0..width {
        let start = (x as f64 * samples_per_col) as usize;
        let end = (((x + 1) as f64 * samples_per_col) as usize).max(start + 1);
        let chunk = &signal[start.min(signal.len() - 1)..end.min(signal.len())];
        if chunk.is_empty() {
            continue;
        }
        let c_lo = chunk.iter().cloned().fold(f64::MAX, f64::min);
        let c_hi = chunk.iter().cloned().fold(f64::MIN, f64::max);
        let y_top = to_y(c_hi);
        let y_bot = to_y(c_lo);
        for y in y_top..=y_bot {
            img.put_pixel(x, y, TRACE);
        }
    }

    img.save(output_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.png");
        let signal: Vec<f64> = (0..2500).map(|i| (i as f64 * 0.05).sin()).collect();
        let errors = vec![0.0, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        render_waveform(
            &signal,
            250.0,
            &errors,
            0.1,
            500,
            250,
            &WaveformConfig::default(),
            &path,
        )
        .unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_render_rejects_empty_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.png");
        let result = render_waveform(
            &[],
            250.0,
            &[],
            0.1,
            500,
            250,
            &WaveformConfig::default(),
            &path,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_render_flat_signal_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");
        render_waveform(
            &[0.0; 1000],
            250.0,
            &[0.0],
            0.1,
            500,
            250,
            &WaveformConfig::default(),
            &path,
        )
        .unwrap();
    }
}

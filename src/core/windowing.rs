// src/core/windowing.rs
//
// Fixed-length overlapping windows over the standardized signal. Each window
// is an independent slice; there is no overlap blending and no padding of a
// trailing partial window.

/// Slice `signal` into windows of `win_len` samples advancing by `step_len`.
///
/// Produces `floor((N - win_len) / step_len) + 1` windows, or none when the
/// signal is shorter than a single window; the caller treats an empty batch
/// as fatal.
pub fn make_windows(signal: &[f64], win_len: usize, step_len: usize) -> Vec<Vec<f64>> {
    if win_len == 0 || step_len == 0 || signal.len() < win_len {
        return Vec::new();
    }
    (0..=signal.len() - win_len)
        .step_by(step_len)
        .map(|start| signal[start..start + win_len].to_vec())
        .collect()
}

//! Descriptive statistics over sample sequences.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation; 0.0 for an empty slice.
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let var = data.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / data.len() as f64;
    var.sqrt()
}

/// Peak-to-peak range; 0.0 for an empty slice.
pub fn peak_to_peak(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let max = data.iter().cloned().fold(f64::MIN, f64::max);
    let min = data.iter().cloned().fold(f64::MAX, f64::min);
    max - min
}

/// Median of a slice, sorting in place.
pub fn median(data: &mut [f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = data.len() / 2;
    if data.len() % 2 == 0 {
        (data[mid - 1] + data[mid]) / 2.0
    } else {
        data[mid]
    }
}

/// Median absolute deviation, a dispersion estimator resistant to isolated
/// spikes.
pub fn median_abs_deviation(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut values = data.to_vec();
    let med = median(&mut values);
    let mut deviations: Vec<f64> = data.iter().map(|v| (v - med).abs()).collect();
    median(&mut deviations)
}

/// Autocorrelation up to `max_lag`, normalized by the zero-lag energy.
/// Returns all zeros when the energy vanishes.
pub fn autocorrelation(data: &[f64], max_lag: usize) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let n = data.len();
    let max_lag = max_lag.min(n - 1);

    let energy: f64 = data.iter().map(|v| v * v).sum();
    if energy < 1e-10 {
        return vec![0.0; max_lag + 1];
    }

    (0..=max_lag)
        .map(|lag| {
            let sum: f64 = data[..n - lag]
                .iter()
                .zip(&data[lag..])
                .map(|(a, b)| a * b)
                .sum();
            sum / energy
        })
        .collect()
}

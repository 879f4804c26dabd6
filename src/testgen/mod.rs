// src/testgen/mod.rs
//
// Synthetic waveform generation for tests and fixture files. Produces
// deterministic sinus-rhythm traces with PQRST morphology plus reconstruction
// stubs, so the pipeline can be exercised without clinical recordings or a
// trained artifact.

use crate::core::model::{Activation, DenseAutoencoder, DenseLayer, Reconstructor};
use crate::error::Result;

/// Synthetic sinus-rhythm parameters.
#[derive(Debug, Clone)]
pub struct WaveformConfig {
    /// Sample rate in Hz.
    pub rate: f64,
    /// Heart rate in BPM.
    pub bpm: f64,
    /// R-wave amplitude scaling.
    pub amplitude: f64,
    /// Standard deviation of additive Gaussian noise.
    pub noise_std: f64,
    /// Seed for the deterministic noise generator.
    pub seed: u64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            rate: 250.0,
            bpm: 70.0,
            amplitude: 1.0,
            noise_std: 0.0,
            seed: 12345,
        }
    }
}

/// Generate a synthetic sinus-rhythm trace of the given duration.
///
/// Each beat is a sum of Gaussian pulses approximating the P, Q, R, S and T
/// waves, spaced by a fixed RR interval.
pub fn sinus_rhythm(cfg: &WaveformConfig, seconds: f64) -> Vec<f64> {
    let n = (seconds * cfg.rate) as usize;
    let rr = 60.0 / cfg.bpm;
    let mut rng = XorShift::new(cfg.seed);

    // (offset from R peak in seconds, width, amplitude)
    let pulses: [(f64, f64, f64); 5] = [
        (-0.16, 0.040, 0.15),  // P
        (-0.02, 0.010, -0.10), // Q
        (0.0, 0.020, 1.00),    // R
        (0.03, 0.012, -0.20),  // S
        (0.25, 0.080, 0.30),   // T
    ];
    let r_offset = 0.35 * rr;

    (0..n)
        .map(|i| {
            let t = i as f64 / cfg.rate;
            let beat_t = t % rr - r_offset;
            let mut v = 0.0;
            for &(center, width, amp) in &pulses {
                let x = (beat_t - center) / width;
                v += amp * (-0.5 * x * x).exp();
            }
            v * cfg.amplitude + cfg.noise_std * rng.next_gaussian()
        })
        .collect()
}

/// All-zero trace of the given duration, the degenerate flat-line case.
pub fn flat_line(rate: f64, seconds: f64) -> Vec<f64> {
    vec![0.0; (seconds * rate) as usize]
}

/// Reconstruction stub that echoes its input: zero error on every window.
pub struct IdentityReconstructor {
    input_len: usize,
}

impl IdentityReconstructor {
    pub fn new(input_len: usize) -> Self {
        Self { input_len }
    }
}

impl Reconstructor for IdentityReconstructor {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn reconstruct(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(batch.to_vec())
    }
}

/// Single-layer linear identity autoencoder, useful for artifact round-trip
/// and cache tests.
pub fn demo_autoencoder(input_len: usize) -> DenseAutoencoder {
    let mut weights = vec![0.0; input_len * input_len];
    for i in 0..input_len {
        weights[i * input_len + i] = 1.0;
    }
    DenseAutoencoder {
        input_len,
        layers: vec![DenseLayer {
            weights,
            biases: vec![0.0; input_len],
            activation: Activation::Linear,
        }],
    }
}

/// Deterministic xorshift generator with a Box-Muller Gaussian transform.
pub struct XorShift {
    state: u64,
}

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    pub fn next_uniform(&mut self) -> f64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state as f64 / u64::MAX as f64
    }

    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_uniform().max(1e-12);
        let u2 = self.next_uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

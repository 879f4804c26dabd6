// src/core/model.rs
//
// Reconstruction model collaborator. The pipeline treats the autoencoder as
// a black box behind the Reconstructor trait; the concrete implementation
// restores a fully-connected autoencoder from a bincode artifact.

use crate::error::{EkgError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Shape-preserving reconstruction collaborator.
pub trait Reconstructor: Send + Sync {
    /// Window length the model was trained on.
    fn input_len(&self) -> usize;

    /// Reconstruct each window in the batch; the output must have the same
    /// shape as the input.
    fn reconstruct(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
}

impl Activation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
        }
    }
}

/// One fully-connected layer; weights are row-major `out_dim x in_dim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
    pub activation: Activation,
}

/// Fully-connected autoencoder restored from a persisted artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseAutoencoder {
    pub input_len: usize,
    pub layers: Vec<DenseLayer>,
}

impl DenseAutoencoder {
    /// Load and validate a bincode artifact.
    pub fn from_artifact(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            EkgError::ModelUnavailable(format!(
                "cannot read model artifact {}: {e}",
                path.display()
            ))
        })?;
        let model: DenseAutoencoder = bincode::deserialize(&bytes).map_err(|e| {
            EkgError::ModelUnavailable(format!(
                "corrupt model artifact {}: {e}",
                path.display()
            ))
        })?;
        model.validate()?;
        info!(
            "loaded reconstruction model from {} ({} layers, input length {})",
            path.display(),
            model.layers.len(),
            model.input_len
        );
        Ok(model)
    }

    /// Persist the model as a bincode artifact.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let bytes = bincode::serialize(self).map_err(std::io::Error::other)?;
        std::fs::write(path, bytes)
    }

    /// Layer dimensions must chain and round-trip the input length.
    fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(EkgError::ModelUnavailable(
                "model artifact has no layers".into(),
            ));
        }
        let mut dim = self.input_len;
        for (i, layer) in self.layers.iter().enumerate() {
            let out_dim = layer.biases.len();
            if out_dim == 0 || layer.weights.len() != out_dim * dim {
                return Err(EkgError::ModelUnavailable(format!(
                    "layer {i} weight shape {} does not match {out_dim}x{dim}",
                    layer.weights.len()
                )));
            }
            dim = out_dim;
        }
        if dim != self.input_len {
            return Err(EkgError::ModelUnavailable(format!(
                "model output length {dim} does not round-trip input length {}",
                self.input_len
            )));
        }
        Ok(())
    }

    fn forward(&self, window: &[f64]) -> Vec<f64> {
        let mut current = window.to_vec();
        for layer in &self.layers {
            let in_dim = current.len();
            let out_dim = layer.biases.len();
            let mut next = Vec::with_capacity(out_dim);
            for o in 0..out_dim {
                let row = &layer.weights[o * in_dim..(o + 1) * in_dim];
                let mut acc = layer.biases[o];
                for (w, x) in row.iter().zip(&current) {
                    acc += w * x;
                }
                next.push(layer.activation.apply(acc));
            }
            current = next;
        }
        current
    }
}

impl Reconstructor for DenseAutoencoder {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn reconstruct(&self, batch: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        Ok(batch.iter().map(|window| self.forward(window)).collect())
    }
}

/// Process-lifetime, load-once model cache.
///
/// The first caller triggers the artifact load; concurrent callers block on
/// the same initialization and never observe a partially-built model. The
/// outcome, success or failure, is cached: a failed load is a deterministic
/// function of the artifact and retrying cannot succeed, and reload cost
/// must never land on the request path.
pub struct ModelCache {
    path: PathBuf,
    cell: OnceLock<std::result::Result<Arc<dyn Reconstructor>, String>>,
}

impl ModelCache {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cell: OnceLock::new(),
        }
    }

    /// Cache wrapping an already-built reconstructor (tests, embedding).
    pub fn preloaded(model: Arc<dyn Reconstructor>) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceLock::from(Ok(model)),
        }
    }

    pub fn get(&self) -> Result<Arc<dyn Reconstructor>> {
        let outcome = self.cell.get_or_init(|| {
            DenseAutoencoder::from_artifact(&self.path)
                .map(|m| Arc::new(m) as Arc<dyn Reconstructor>)
                .map_err(|e| match e {
                    EkgError::ModelUnavailable(msg) => msg,
                    other => other.to_string(),
                })
        });
        match outcome {
            Ok(model) => Ok(Arc::clone(model)),
            Err(msg) => Err(EkgError::ModelUnavailable(msg.clone())),
        }
    }
}

//! Core screening pipeline: ingestion, conditioning, windowing, scoring,
//! features, and the hybrid decision rule.

pub mod conditioner;
pub mod decision;
pub mod dsp;
pub mod features;
pub mod ingest;
pub mod model;
pub mod scoring;
pub mod screener;
pub mod visualization;
pub mod windowing;

pub use conditioner::{condition, standardize, ConditionedSignal};
pub use decision::{decide, Decision, OverrideFlag, Verdict};
pub use features::FeatureSet;
pub use ingest::UploadFormat;
pub use model::{DenseAutoencoder, ModelCache, Reconstructor};
pub use scoring::{score_windows, ReconstructionScore};
pub use screener::{Screener, Screening, ScreeningOptions};
pub use windowing::make_windows;

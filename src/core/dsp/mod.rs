//! Digital signal processing utilities: IIR filtering, Fourier resampling,
//! and descriptive statistics.

pub mod filters;
pub mod resample;
pub mod stats;

pub use filters::{bandpass_filter, filtfilt, notch_filter, Biquad};
pub use resample::resample;

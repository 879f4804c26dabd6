//! Visual representations of screened signals.

mod waveform;

pub use waveform::{render_waveform, WaveformConfig};

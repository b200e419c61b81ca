//! Filterbench - Offline Spectral Analysis and FIR Filtering Core
//!
//! Framed spectral transform, windowed-sinc filter design and direct
//! convolution over in-memory sample arrays. Decoding audio and plotting the
//! results are left to the caller.

pub mod error;
pub mod filters;
pub mod spectrum;
pub mod pipeline;

pub use error::{DspError, Result};
pub use filters::{FilterDesign, FilterKind, WindowType, convolve, design_highpass, design_lowpass};
pub use spectrum::{Spectrogram, istft, stft};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, Signal};

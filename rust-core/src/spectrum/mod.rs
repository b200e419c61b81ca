//! Framed spectral analysis with FFT

pub mod fft;
pub mod stft;
pub mod spectrogram;

pub use fft::{FftEngine, RealFftEngine};
pub use stft::{frame_count, istft, stft, stft_with_window};
pub use spectrogram::Spectrogram;

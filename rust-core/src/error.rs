//! Error taxonomy for the DSP engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Cutoff frequency {cutoff_hz} Hz must lie in (0, {nyquist_hz}) Hz")]
    InvalidCutoff { cutoff_hz: f64, nyquist_hz: f64 },

    #[error("Spectrum at frame {frame} has {found} bins, expected {expected}")]
    DimensionMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("Sample rate must be positive and finite (found: {0})")]
    InvalidSampleRate(f64),

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, DspError>;

//! FIR filter design and convolution

pub mod windows;
pub mod design;
pub mod convolution;

pub use windows::{WindowType, generate_window};
pub use design::{
    FilterDesign, FilterKind, DEFAULT_FIR_SIZE, design_highpass, design_lowpass, filter_response,
    response_magnitude_db, sinc,
};
pub use convolution::{convolve, convolve_fft};

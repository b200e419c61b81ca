//! FIR filter design using the windowed-sinc method
//!
//! Kernels are sampled on `n = -M/2 .. M/2 - 1` so the ideal response is
//! centred at index `M/2`, then tapered with a window of length `M`.

use super::windows::{apply_window_inplace, generate_window, WindowType};
use crate::error::{DspError, Result};
use crate::spectrum::fft::{magnitude_db, FftEngine};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Default number of FIR taps
pub const DEFAULT_FIR_SIZE: usize = 512;

/// Frequency-selective response of a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    Lowpass,
    #[default]
    Highpass,
}

/// Windowed-sinc FIR filter specification
#[derive(Debug, Clone)]
pub struct FilterDesign {
    pub kind: FilterKind,

    /// Cutoff frequency in Hz
    pub cutoff_hz: f64,

    /// Sample rate in Hz
    pub sample_rate: f64,

    /// Number of taps (positive, even)
    pub fir_size: usize,

    /// Taper applied to the ideal kernel
    pub window_type: WindowType,
}

impl FilterDesign {
    /// High-pass design with the default tap count and a Hamming taper
    pub fn highpass(cutoff_hz: f64, sample_rate: f64) -> Self {
        Self {
            kind: FilterKind::Highpass,
            cutoff_hz,
            sample_rate,
            fir_size: DEFAULT_FIR_SIZE,
            window_type: WindowType::Hamming,
        }
    }

    /// Low-pass design with the default tap count and a Hamming taper
    pub fn lowpass(cutoff_hz: f64, sample_rate: f64) -> Self {
        Self {
            kind: FilterKind::Lowpass,
            ..Self::highpass(cutoff_hz, sample_rate)
        }
    }

    pub fn with_fir_size(mut self, fir_size: usize) -> Self {
        self.fir_size = fir_size;
        self
    }

    pub fn with_window(mut self, window_type: WindowType) -> Self {
        self.window_type = window_type;
        self
    }

    /// Normalized angular cutoff ω = 2π·fc/fs (radians/sample)
    pub fn omega(&self) -> f64 {
        2.0 * PI * self.cutoff_hz / self.sample_rate
    }

    /// Check the specification without building the kernel
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(DspError::InvalidSampleRate(self.sample_rate));
        }

        let nyquist_hz = self.sample_rate / 2.0;
        if !(self.cutoff_hz.is_finite() && self.cutoff_hz > 0.0 && self.cutoff_hz < nyquist_hz) {
            return Err(DspError::InvalidCutoff {
                cutoff_hz: self.cutoff_hz,
                nyquist_hz,
            });
        }

        if self.fir_size == 0 || self.fir_size % 2 != 0 {
            return Err(DspError::InvalidDimension(format!(
                "FIR size must be a positive even number, got {}",
                self.fir_size
            )));
        }

        Ok(())
    }

    /// Build the windowed kernel h[n] for n = 0..fir_size-1
    pub fn coefficients(&self) -> Result<Vec<f64>> {
        self.validate()?;

        let omega = self.omega();
        let half = (self.fir_size / 2) as isize;

        let mut h: Vec<f64> = (-half..half)
            .map(|n| {
                let n = n as f64;
                let lowpass = ideal_lowpass(omega, n);
                match self.kind {
                    FilterKind::Lowpass => lowpass,
                    // Spectral inversion against the identity kernel
                    FilterKind::Highpass => sinc(n) - lowpass,
                }
            })
            .collect();

        let window = generate_window(self.window_type, self.fir_size);
        apply_window_inplace(&mut h, &window);

        Ok(h)
    }
}

/// Normalized sinc: sin(πx)/(πx), with sinc(0) = 1
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Ideal low-pass impulse response ω·sinc(ω·n/π)/π
fn ideal_lowpass(omega: f64, n: f64) -> f64 {
    omega * sinc(omega * n / PI) / PI
}

/// Design a low-pass FIR filter with a Hamming taper
///
/// # Arguments
/// * `cutoff_hz` - Cutoff frequency in Hz, within (0, fs/2)
/// * `sample_rate` - Sample rate in Hz
/// * `fir_size` - Number of taps (positive, even)
pub fn design_lowpass(cutoff_hz: f64, sample_rate: f64, fir_size: usize) -> Result<Vec<f64>> {
    FilterDesign::lowpass(cutoff_hz, sample_rate)
        .with_fir_size(fir_size)
        .coefficients()
}

/// Design a high-pass FIR filter with a Hamming taper
///
/// High-pass = identity - low-pass, so `design_lowpass + design_highpass`
/// equals the windowed identity kernel.
pub fn design_highpass(cutoff_hz: f64, sample_rate: f64, fir_size: usize) -> Result<Vec<f64>> {
    FilterDesign::highpass(cutoff_hz, sample_rate)
        .with_fir_size(fir_size)
        .coefficients()
}

/// Full-length complex DFT of a kernel (standard bin layout)
pub fn filter_response(h: &[f64]) -> Result<Vec<Complex64>> {
    if h.is_empty() {
        return Err(DspError::EmptyInput("filter coefficients"));
    }
    Ok(FftEngine::new(h.len())?.forward_real(h))
}

/// Magnitude response over the first `len/2` bins, in dB
///
/// # Returns
/// `(frequencies_hz, magnitude_db)` where the frequency axis is
/// `linspace(0, fs/2, len/2)` (both endpoints included)
pub fn response_magnitude_db(response: &[Complex64], sample_rate: f64) -> (Vec<f64>, Vec<f64>) {
    let count = response.len() / 2;
    let nyquist = sample_rate / 2.0;

    let frequencies = (0..count)
        .map(|i| {
            if count > 1 {
                nyquist * i as f64 / (count - 1) as f64
            } else {
                0.0
            }
        })
        .collect();

    let magnitudes = response[..count]
        .iter()
        .map(|c| magnitude_db(c.norm()))
        .collect();

    (frequencies, magnitudes)
}

/// Evaluate H(e^jω) at an arbitrary frequency in Hz
pub fn response_at(h: &[f64], frequency_hz: f64, sample_rate: f64) -> Complex64 {
    let omega = 2.0 * PI * frequency_hz / sample_rate;

    h.iter()
        .enumerate()
        .map(|(n, &h_n)| h_n * Complex64::from_polar(1.0, -(omega * n as f64)))
        .sum()
}

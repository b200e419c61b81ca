//! FFT engine built on planned rustfft / realfft transforms
//!
//! Uses the standard DFT bin layout: bin 0 = DC, ascending positive
//! frequencies, then the negative frequencies wrapping back towards DC.

use crate::error::{DspError, Result};
use num_complex::Complex64;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Complex FFT engine for a fixed transform length
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Full-length complex forward transform
    forward: Arc<dyn Fft<f64>>,

    /// Full-length complex inverse transform (unnormalized)
    inverse: Arc<dyn Fft<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any positive length)
    pub fn new(fft_size: usize) -> Result<Self> {
        check_size(fft_size)?;

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_size);
        let inverse = planner.plan_fft_inverse(fft_size);

        Ok(Self {
            fft_size,
            forward,
            inverse,
        })
    }

    /// Forward DFT of a real signal, returning all `fft_size` bins
    ///
    /// The signal is zero-padded (or truncated) to `fft_size`.
    pub fn forward_real(&self, signal: &[f64]) -> Vec<Complex64> {
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.fft_size];
        for (slot, &x) in buffer.iter_mut().zip(signal.iter()) {
            *slot = Complex64::new(x, 0.0);
        }
        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse DFT with 1/N scaling, so that `inverse(forward(x)) == x`
    pub fn inverse(&self, spectrum: &[Complex64]) -> Result<Vec<Complex64>> {
        check_len(spectrum.len(), self.fft_size)?;

        let mut buffer = spectrum.to_vec();
        self.inverse.process(&mut buffer);

        let scale = 1.0 / self.fft_size as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
        Ok(buffer)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Real-input FFT engine working on the `fft_size/2 + 1` non-negative bins
pub struct RealFftEngine {
    fft_size: usize,

    /// Real-to-complex forward transform
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Complex-to-real inverse transform (unnormalized)
    c2r: Arc<dyn ComplexToReal<f64>>,
}

impl RealFftEngine {
    pub fn new(fft_size: usize) -> Result<Self> {
        check_size(fft_size)?;

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);
        let c2r = planner.plan_fft_inverse(fft_size);

        Ok(Self { fft_size, r2c, c2r })
    }

    /// Number of bins in a half spectrum
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Positive-frequency half spectrum of a real signal
    ///
    /// The signal is zero-padded (or truncated) to `fft_size`.
    pub fn forward(&self, signal: &[f64]) -> Result<Vec<Complex64>> {
        let mut input = self.r2c.make_input_vec();
        let copy_len = signal.len().min(self.fft_size);
        input[..copy_len].copy_from_slice(&signal[..copy_len]);

        let mut output = self.r2c.make_output_vec();
        self.r2c
            .process(&mut input, &mut output)
            .map_err(|e| DspError::InvalidDimension(format!("real FFT failed: {}", e)))?;
        Ok(output)
    }

    /// Real signal from a half spectrum, with 1/N scaling
    ///
    /// The imaginary parts of the DC bin (and of the Nyquist bin for even
    /// sizes) are discarded.
    pub fn inverse(&self, spectrum: &[Complex64]) -> Result<Vec<f64>> {
        check_len(spectrum.len(), self.num_bins())?;

        let mut input = spectrum.to_vec();
        input[0].im = 0.0;
        if self.fft_size % 2 == 0 {
            let last = input.len() - 1;
            input[last].im = 0.0;
        }

        let mut output = self.c2r.make_output_vec();
        self.c2r
            .process(&mut input, &mut output)
            .map_err(|e| DspError::InvalidDimension(format!("real inverse FFT failed: {}", e)))?;

        let scale = 1.0 / self.fft_size as f64;
        for x in output.iter_mut() {
            *x *= scale;
        }
        Ok(output)
    }
}

fn check_size(fft_size: usize) -> Result<()> {
    if fft_size == 0 {
        return Err(DspError::InvalidDimension(
            "FFT size must be positive".to_string(),
        ));
    }
    Ok(())
}

fn check_len(len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(DspError::DimensionMismatch {
            frame: 0,
            expected,
            found: len,
        });
    }
    Ok(())
}

/// Convert a linear magnitude to dB: 20*log10(max(mag, 1e-10))
pub fn magnitude_db(magnitude: f64) -> f64 {
    20.0 * magnitude.max(1e-10).log10()
}

//! Full linear convolution of a signal with an FIR kernel
//!
//! The direct engine accumulates one scaled copy of the kernel per input
//! sample: O(N*M). `convolve_fft` is the zero-padded real-FFT equivalent,
//! O((N+M) log(N+M)), and produces the same N + M - 1 samples.

use crate::error::{DspError, Result};
use crate::spectrum::fft::RealFftEngine;
use num_complex::Complex64;
use std::ops::{AddAssign, Mul};

/// Direct full (not circular) convolution
///
/// `output[k] = Σ_i input[i] · filter[k - i]`, length `N + M - 1`.
/// The output element type follows `input * filter`, so a real signal
/// convolved with a complex kernel yields complex samples.
///
/// An empty input or filter yields an empty output.
pub fn convolve<A, B>(input: &[A], filter: &[B]) -> Vec<<A as Mul<B>>::Output>
where
    A: Copy + Mul<B>,
    B: Copy,
    <A as Mul<B>>::Output: Copy + Default + AddAssign,
{
    if input.is_empty() || filter.is_empty() {
        return Vec::new();
    }

    let filter_len = filter.len();
    let mut output = vec![Default::default(); input.len() + filter_len - 1];

    for (i, &x) in input.iter().enumerate() {
        for (acc, &h) in output[i..i + filter_len].iter_mut().zip(filter.iter()) {
            *acc += x * h;
        }
    }

    output
}

/// FFT-accelerated full convolution of real sequences
///
/// Both sequences are zero-padded to the next power of two >= N + M - 1,
/// multiplied over the non-negative half spectrum and transformed back.
pub fn convolve_fft(input: &[f64], filter: &[f64]) -> Result<Vec<f64>> {
    if input.is_empty() {
        return Err(DspError::EmptyInput("convolution input"));
    }
    if filter.is_empty() {
        return Err(DspError::EmptyInput("convolution filter"));
    }

    let output_len = input.len() + filter.len() - 1;
    let engine = RealFftEngine::new(output_len.next_power_of_two())?;

    let x_fft = engine.forward(input)?;
    let h_fft = engine.forward(filter)?;

    let product: Vec<Complex64> = x_fft
        .iter()
        .zip(h_fft.iter())
        .map(|(x, h)| x * h)
        .collect();

    let mut time = engine.inverse(&product)?;
    time.truncate(output_len);
    Ok(time)
}

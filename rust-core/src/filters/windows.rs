//! Window functions for FIR tapering and frame analysis

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    /// Sidelobe attenuation: ~53 dB
    #[default]
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

impl WindowType {
    /// Value of the window at index `n` of a window of length `length`
    fn coefficient(&self, n: usize, length: usize) -> f64 {
        // A single-point window is the identity for every shape
        if length == 1 {
            return 1.0;
        }

        let angle = 2.0 * PI * n as f64 / (length - 1) as f64;
        match self {
            WindowType::Hann => 0.5 - 0.5 * angle.cos(),
            WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
            WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
            WindowType::Rectangular => 1.0,
        }
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1 (symmetric form)
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    (0..length)
        .map(|n| window_type.coefficient(n, length))
        .collect()
}

/// Multiply `samples` elementwise by `window` in place
///
/// Extra samples beyond the window length are left untouched.
pub fn apply_window_inplace(samples: &mut [f64], window: &[f64]) {
    for (s, &w) in samples.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

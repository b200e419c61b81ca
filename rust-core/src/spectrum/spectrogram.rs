//! Time-frequency array produced by the framed transform
//!
//! Rows are analysis frames in chronological order, columns are DFT bins in
//! the standard layout (DC, positive frequencies, then negative frequencies).

use super::fft::magnitude_db;
use crate::error::{DspError, Result};
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use num_complex::Complex64;

/// Complex spectrogram: frames × bins
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Array2<Complex64>,
}

impl Spectrogram {
    /// Wrap an existing frames × bins array
    pub fn new(data: Array2<Complex64>) -> Self {
        Self { data }
    }

    /// Spectrogram with no frames for a transform of length `window`
    pub fn empty(window: usize) -> Self {
        Self {
            data: Array2::from_elem((0, window), Complex64::new(0.0, 0.0)),
        }
    }

    /// Build from per-frame spectra, which must all have `window` bins
    pub fn from_frames(frames: Vec<Vec<Complex64>>, window: usize) -> Result<Self> {
        let num_frames = frames.len();
        let mut flat = Vec::with_capacity(num_frames * window);

        for (frame, spectrum) in frames.into_iter().enumerate() {
            if spectrum.len() != window {
                return Err(DspError::DimensionMismatch {
                    frame,
                    expected: window,
                    found: spectrum.len(),
                });
            }
            flat.extend(spectrum);
        }

        let data = Array2::from_shape_vec((num_frames, window), flat)
            .map_err(|e| DspError::InvalidDimension(e.to_string()))?;
        Ok(Self { data })
    }

    /// Number of analysis frames
    pub fn num_frames(&self) -> usize {
        self.data.nrows()
    }

    /// Bins per frame (the transform length)
    pub fn window(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.num_frames() == 0
    }

    /// Spectrum of frame `index`, if present
    pub fn frame(&self, index: usize) -> Option<ArrayView1<'_, Complex64>> {
        (index < self.num_frames()).then(|| self.data.row(index))
    }

    pub fn as_array(&self) -> &Array2<Complex64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<Complex64> {
        self.data
    }

    /// Non-negative frequency bins `0..=window/2` of every frame
    pub fn positive_bins(&self) -> ArrayView2<'_, Complex64> {
        let end = (self.window() / 2 + 1).min(self.window());
        self.data.slice(s![.., ..end])
    }

    /// 20*log10(|X|) for every cell, magnitudes floored at 1e-10
    pub fn magnitude_db(&self) -> Array2<f64> {
        self.data.mapv(|c| magnitude_db(c.norm()))
    }

    /// Start time in seconds of each frame
    pub fn frame_times(&self, step: usize, sample_rate: f64) -> Vec<f64> {
        (0..self.num_frames())
            .map(|i| (i * step) as f64 / sample_rate)
            .collect()
    }

    /// Frequency in Hz of every bin, negative above `window/2`
    pub fn bin_frequencies(&self, sample_rate: f64) -> Vec<f64> {
        let n = self.window();
        let resolution = sample_rate / n as f64;
        (0..n)
            .map(|k| {
                if k <= n / 2 {
                    k as f64 * resolution
                } else {
                    -((n - k) as f64) * resolution
                }
            })
            .collect()
    }

    /// Total |X|^2 over all frames for non-negative bins in `[low_hz, high_hz)`
    pub fn band_energy(&self, sample_rate: f64, low_hz: f64, high_hz: f64) -> f64 {
        let resolution = sample_rate / self.window() as f64;

        self.positive_bins()
            .indexed_iter()
            .filter(|((_, k), _)| {
                let f = *k as f64 * resolution;
                f >= low_hz && f < high_hz
            })
            .map(|(_, c)| c.norm_sqr())
            .sum()
    }
}

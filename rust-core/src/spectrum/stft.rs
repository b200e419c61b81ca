//! Framed forward / inverse spectral transform
//!
//! Frames start every `step` samples and span `window` samples. The frame
//! count is `(len - window) / step` (floor), so a trailing partial frame and
//! the final full frame are both dropped.
//!
//! The inverse is a plain overlap-add of the real parts of each inverse DFT.
//! It does not divide by the accumulated analysis-window energy, so it is
//! only an exact inverse for non-overlapping frames with a rectangular window.

use super::fft::FftEngine;
use super::spectrogram::Spectrogram;
use crate::error::{DspError, Result};
use crate::filters::windows::{apply_window_inplace, generate_window, WindowType};
use ndarray::Array2;
use num_complex::Complex64;

fn check_dimensions(window: usize, step: usize) -> Result<()> {
    if window == 0 {
        return Err(DspError::InvalidDimension(
            "window length must be positive".to_string(),
        ));
    }
    if step == 0 {
        return Err(DspError::InvalidDimension(
            "step must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Number of analysis frames for a signal of `signal_len` samples
///
/// Signals shorter than `window` are rejected rather than producing a
/// negative count.
pub fn frame_count(signal_len: usize, window: usize, step: usize) -> Result<usize> {
    check_dimensions(window, step)?;

    if signal_len < window {
        return Err(DspError::InvalidDimension(format!(
            "signal of {} samples is shorter than the {}-sample window",
            signal_len, window
        )));
    }

    Ok((signal_len - window) / step)
}

/// Forward framed transform with a Hamming analysis window
pub fn stft(signal: &[f64], window: usize, step: usize) -> Result<Spectrogram> {
    stft_with_window(signal, window, step, WindowType::Hamming)
}

/// Forward framed transform with a selectable analysis window
///
/// Frame `i` is `signal[i*step .. i*step + window]`, multiplied by the
/// window and transformed with a full-length DFT.
pub fn stft_with_window(
    signal: &[f64],
    window: usize,
    step: usize,
    window_type: WindowType,
) -> Result<Spectrogram> {
    let num_frames = frame_count(signal.len(), window, step)?;
    if num_frames == 0 {
        return Ok(Spectrogram::empty(window));
    }

    let engine = FftEngine::new(window)?;
    let taper = generate_window(window_type, window);

    let mut data = Array2::from_elem((num_frames, window), Complex64::new(0.0, 0.0));
    let mut frame = vec![0.0; window];

    for (i, mut row) in data.rows_mut().into_iter().enumerate() {
        let start = i * step;
        frame.copy_from_slice(&signal[start..start + window]);
        apply_window_inplace(&mut frame, &taper);

        let spectrum = engine.forward_real(&frame);
        for (cell, value) in row.iter_mut().zip(spectrum) {
            *cell = value;
        }
    }

    Ok(Spectrogram::new(data))
}

/// Inverse framed transform by overlap-add
///
/// # Arguments
/// * `spectrogram` - Per-frame spectra, each of length `window`
/// * `frame_length` - Length of the reconstructed signal
/// * `window` - Transform length used in the forward pass
/// * `step` - Hop size used in the forward pass
///
/// # Returns
/// `frame_length` samples. Frame `i` lands at `[i*step, i*step + window)`;
/// samples falling past `frame_length` are dropped.
pub fn istft(
    spectrogram: &Spectrogram,
    frame_length: usize,
    window: usize,
    step: usize,
) -> Result<Vec<f64>> {
    check_dimensions(window, step)?;

    if !spectrogram.is_empty() && spectrogram.window() != window {
        return Err(DspError::DimensionMismatch {
            frame: 0,
            expected: window,
            found: spectrogram.window(),
        });
    }

    let mut output = vec![0.0; frame_length];
    if spectrogram.is_empty() {
        return Ok(output);
    }

    let engine = FftEngine::new(window)?;

    for (i, row) in spectrogram.as_array().rows().into_iter().enumerate() {
        let start = i * step;
        if start >= frame_length {
            break;
        }

        let spectrum: Vec<Complex64> = row.to_vec();
        let time = engine.inverse(&spectrum)?;

        for (out, sample) in output[start..].iter_mut().zip(time.iter()) {
            *out += sample.re;
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(frequency: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * frequency * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_frame_count_law() {
        for (len, window, step) in [(32000, 1024, 512), (1024, 1024, 512), (2047, 1024, 512), (5000, 256, 100)] {
            let signal = vec![0.0; len];
            let spec = stft(&signal, window, step).unwrap();
            assert_eq!(spec.num_frames(), (len - window) / step);
            assert_eq!(spec.window(), window);
        }
    }

    #[test]
    fn test_short_signal_rejected() {
        let signal = vec![0.0; 1000];
        assert!(matches!(
            stft(&signal, 1024, 512),
            Err(DspError::InvalidDimension(_))
        ));
        assert!(matches!(
            frame_count(1000, 1024, 512),
            Err(DspError::InvalidDimension(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let signal = vec![0.0; 4096];
        assert!(matches!(stft(&signal, 0, 512), Err(DspError::InvalidDimension(_))));
        assert!(matches!(stft(&signal, 1024, 0), Err(DspError::InvalidDimension(_))));
    }

    #[test]
    fn test_single_frame_signal_yields_empty_spectrogram() {
        // window <= len < window + step is a legal zero-frame result
        let spec = stft(&vec![1.0; 1500], 1024, 512).unwrap();
        assert!(spec.is_empty());
        assert_eq!(spec.window(), 1024);
    }

    #[test]
    fn test_tone_peak_bin() {
        let sample_rate = 16000.0;
        let signal = tone(1000.0, sample_rate, 16000);
        let spec = stft(&signal, 1024, 512).unwrap();

        // 1000 Hz at 15.625 Hz/bin falls on bin 64 and its mirror 960
        let frame = spec.frame(10).unwrap();
        let (peak, _) = frame
            .iter()
            .take(513)
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().partial_cmp(&b.norm()).unwrap())
            .unwrap();
        assert_eq!(peak, 64);
        assert!((frame[64].norm() - frame[960].norm()).abs() < 1e-6);
    }

    #[test]
    fn test_frame_matches_direct_windowed_dft() {
        let signal: Vec<f64> = (0..600).map(|n| ((n * 31) % 17) as f64 - 8.0).collect();
        let spec = stft(&signal, 64, 48).unwrap();

        let taper = generate_window(WindowType::Hamming, 64);
        let frame_index = 3;
        let start = frame_index * 48;

        for k in [0usize, 1, 7, 32, 50] {
            let mut expected = Complex64::new(0.0, 0.0);
            for n in 0..64 {
                let angle = -2.0 * PI * (k * n) as f64 / 64.0;
                expected += signal[start + n] * taper[n] * Complex64::from_polar(1.0, angle);
            }
            let actual = spec.frame(frame_index).unwrap()[k];
            assert!((actual - expected).norm() < 1e-9, "Mismatch at bin {}", k);
        }
    }

    #[test]
    fn test_round_trip_rectangular_non_overlapping() {
        let window = 256;
        let signal = tone(440.0, 16000.0, window * 5);

        let spec = stft_with_window(&signal, window, window, WindowType::Rectangular).unwrap();
        assert_eq!(spec.num_frames(), 4);

        let restored = istft(&spec, signal.len(), window, window).unwrap();
        assert_eq!(restored.len(), signal.len());

        let covered = spec.num_frames() * window;
        for i in 0..covered {
            assert!((restored[i] - signal[i]).abs() < 1e-10, "Mismatch at {}", i);
        }
        // Past the last analysed frame nothing is written
        assert!(restored[covered..].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_round_trip_hamming_is_unnormalized() {
        let window = 128;
        let signal = tone(440.0, 16000.0, window * 4);

        let spec = stft(&signal, window, window).unwrap();
        let restored = istft(&spec, signal.len(), window, window).unwrap();
        let taper = generate_window(WindowType::Hamming, window);

        // Each frame comes back still multiplied by the analysis window
        for i in 0..spec.num_frames() * window {
            let expected = signal[i] * taper[i % window];
            assert!((restored[i] - expected).abs() < 1e-10, "Mismatch at {}", i);
        }
    }

    #[test]
    fn test_istft_sums_overlapping_frames() {
        let window = 8;
        let step = 4;
        let signal: Vec<f64> = (0..32).map(|n| (n as f64 * 0.37).sin() + 0.5).collect();

        // Rectangular: frames at 0, 4, .., 20 cover [0, 28), inner hops twice
        let spec = stft_with_window(&signal, window, step, WindowType::Rectangular).unwrap();
        assert_eq!(spec.num_frames(), 6);

        let restored = istft(&spec, signal.len(), window, step).unwrap();
        for i in 0..signal.len() {
            let coverage = match i {
                0..=3 | 24..=27 => 1.0,
                4..=23 => 2.0,
                _ => 0.0,
            };
            let expected = coverage * signal[i];
            assert!(
                (restored[i] - expected).abs() < 1e-10,
                "Mismatch at {}: {} vs {}",
                i,
                restored[i],
                expected
            );
        }

        // Hamming: each sample is the sum of its windowed copies, unnormalized
        let spec = stft(&signal, window, step).unwrap();
        let restored = istft(&spec, signal.len(), window, step).unwrap();
        let taper = generate_window(WindowType::Hamming, window);

        let mut expected = vec![0.0; signal.len()];
        for frame in 0..spec.num_frames() {
            let start = frame * step;
            for n in 0..window {
                expected[start + n] += signal[start + n] * taper[n];
            }
        }
        for (i, (r, e)) in restored.iter().zip(expected.iter()).enumerate() {
            assert!((r - e).abs() < 1e-10, "Mismatch at {}: {} vs {}", i, r, e);
        }
    }

    #[test]
    fn test_istft_truncates_to_frame_length() {
        let spec = stft_with_window(&vec![1.0; 64], 16, 16, WindowType::Rectangular).unwrap();
        assert_eq!(spec.num_frames(), 3);

        let restored = istft(&spec, 40, 16, 16).unwrap();
        assert_eq!(restored.len(), 40);
        assert!(restored.iter().all(|&x| (x - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_istft_dimension_mismatch() {
        let spec = stft(&vec![0.0; 4096], 1024, 512).unwrap();
        let err = istft(&spec, 4096, 512, 256).unwrap_err();
        assert_eq!(
            err,
            DspError::DimensionMismatch {
                frame: 0,
                expected: 512,
                found: 1024
            }
        );
    }

    #[test]
    fn test_istft_empty() {
        let restored = istft(&Spectrogram::empty(64), 100, 64, 32).unwrap();
        assert_eq!(restored, vec![0.0; 100]);
    }
}

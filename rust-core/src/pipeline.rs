//! Offline analyse → filter → re-analyse pipeline
//!
//! Takes a decoded mono signal, computes its spectrogram, designs a
//! windowed-sinc FIR filter, convolves the signal with it and computes the
//! spectrogram of the result. Everything is returned as numeric arrays for
//! an external presentation layer.

use crate::error::{DspError, Result};
use crate::filters::design::{
    filter_response, response_magnitude_db, FilterDesign, FilterKind, DEFAULT_FIR_SIZE,
};
use crate::filters::windows::WindowType;
use crate::filters::convolution::convolve;
use crate::spectrum::spectrogram::Spectrogram;
use crate::spectrum::stft::stft_with_window;
use num_complex::Complex64;

/// Default analysis frame length
pub const DEFAULT_WINDOW: usize = 1024;

/// Default hop between analysis frames
pub const DEFAULT_STEP: usize = 512;

/// Default filter cutoff in Hz
pub const DEFAULT_CUTOFF_HZ: f64 = 1000.0;

/// Mono sample sequence with its sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Signal {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(DspError::InvalidSampleRate(0.0));
        }
        if samples.is_empty() {
            return Err(DspError::EmptyInput("signal"));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Time of each sample in seconds (n / fs)
    pub fn time_axis(&self) -> Vec<f64> {
        let fs = self.sample_rate as f64;
        (0..self.samples.len()).map(|n| n as f64 / fs).collect()
    }
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Analysis frame length (samples)
    pub window: usize,

    /// Hop between analysis frames (samples)
    pub step: usize,

    /// Filter cutoff in Hz
    pub cutoff_hz: f64,

    /// Number of FIR taps (positive, even)
    pub fir_size: usize,

    /// High-pass or low-pass
    pub filter_kind: FilterKind,

    /// Analysis window for both spectrograms
    pub window_type: WindowType,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            step: DEFAULT_STEP,
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            fir_size: DEFAULT_FIR_SIZE,
            filter_kind: FilterKind::Highpass,
            window_type: WindowType::Hamming,
        }
    }
}

impl PipelineConfig {
    /// Check frame geometry; cutoff and FIR size are checked against the
    /// signal's sample rate when the filter is designed
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 || self.step == 0 {
            return Err(DspError::InvalidDimension(format!(
                "window ({}) and step ({}) must be positive",
                self.window, self.step
            )));
        }
        if self.step > self.window {
            log::warn!(
                "step {} exceeds window {}: frames will not overlap and samples are skipped",
                self.step,
                self.window
            );
        }
        Ok(())
    }

    fn filter_design(&self, sample_rate: f64) -> FilterDesign {
        FilterDesign {
            kind: self.filter_kind,
            cutoff_hz: self.cutoff_hz,
            sample_rate,
            fir_size: self.fir_size,
            window_type: WindowType::Hamming,
        }
    }
}

/// Everything the presentation layer draws for one run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Raw input samples and sample rate
    pub signal: Signal,

    /// Spectrogram of the raw signal
    pub original_spectrogram: Spectrogram,

    /// FIR kernel
    pub filter: Vec<f64>,

    /// Full-length DFT of the kernel
    pub filter_response: Vec<Complex64>,

    /// Signal convolved with the kernel (len + fir_size - 1 samples)
    pub filtered: Vec<f64>,

    /// Spectrogram of the filtered signal
    pub filtered_spectrogram: Spectrogram,
}

impl PipelineOutput {
    /// Kernel magnitude response over `0..fs/2` as `(frequencies_hz, db)`
    pub fn filter_magnitude_db(&self) -> (Vec<f64>, Vec<f64>) {
        response_magnitude_db(&self.filter_response, self.signal.sample_rate() as f64)
    }
}

/// Stateless pipeline runner
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run analysis, filter design, convolution and re-analysis
    pub fn run(&self, signal: Signal) -> Result<PipelineOutput> {
        let config = &self.config;
        config.validate()?;

        let sample_rate = signal.sample_rate() as f64;
        let design = config.filter_design(sample_rate);
        design.validate()?;

        log::debug!(
            "Pipeline start: {} samples at {} Hz ({:.2} s)",
            signal.len(),
            signal.sample_rate(),
            signal.duration_secs()
        );

        let original_spectrogram =
            stft_with_window(signal.samples(), config.window, config.step, config.window_type)?;
        log::debug!(
            "Original spectrogram: {} frames x {} bins",
            original_spectrogram.num_frames(),
            original_spectrogram.window()
        );
        if original_spectrogram.is_empty() {
            log::warn!(
                "Signal of {} samples yields no complete analysis frames (window {}, step {})",
                signal.len(),
                config.window,
                config.step
            );
        }

        let filter = design.coefficients()?;
        let filter_response = filter_response(&filter)?;
        log::debug!(
            "{:?} kernel: {} taps, cutoff {} Hz",
            config.filter_kind,
            filter.len(),
            config.cutoff_hz
        );

        let filtered = convolve(signal.samples(), &filter);
        log::debug!("Filtered signal: {} samples", filtered.len());

        let filtered_spectrogram =
            stft_with_window(&filtered, config.window, config.step, config.window_type)?;

        Ok(PipelineOutput {
            signal,
            original_spectrogram,
            filter,
            filter_response,
            filtered,
            filtered_spectrogram,
        })
    }
}

/// Run the pipeline once with `config`
pub fn run(signal: Signal, config: &PipelineConfig) -> Result<PipelineOutput> {
    Pipeline::new(config.clone()).run(signal)
}

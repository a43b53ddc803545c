// FFT module - Fast Fourier Transform computation
//
// This module handles FFT computation with Hann windowing to reduce spectral
// leakage. The plan is built once and shared immutably, so one processor can
// serve concurrent extractions without locking.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Frame size for spectral features
pub const SPECTRAL_FRAME: usize = 2048;

/// Hop between consecutive analysis frames
pub const SPECTRAL_HOP: usize = 512;

/// FFT processor that computes magnitude spectra from audio frames
pub struct FftProcessor {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window for FFT (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    /// Create a new FFT processor
    ///
    /// # Arguments
    /// * `fft_size` - FFT window size (SPECTRAL_FRAME for feature extraction)
    pub fn new(fft_size: usize) -> Self {
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Compute magnitude spectrum using FFT
    ///
    /// Applies Hann windowing, zero-pads frames shorter than the FFT size,
    /// and returns magnitudes for positive frequencies only.
    ///
    /// # Returns
    /// Magnitude spectrum (size = fft_size / 2 + 1)
    pub fn compute_magnitude_spectrum(&self, audio: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = audio
            .iter()
            .zip(self.window.iter())
            .map(|(&sample, &w)| Complex::new(sample * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer[..self.fft_size / 2 + 1]
            .iter()
            .map(|c| c.norm())
            .collect()
    }
}

/// Split `samples` into frames of `frame` samples every `hop` samples.
///
/// The last frame may be shorter; a non-empty input always yields at least
/// one frame.
pub fn frames(samples: &[f32], frame: usize, hop: usize) -> Vec<&[f32]> {
    let mut out = Vec::new();
    if samples.is_empty() || frame == 0 || hop == 0 {
        return out;
    }

    let mut start = 0;
    loop {
        let end = (start + frame).min(samples.len());
        out.push(&samples[start..end]);
        if end >= samples.len() {
            break;
        }
        start += hop;
    }
    out
}

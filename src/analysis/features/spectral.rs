// Spectral module - Frequency-domain feature extraction
//
// This module computes spectral features from magnitude spectra.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Spectral rolloff threshold (85% of cumulative magnitude)
const ROLLOFF_THRESHOLD: f64 = 0.85;

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz
    /// * `fft_size` - FFT window size
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    fn bin_width(&self) -> f64 {
        self.sample_rate as f64 / self.fft_size as f64
    }

    /// Compute spectral centroid (weighted mean frequency)
    ///
    /// Formula: centroid = Σ(f_i × |X[i]|) / Σ|X[i]|
    ///
    /// # Returns
    /// Spectral centroid in Hz, 0 for an all-zero spectrum
    pub fn compute_centroid(&self, spectrum: &[f32]) -> f64 {
        let bin_width = self.bin_width();

        let weighted_sum: f64 = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| i as f64 * bin_width * mag as f64)
            .sum();

        let magnitude_sum: f64 = spectrum.iter().map(|&mag| mag as f64).sum();

        if magnitude_sum > 1e-10 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }

    /// Compute spectral rolloff (frequency below which 85% of the magnitude lies)
    ///
    /// # Returns
    /// Rolloff frequency in Hz, 0 for an all-zero spectrum
    pub fn compute_rolloff(&self, spectrum: &[f32]) -> f64 {
        let total: f64 = spectrum.iter().map(|&mag| mag as f64).sum();

        if total < 1e-10 {
            return 0.0;
        }

        let threshold = ROLLOFF_THRESHOLD * total;
        let bin_width = self.bin_width();

        let mut cumulative = 0.0;
        for (i, &mag) in spectrum.iter().enumerate() {
            cumulative += mag as f64;
            if cumulative >= threshold {
                return i as f64 * bin_width;
            }
        }

        // If we reach here, return Nyquist frequency
        (spectrum.len() - 1) as f64 * bin_width
    }
}

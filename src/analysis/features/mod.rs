// FeatureExtractor - acoustic description of a silence and its context
//
// This module turns a silence region plus up to one second of audio on each
// side into the fixed ten-slot FeatureVector consumed by the learned
// classifier and by training.
//
// Module organization:
// - types: FeatureVector and the schema version binding its layout
// - fft: FFT computation with windowing, frame splitting
// - spectral: Frequency-domain features (centroid, rolloff)
// - temporal: Time-domain features (RMS, ZCR, fade score, abruptness)
// - mod.rs: Coordinator (FeatureExtractor)
//
// Degenerate inputs (empty region, short context, all-zero energy) resolve to
// 0.0 in the affected slots; no slot is ever NaN or infinite.

pub mod fft;
pub mod spectral;
pub mod temporal;
mod types;

pub use types::{slot, FeatureVector, FEATURE_DIM, FEATURE_NAMES, FEATURE_SCHEMA_VERSION};

use crate::audio::RegionWindow;
use fft::{frames, FftProcessor, SPECTRAL_FRAME, SPECTRAL_HOP};
use spectral::SpectralFeatures;
use temporal::{fade_score, mean_zcr, rms, transition_abruptness};

/// Regions and contexts must be longer than this to be analysed
pub const MIN_ANALYSIS_SAMPLES: usize = 512;

/// FeatureExtractor coordinates the feature extraction pipeline
///
/// Extraction is pure: the only state is the pre-planned FFT, which is
/// shared immutably, so a single extractor can be used from many threads.
pub struct FeatureExtractor {
    fft_processor: FftProcessor,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            fft_processor: FftProcessor::new(SPECTRAL_FRAME),
        }
    }

    /// Feature layout version this extractor produces
    pub fn schema_version(&self) -> u32 {
        FEATURE_SCHEMA_VERSION
    }

    /// Extract the feature vector for one silence region
    ///
    /// # Arguments
    /// * `region` - Samples inside the silence interval
    /// * `sample_rate` - Sample rate in Hz
    /// * `context_before` - Audio immediately preceding the region
    /// * `context_after` - Audio immediately following the region
    pub fn extract(
        &self,
        region: &[f32],
        sample_rate: u32,
        context_before: Option<&[f32]>,
        context_after: Option<&[f32]>,
    ) -> FeatureVector {
        let mut values = [0.0; FEATURE_DIM];

        if sample_rate > 0 {
            values[slot::DURATION] = region.len() as f64 / sample_rate as f64;
        }
        values[slot::RMS_ENERGY] = rms(region);

        if region.len() > MIN_ANALYSIS_SAMPLES && sample_rate > 0 {
            let (centroid, rolloff) = self.spectral_means(region, sample_rate);
            values[slot::SPECTRAL_CENTROID] = centroid;
            values[slot::SPECTRAL_ROLLOFF] = rolloff;
        }

        if let Some(before) = context_before.filter(|c| c.len() > MIN_ANALYSIS_SAMPLES) {
            values[slot::CONTEXT_RMS_BEFORE] = rms(before);
            values[slot::FADE_IN_SCORE] = fade_score(before);
        }

        if let Some(after) = context_after.filter(|c| c.len() > MIN_ANALYSIS_SAMPLES) {
            values[slot::CONTEXT_RMS_AFTER] = rms(after);
            // Reversed so both scores measure a fade toward the silence
            let reversed: Vec<f32> = after.iter().rev().copied().collect();
            values[slot::FADE_OUT_SCORE] = fade_score(&reversed);
        }

        if let (Some(before), Some(after)) = (context_before, context_after) {
            values[slot::TRANSITION_ABRUPTNESS] = transition_abruptness(before, after);
        }

        values[slot::ZERO_CROSSING_RATE] = mean_zcr(region);

        FeatureVector::from_array(values)
    }

    /// Extract from a sliced [`RegionWindow`]; both contexts count as present.
    pub fn extract_window(&self, window: &RegionWindow<'_>, sample_rate: u32) -> FeatureVector {
        self.extract(
            window.region,
            sample_rate,
            Some(window.before),
            Some(window.after),
        )
    }

    /// Mean spectral centroid and rolloff over overlapping frames
    fn spectral_means(&self, region: &[f32], sample_rate: u32) -> (f64, f64) {
        let spectral = SpectralFeatures::new(sample_rate, self.fft_processor.fft_size());
        let framed = frames(region, SPECTRAL_FRAME, SPECTRAL_HOP);
        if framed.is_empty() {
            return (0.0, 0.0);
        }

        let (centroid_sum, rolloff_sum) =
            framed.iter().fold((0.0, 0.0), |(centroid, rolloff), frame| {
                let spectrum = self.fft_processor.compute_magnitude_spectrum(frame);
                (
                    centroid + spectral.compute_centroid(&spectrum),
                    rolloff + spectral.compute_rolloff(&spectrum),
                )
            });

        let count = framed.len() as f64;
        (centroid_sum / count, rolloff_sum / count)
    }
}

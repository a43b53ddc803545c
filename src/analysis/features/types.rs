// Types module - the fixed-layout feature vector
//
// The layout below is bound to FEATURE_SCHEMA_VERSION. Any change to the
// order, count or meaning of a slot must bump the version so persisted model
// artifacts trained on the old layout are rejected instead of misread.

use serde::{Deserialize, Serialize};

/// Version of the feature layout produced by `FeatureExtractor`
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Number of slots in a feature vector
pub const FEATURE_DIM: usize = 10;

/// Slot names in schema order
pub const FEATURE_NAMES: [&str; FEATURE_DIM] = [
    "duration",
    "rms_energy",
    "spectral_centroid",
    "spectral_rolloff",
    "context_rms_before",
    "fade_in_score",
    "context_rms_after",
    "fade_out_score",
    "transition_abruptness",
    "zero_crossing_rate",
];

/// Slot indices, in schema order
pub mod slot {
    pub const DURATION: usize = 0;
    pub const RMS_ENERGY: usize = 1;
    pub const SPECTRAL_CENTROID: usize = 2;
    pub const SPECTRAL_ROLLOFF: usize = 3;
    pub const CONTEXT_RMS_BEFORE: usize = 4;
    pub const FADE_IN_SCORE: usize = 5;
    pub const CONTEXT_RMS_AFTER: usize = 6;
    pub const FADE_OUT_SCORE: usize = 7;
    pub const TRANSITION_ABRUPTNESS: usize = 8;
    pub const ZERO_CROSSING_RATE: usize = 9;
}

/// Acoustic description of one silence region and its context.
///
/// Values are always finite: non-finite inputs are replaced by 0.0 when the
/// vector is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; FEATURE_DIM]", into = "[f64; FEATURE_DIM]")]
pub struct FeatureVector {
    values: [f64; FEATURE_DIM],
}

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_DIM]) -> Self {
        Self {
            values: values.map(|v| if v.is_finite() { v } else { 0.0 }),
        }
    }

    pub fn as_array(&self) -> &[f64; FEATURE_DIM] {
        &self.values
    }

    pub fn get(&self, slot: usize) -> f64 {
        self.values[slot]
    }

    pub fn duration(&self) -> f64 {
        self.values[slot::DURATION]
    }

    pub fn rms_energy(&self) -> f64 {
        self.values[slot::RMS_ENERGY]
    }

    pub fn transition_abruptness(&self) -> f64 {
        self.values[slot::TRANSITION_ABRUPTNESS]
    }

    /// Iterate `(name, value)` pairs in schema order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

impl From<[f64; FEATURE_DIM]> for FeatureVector {
    fn from(values: [f64; FEATURE_DIM]) -> Self {
        Self::from_array(values)
    }
}

impl From<FeatureVector> for [f64; FEATURE_DIM] {
    fn from(vector: FeatureVector) -> Self {
        vector.values
    }
}

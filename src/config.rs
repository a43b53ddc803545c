//! Configuration management for blank detection
//!
//! This module provides runtime configuration loading from JSON files so
//! segmentation thresholds, rule thresholds and training hyperparameters can
//! be tuned without recompilation. Every section falls back to its defaults
//! when omitted from the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use std::sync::Arc;

use crate::analysis::classifier::{
    ClassifierFacade, RuleBasedClassifier, RuleThresholds, DEFAULT_CONTEXT_SECS,
};
use crate::analysis::features::FeatureExtractor;
use crate::analysis::segmenter::{SilenceSegmenter, DEFAULT_FRAME_MS};
use crate::model::ForestParams;

/// Default location of the trained model artifact
pub const DEFAULT_MODEL_PATH: &str = "models/blank_classifier.json";

/// Default config file read by the CLI when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config/blank_detector.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub segmentation: SegmentationConfig,
    pub classifier: ClassifierConfig,
    pub training: ForestParams,
}

/// Silence segmentation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Frames below this dBFS level are silent
    pub threshold_db: f64,
    /// Silence runs shorter than this (seconds) are ignored
    pub min_silence_duration: f64,
    /// Analysis frame length in milliseconds
    pub frame_ms: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold_db: -40.0,
            min_silence_duration: 3.0,
            frame_ms: DEFAULT_FRAME_MS,
        }
    }
}

/// Classifier facade parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Trained artifact location (absent file = rule-based classification)
    pub model_path: PathBuf,
    /// Context captured on each side of a blank (seconds)
    pub context_seconds: f64,
    /// Rule cascade thresholds
    pub rules: RuleThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            context_seconds: DEFAULT_CONTEXT_SECS,
            rules: RuleThresholds::default(),
        }
    }
}

impl SegmentationConfig {
    pub fn segmenter(&self) -> SilenceSegmenter {
        SilenceSegmenter::new(self.frame_ms)
    }
}

impl ClassifierConfig {
    /// Build a facade from the configured artifact (rules when absent)
    pub fn build_facade(&self, extractor: Arc<FeatureExtractor>) -> ClassifierFacade {
        ClassifierFacade::load(
            &self.model_path,
            RuleBasedClassifier::new(self.rules),
            extractor,
        )
        .with_context_secs(self.context_seconds)
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or the defaults if the file doesn't exist or the
    /// JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load from the default location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}

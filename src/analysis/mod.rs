// Analysis module - segmentation and feature extraction
//
// Pipeline: AudioSignal → SilenceSegmenter → SilenceInterval → (per interval,
// with context) FeatureExtractor → classifier. Everything here is stateless
// over its inputs and safe to call from several threads at once.

pub mod classifier;
pub mod features;
pub mod interval;
pub mod levels;
pub mod segmenter;

pub use classifier::{
    BlankLabel, ClassificationMethod, ClassificationResult, ClassifiedSilence, ClassifierFacade,
    ClassifierState, LearnedClassifier, RuleBasedClassifier, RuleThresholds, SharedClassifier,
};
pub use features::{FeatureExtractor, FeatureVector, FEATURE_DIM, FEATURE_SCHEMA_VERSION};
pub use interval::SilenceInterval;
pub use levels::LevelAnalysis;
pub use segmenter::SilenceSegmenter;

// Blank Detector - silence detection and NATURAL/ABNORMAL classification
// Offline analysis of decoded recordings with rule-based and learned classifiers

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod detector;
pub mod error;
pub mod model;
pub mod testing;

// Re-exports for convenience
pub use analysis::{
    BlankLabel, ClassificationMethod, ClassificationResult, ClassifiedSilence, ClassifierFacade,
    ClassifierState, FeatureExtractor, FeatureVector, LevelAnalysis, RuleBasedClassifier,
    RuleThresholds, SharedClassifier, SilenceInterval, SilenceSegmenter,
};
pub use audio::{AudioSignal, AudioSource, MemoryAudioSource, WavFileSource};
pub use config::AppConfig;
pub use detector::{BlankDetector, SilenceReport};
pub use error::{AudioError, ErrorCode, ModelError};
pub use model::{
    EvaluationReport, ForestParams, ModelEvaluator, ModelTrainer, TrainedModelArtifact,
    TrainingExample, TrainingOutcome,
};

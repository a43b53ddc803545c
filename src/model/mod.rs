// Model module - learned blank classification
//
// Offline side of the engine: labelled examples are turned into a feature
// matrix, standardized, and fitted with a seeded random forest. The result is
// persisted as a versioned JSON artifact that the classifier facade loads
// read-only.
//
// Module organization:
// - dataset: TrainingExample records and JSON loading
// - scaler: per-feature standardization parameters
// - forest: seeded random forest with probability output
// - artifact: versioned, schema-checked persistence
// - cache: per-pass decode cache released after each recording's last example
// - trainer: ModelTrainer (feature matrix + fit + persist)
// - evaluator: ModelEvaluator (accuracy against held-out examples)

pub mod artifact;
mod cache;
pub mod dataset;
pub mod evaluator;
pub mod forest;
pub mod scaler;
pub mod trainer;

pub use artifact::TrainedModelArtifact;
pub use dataset::{load_examples, TrainingExample};
pub use evaluator::{EvaluationReport, ModelEvaluator};
pub use forest::{ForestParams, RandomForest};
pub use scaler::StandardScaler;
pub use trainer::{ModelTrainer, SkippedExample, TrainingOutcome};

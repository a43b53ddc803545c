// Trainer module - fit and persist the learned blank classifier
//
// Examples reference recordings through an injected AudioSource. Each
// recording is decoded once per run and released after its last example.
// Features go through the same window/extract path the classifier facade uses
// at inference time.

use std::path::Path;
use std::sync::Arc;

use crate::analysis::classifier::{BlankLabel, DEFAULT_CONTEXT_SECS};
use crate::analysis::features::{FeatureExtractor, FeatureVector};
use crate::audio::AudioSource;
use crate::error::{AudioError, ModelError};
use crate::model::artifact::TrainedModelArtifact;
use crate::model::cache::RecordingCache;
use crate::model::dataset::TrainingExample;
use crate::model::forest::{ForestParams, RandomForest, ABNORMAL_CLASS, NATURAL_CLASS};
use crate::model::scaler::StandardScaler;

/// Example excluded from the training matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedExample {
    /// Position in the input list
    pub index: usize,
    pub audio_ref: String,
    pub error: AudioError,
}

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: TrainedModelArtifact,
    /// Rows in the training matrix
    pub samples: usize,
    pub skipped: Vec<SkippedExample>,
    /// Accuracy of the fitted model on its own training matrix
    pub training_accuracy: f64,
}

/// Builds feature matrices and fits the random forest
pub struct ModelTrainer {
    source: Arc<dyn AudioSource>,
    extractor: Arc<FeatureExtractor>,
    params: ForestParams,
    context_secs: f64,
}

impl ModelTrainer {
    pub fn new(
        source: Arc<dyn AudioSource>,
        extractor: Arc<FeatureExtractor>,
        params: ForestParams,
    ) -> Self {
        Self {
            source,
            extractor,
            params,
            context_secs: DEFAULT_CONTEXT_SECS,
        }
    }

    pub fn with_context_secs(mut self, context_secs: f64) -> Self {
        self.context_secs = context_secs.max(0.0);
        self
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Extract one feature vector and class per usable example
    ///
    /// # Arguments
    /// * `examples` - Labelled intervals
    ///
    /// # Returns
    /// Tuple of (feature rows, classes, skipped examples). Examples whose
    /// audio is missing or undecodable, or whose interval lies outside the
    /// recording, are skipped with a warning.
    pub fn build_matrix(
        &self,
        examples: &[TrainingExample],
    ) -> (Vec<FeatureVector>, Vec<u8>, Vec<SkippedExample>) {
        let mut recordings = RecordingCache::new(self.source.as_ref(), examples);
        let mut rows = Vec::with_capacity(examples.len());
        let mut classes = Vec::with_capacity(examples.len());
        let mut skipped = Vec::new();

        for (index, example) in examples.iter().enumerate() {
            let features = recordings.with_signal(index, &example.audio_ref, |signal| {
                let window = signal.window(&example.interval, self.context_secs)?;
                Ok(self.extractor.extract_window(&window, signal.sample_rate()))
            });

            match features {
                Ok(features) => {
                    rows.push(features);
                    classes.push(match example.label {
                        BlankLabel::Natural => NATURAL_CLASS,
                        BlankLabel::Abnormal => ABNORMAL_CLASS,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        index,
                        audio_ref = %example.audio_ref,
                        %error,
                        "[ModelTrainer] Skipping example"
                    );
                    skipped.push(SkippedExample {
                        index,
                        audio_ref: example.audio_ref.clone(),
                        error,
                    });
                }
            }
        }

        (rows, classes, skipped)
    }

    /// Fit scaler and forest on the examples
    ///
    /// # Returns
    /// * `Ok(TrainingOutcome)` - Artifact plus run statistics
    /// * `Err(InsufficientTrainingData)` - No example survived extraction
    pub fn train(&self, examples: &[TrainingExample]) -> Result<TrainingOutcome, ModelError> {
        tracing::info!(
            examples = examples.len(),
            trees = self.params.n_estimators,
            seed = self.params.seed,
            "[ModelTrainer] Starting training"
        );

        let (rows, classes, skipped) = self.build_matrix(examples);
        let insufficient = || ModelError::InsufficientTrainingData {
            provided: examples.len(),
            skipped: skipped.len(),
        };

        let scaler = StandardScaler::fit(&rows).ok_or_else(insufficient)?;
        let scaled: Vec<_> = rows.iter().map(|row| scaler.transform(row)).collect();
        let model = RandomForest::fit(&scaled, &classes, &self.params).ok_or_else(insufficient)?;

        let correct = scaled
            .iter()
            .zip(&classes)
            .filter(|(row, class)| model.predict(row) == **class)
            .count();
        let training_accuracy = correct as f64 / scaled.len() as f64;

        let mut artifact = TrainedModelArtifact::new(scaler, model);
        artifact.schema_version = self.extractor.schema_version();
        artifact.training_samples = scaled.len();
        artifact.training_accuracy = training_accuracy;

        tracing::info!(
            samples = scaled.len(),
            skipped = skipped.len(),
            training_accuracy,
            "[ModelTrainer] Training complete"
        );

        Ok(TrainingOutcome {
            artifact,
            samples: scaled.len(),
            skipped,
            training_accuracy,
        })
    }

    /// Train and write the artifact to `path`
    pub fn train_and_persist<P: AsRef<Path>>(
        &self,
        examples: &[TrainingExample],
        path: P,
    ) -> Result<TrainingOutcome, ModelError> {
        let outcome = self.train(examples)?;
        outcome.artifact.save(path)?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioSignal, MemoryAudioSource};
    use crate::testing::synth;

    const SR: u32 = 16_000;

    fn trainer_with(source: MemoryAudioSource, trees: usize) -> ModelTrainer {
        ModelTrainer::new(
            Arc::new(source),
            Arc::new(FeatureExtractor::new()),
            ForestParams {
                n_estimators: trees,
                ..ForestParams::default()
            },
        )
    }

    fn dataset() -> (MemoryAudioSource, Vec<TrainingExample>) {
        let mut source = MemoryAudioSource::new();
        let mut examples = Vec::new();
        for i in 0..4 {
            let gap = 0.6 + 0.2 * i as f64;
            let (samples, start, end) = synth::natural_blank(SR, gap);
            let name = format!("natural_{}", i);
            source.insert(name.clone(), AudioSignal::new(samples, SR).unwrap());
            examples.push(TrainingExample::new(name, start, end, BlankLabel::Natural).unwrap());

            let gap = 4.0 + i as f64;
            let (samples, start, end) = synth::abnormal_blank(SR, gap);
            let name = format!("abnormal_{}", i);
            source.insert(name.clone(), AudioSignal::new(samples, SR).unwrap());
            examples.push(TrainingExample::new(name, start, end, BlankLabel::Abnormal).unwrap());
        }
        (source, examples)
    }

    #[test]
    fn test_train_fits_training_set() {
        let (source, examples) = dataset();
        let outcome = trainer_with(source, 20).train(&examples).unwrap();

        assert_eq!(outcome.samples, 8);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.training_accuracy, 1.0);
        assert_eq!(outcome.artifact.training_samples, 8);
        assert_eq!(outcome.artifact.model.tree_count(), 20);
    }

    #[test]
    fn test_missing_audio_and_out_of_bounds_are_skipped() {
        let (source, mut examples) = dataset();
        examples.push(TrainingExample::new("ghost", 1.0, 2.0, BlankLabel::Natural).unwrap());
        examples.push(
            TrainingExample::new("natural_0", 500.0, 501.0, BlankLabel::Natural).unwrap(),
        );

        let outcome = trainer_with(source, 5).train(&examples).unwrap();
        assert_eq!(outcome.samples, 8);
        assert_eq!(outcome.skipped.len(), 2);
        assert!(matches!(
            outcome.skipped[0].error,
            AudioError::MissingAudio { .. }
        ));
        assert!(matches!(
            outcome.skipped[1].error,
            AudioError::InvalidInterval { .. }
        ));
    }

    #[test]
    fn test_all_examples_skipped_is_error() {
        let examples =
            vec![TrainingExample::new("ghost", 1.0, 2.0, BlankLabel::Natural).unwrap()];
        let err = trainer_with(MemoryAudioSource::new(), 5)
            .train(&examples)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::InsufficientTrainingData {
                provided: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn test_empty_examples_is_error() {
        let err = trainer_with(MemoryAudioSource::new(), 5)
            .train(&[])
            .unwrap_err();
        assert!(matches!(err, ModelError::InsufficientTrainingData { .. }));
    }

    #[test]
    fn test_training_is_reproducible() {
        let (source, examples) = dataset();
        let trainer = trainer_with(source, 10);
        let a = trainer.train(&examples).unwrap();
        let b = trainer.train(&examples).unwrap();
        assert_eq!(a.artifact, b.artifact);
    }
}

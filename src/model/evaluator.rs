// Evaluator module - accuracy of a classifier facade on labelled examples

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::classifier::{ClassifierFacade, ClassifierState};
use crate::audio::AudioSource;
use crate::model::cache::RecordingCache;
use crate::model::dataset::TrainingExample;

/// Accuracy summary for one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub correct: usize,
    /// Examples that could be classified
    pub total: usize,
    /// correct / total (0.0 when total is 0)
    pub accuracy: f64,
    /// Examples that could not be classified (missing audio, bad interval)
    pub skipped: usize,
}

/// Runs a facade over labelled examples and compares labels
pub struct ModelEvaluator {
    source: Arc<dyn AudioSource>,
    facade: Arc<ClassifierFacade>,
}

impl ModelEvaluator {
    pub fn new(source: Arc<dyn AudioSource>, facade: Arc<ClassifierFacade>) -> Self {
        Self { source, facade }
    }

    /// Classify every example through the facade and count matches.
    ///
    /// An untrained facade is evaluated as-is (rule path) with a warning.
    pub fn evaluate(&self, examples: &[TrainingExample]) -> EvaluationReport {
        if self.facade.state() == ClassifierState::Untrained {
            tracing::warn!("[ModelEvaluator] No trained model loaded, evaluating rule-based classification");
        }

        let mut recordings = RecordingCache::new(self.source.as_ref(), examples);
        let mut correct = 0;
        let mut total = 0;
        let mut skipped = 0;

        for (index, example) in examples.iter().enumerate() {
            let result = recordings.with_signal(index, &example.audio_ref, |signal| {
                self.facade.classify(signal, &example.interval)
            });

            match result {
                Ok(result) => {
                    total += 1;
                    if result.label == example.label {
                        correct += 1;
                    }
                }
                Err(error) => {
                    tracing::warn!(index, %error, "[ModelEvaluator] Skipping example");
                    skipped += 1;
                }
            }
        }

        let accuracy = if total > 0 {
            correct as f64 / total as f64
        } else {
            0.0
        };
        tracing::info!(correct, total, accuracy, "[ModelEvaluator] Evaluation complete");

        EvaluationReport {
            correct,
            total,
            accuracy,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::{BlankLabel, RuleBasedClassifier};
    use crate::analysis::features::FeatureExtractor;
    use crate::audio::{AudioSignal, MemoryAudioSource};
    use crate::testing::synth;

    const SR: u32 = 16_000;

    #[test]
    fn test_evaluate_untrained_facade() {
        // 12 s of dead air between steady tones: rules say ABNORMAL
        let (samples, start, end) = synth::abnormal_blank(SR, 12.0);
        let source = MemoryAudioSource::new().with_signal("take", AudioSignal::new(samples, SR).unwrap());
        let facade = ClassifierFacade::untrained(
            RuleBasedClassifier::default(),
            Arc::new(FeatureExtractor::new()),
        );
        let evaluator = ModelEvaluator::new(Arc::new(source), Arc::new(facade));

        let examples = vec![
            TrainingExample::new("take", start, end, BlankLabel::Abnormal).unwrap(),
            TrainingExample::new("take", start, end, BlankLabel::Natural).unwrap(),
            TrainingExample::new("missing", 0.0, 1.0, BlankLabel::Natural).unwrap(),
        ];
        let report = evaluator.evaluate(&examples);

        assert_eq!(report.correct, 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.accuracy, 0.5);
    }

    #[test]
    fn test_evaluate_empty() {
        let facade = ClassifierFacade::untrained(
            RuleBasedClassifier::default(),
            Arc::new(FeatureExtractor::new()),
        );
        let evaluator = ModelEvaluator::new(Arc::new(MemoryAudioSource::new()), Arc::new(facade));
        let report = evaluator.evaluate(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy, 0.0);
    }
}

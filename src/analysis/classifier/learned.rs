// Learned - classification with a trained model artifact

use std::sync::Arc;

use crate::analysis::classifier::{BlankLabel, ClassificationMethod, ClassificationResult};
use crate::analysis::features::FeatureVector;
use crate::model::TrainedModelArtifact;

/// Probability above which a blank is labelled NATURAL
pub const NATURAL_DECISION_THRESHOLD: f64 = 0.5;

/// Applies a loaded artifact to feature vectors
#[derive(Debug, Clone)]
pub struct LearnedClassifier {
    artifact: Arc<TrainedModelArtifact>,
}

impl LearnedClassifier {
    pub fn new(artifact: Arc<TrainedModelArtifact>) -> Self {
        Self { artifact }
    }

    pub fn artifact(&self) -> &TrainedModelArtifact {
        &self.artifact
    }

    /// Standardize `features`, query the forest and map the probability to a
    /// label. Confidence is the probability of the predicted class.
    pub fn classify(&self, features: &FeatureVector) -> ClassificationResult {
        let natural = self.artifact.natural_probability(features);
        let label = if natural > NATURAL_DECISION_THRESHOLD {
            BlankLabel::Natural
        } else {
            BlankLabel::Abnormal
        };

        ClassificationResult {
            label,
            confidence: natural.max(1.0 - natural).clamp(0.0, 1.0),
            method: ClassificationMethod::Model,
        }
    }
}

// Classifier - NATURAL vs ABNORMAL blank classification
//
// The facade chooses its strategy once, at construction:
//
// - Trained: a compatible model artifact was loaded; every blank goes through
//   FeatureExtractor -> StandardScaler -> RandomForest
// - Untrained: no artifact (or an incompatible one); every blank goes through
//   the rule cascade in rules.rs
//
// A facade never mixes the two paths. Callers that need to pick up a newly
// trained artifact at runtime hold a SharedClassifier and swap facades.

mod learned;
mod rules;
mod shared;

pub use learned::{LearnedClassifier, NATURAL_DECISION_THRESHOLD};
pub use rules::{EdgeEnergy, RuleBasedClassifier, RuleThresholds};
pub use shared::SharedClassifier;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::analysis::features::FeatureExtractor;
use crate::analysis::interval::SilenceInterval;
use crate::audio::{AudioSignal, AudioSource};
use crate::error::{AudioError, ModelError};
use crate::model::TrainedModelArtifact;

/// Default context captured on each side of a blank (seconds)
pub const DEFAULT_CONTEXT_SECS: f64 = 1.0;

/// Classification outcome for a blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLabel {
    /// Intentional pause (breath, scene change, musical rest)
    Natural,
    /// Dead air or a technical fault
    Abnormal,
}

impl BlankLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlankLabel::Natural => "natural",
            BlankLabel::Abnormal => "abnormal",
        }
    }
}

impl fmt::Display for BlankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlankLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natural" => Ok(BlankLabel::Natural),
            "abnormal" => Ok(BlankLabel::Abnormal),
            other => Err(format!("unknown blank label '{}'", other)),
        }
    }
}

/// Which path produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMethod {
    Rule,
    Model,
}

/// Label, confidence in [0, 1], and the path that decided it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: BlankLabel,
    pub confidence: f64,
    pub method: ClassificationMethod,
}

impl ClassificationResult {
    /// Rule decisions are always fully confident
    pub fn rule(label: BlankLabel) -> Self {
        Self {
            label,
            confidence: 1.0,
            method: ClassificationMethod::Rule,
        }
    }
}

/// A detected blank paired with its classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSilence {
    pub interval: SilenceInterval,
    pub result: ClassificationResult,
}

impl ClassifiedSilence {
    /// ABNORMAL blanks need operator attention
    pub fn alert_needed(&self) -> bool {
        self.result.label == BlankLabel::Abnormal
    }
}

#[derive(Serialize)]
struct ClassifiedSilenceRecord {
    start_time: f64,
    end_time: f64,
    duration: f64,
    label: BlankLabel,
    confidence: f64,
    method: ClassificationMethod,
    alert_needed: bool,
}

impl Serialize for ClassifiedSilence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ClassifiedSilenceRecord {
            start_time: self.interval.start_time(),
            end_time: self.interval.end_time(),
            duration: self.interval.duration(),
            label: self.result.label,
            confidence: self.result.confidence,
            method: self.result.method,
            alert_needed: self.alert_needed(),
        }
        .serialize(serializer)
    }
}

/// Whether the facade loaded a trained model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierState {
    Untrained,
    Trained,
}

enum Strategy {
    Rules,
    Model(LearnedClassifier),
}

/// Single entry point for blank classification
pub struct ClassifierFacade {
    strategy: Strategy,
    rules: RuleBasedClassifier,
    extractor: Arc<FeatureExtractor>,
    context_secs: f64,
}

impl fmt::Debug for ClassifierFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierFacade")
            .field("state", &self.state())
            .field("rules", &self.rules)
            .field("context_secs", &self.context_secs)
            .finish()
    }
}

impl ClassifierFacade {
    /// Facade that always uses the rule cascade
    pub fn untrained(rules: RuleBasedClassifier, extractor: Arc<FeatureExtractor>) -> Self {
        Self {
            strategy: Strategy::Rules,
            rules,
            extractor,
            context_secs: DEFAULT_CONTEXT_SECS,
        }
    }

    /// Facade backed by `artifact` when it matches the extractor's schema
    ///
    /// # Arguments
    /// * `artifact` - Loaded artifact, or `None` to stay untrained
    /// * `rules` - Rule cascade used when untrained
    /// * `extractor` - Shared feature extractor
    pub fn from_artifact(
        artifact: Option<TrainedModelArtifact>,
        rules: RuleBasedClassifier,
        extractor: Arc<FeatureExtractor>,
    ) -> Self {
        let Some(artifact) = artifact else {
            return Self::untrained(rules, extractor);
        };

        match artifact.check_schema(extractor.schema_version()) {
            Ok(()) => Self {
                strategy: Strategy::Model(LearnedClassifier::new(Arc::new(artifact))),
                rules,
                extractor,
                context_secs: DEFAULT_CONTEXT_SECS,
            },
            Err(err) => {
                log::warn!(
                    "[ClassifierFacade] {}. Using rule-based classification.",
                    err
                );
                Self::untrained(rules, extractor)
            }
        }
    }

    /// Load the artifact at `path`, falling back to rules on any failure
    pub fn load<P: AsRef<Path>>(
        path: P,
        rules: RuleBasedClassifier,
        extractor: Arc<FeatureExtractor>,
    ) -> Self {
        match TrainedModelArtifact::load(&path) {
            Ok(artifact) => Self::from_artifact(Some(artifact), rules, extractor),
            Err(ModelError::ArtifactNotFound { .. }) => {
                log::info!(
                    "[ClassifierFacade] No trained model at {:?}. Using rule-based classification.",
                    path.as_ref()
                );
                Self::untrained(rules, extractor)
            }
            Err(err) => {
                log::warn!(
                    "[ClassifierFacade] Failed to load model from {:?}: {}. Using rule-based classification.",
                    path.as_ref(),
                    err
                );
                Self::untrained(rules, extractor)
            }
        }
    }

    /// Seconds of context captured on each side of a blank
    pub fn with_context_secs(mut self, context_secs: f64) -> Self {
        if context_secs.is_finite() && context_secs >= 0.0 {
            self.context_secs = context_secs;
        } else {
            log::warn!(
                "[ClassifierFacade] Ignoring invalid context {}s, keeping {}s",
                context_secs,
                self.context_secs
            );
        }
        self
    }

    pub fn state(&self) -> ClassifierState {
        match self.strategy {
            Strategy::Rules => ClassifierState::Untrained,
            Strategy::Model(_) => ClassifierState::Trained,
        }
    }

    pub fn rules(&self) -> &RuleBasedClassifier {
        &self.rules
    }

    pub fn extractor(&self) -> &Arc<FeatureExtractor> {
        &self.extractor
    }

    pub fn context_secs(&self) -> f64 {
        self.context_secs
    }

    /// Classify one blank of a decoded signal
    ///
    /// # Returns
    /// * `Err(InvalidInterval)` - The interval lies outside the signal
    pub fn classify(
        &self,
        signal: &AudioSignal,
        interval: &SilenceInterval,
    ) -> Result<ClassificationResult, AudioError> {
        let window = signal.window(interval, self.context_secs)?;
        let sample_rate = signal.sample_rate();

        let result = match &self.strategy {
            Strategy::Rules => self.rules.classify(interval, window.span, sample_rate),
            Strategy::Model(model) => {
                let features = self.extractor.extract_window(&window, sample_rate);
                model.classify(&features)
            }
        };

        tracing::debug!(
            start = interval.start_time(),
            end = interval.end_time(),
            label = %result.label,
            confidence = result.confidence,
            method = ?result.method,
            "[ClassifierFacade] Classified blank"
        );
        Ok(result)
    }

    /// Resolve `audio_ref` through `source` and classify `[start_time, end_time)`
    pub fn classify_ref(
        &self,
        source: &dyn AudioSource,
        audio_ref: &str,
        start_time: f64,
        end_time: f64,
    ) -> Result<ClassificationResult, AudioError> {
        let interval = SilenceInterval::new(start_time, end_time)?;
        let signal = source.load(audio_ref)?;
        self.classify(&signal, &interval)
    }

    /// Classify every interval, failing on the first invalid one
    pub fn classify_all(
        &self,
        signal: &AudioSignal,
        intervals: &[SilenceInterval],
    ) -> Result<Vec<ClassifiedSilence>, AudioError> {
        intervals
            .iter()
            .map(|interval| {
                self.classify(signal, interval).map(|result| ClassifiedSilence {
                    interval: *interval,
                    result,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;

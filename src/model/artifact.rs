// Artifact module - versioned persistence of the trained model
//
// On-disk layout (JSON):
// {
//   "schema_version": 1,
//   "means": [10 floats],
//   "stds": [10 floats],
//   "model": { "trees": [...] },
//   "training_samples": 42,
//   "training_accuracy": 1.0
// }
//
// The schema version is checked before the rest of the document is parsed so
// an artifact from another feature layout is reported as a version mismatch
// rather than as a parse failure.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::features::{FeatureVector, FEATURE_DIM, FEATURE_SCHEMA_VERSION};
use crate::error::ModelError;
use crate::model::forest::RandomForest;
use crate::model::scaler::StandardScaler;

/// Fitted scaler and forest, tagged with the feature schema they were built for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelArtifact {
    pub schema_version: u32,
    pub means: [f64; FEATURE_DIM],
    pub stds: [f64; FEATURE_DIM],
    pub model: RandomForest,
    #[serde(default)]
    pub training_samples: usize,
    #[serde(default)]
    pub training_accuracy: f64,
}

impl TrainedModelArtifact {
    /// Bundle a fitted scaler and forest under the current schema version
    pub fn new(scaler: StandardScaler, model: RandomForest) -> Self {
        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
            means: scaler.means,
            stds: scaler.stds,
            model,
            training_samples: 0,
            training_accuracy: 0.0,
        }
    }

    pub fn scaler(&self) -> StandardScaler {
        StandardScaler {
            means: self.means,
            stds: self.stds,
        }
    }

    /// Probability that `features` describe a NATURAL blank
    pub fn natural_probability(&self, features: &FeatureVector) -> f64 {
        let scaled = self.scaler().transform(features);
        self.model.predict_proba(&scaled).clamp(0.0, 1.0)
    }

    /// Reject artifacts built for a different feature layout
    pub fn check_schema(&self, expected: u32) -> Result<(), ModelError> {
        if self.schema_version != expected {
            return Err(ModelError::VersionMismatch {
                found: self.schema_version,
                expected,
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.means.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::MalformedArtifact {
                reason: "non-finite mean".to_string(),
            });
        }
        if self.stds.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Err(ModelError::MalformedArtifact {
                reason: "invalid standard deviation".to_string(),
            });
        }
        self.model
            .validate()
            .map_err(|reason| ModelError::MalformedArtifact { reason })
    }

    /// Load and validate an artifact
    ///
    /// # Arguments
    /// * `path` - Artifact location
    ///
    /// # Returns
    /// * `ArtifactNotFound` - nothing at `path`
    /// * `VersionMismatch` - `schema_version` differs from the running extractor
    /// * `MalformedArtifact` - unparseable or structurally invalid content
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ModelError::ArtifactNotFound {
                path: path.display().to_string(),
            },
            _ => ModelError::ArtifactIo {
                path: path.display().to_string(),
                reason: err.to_string(),
            },
        })?;

        let document: serde_json::Value =
            serde_json::from_str(&contents).map_err(|err| ModelError::MalformedArtifact {
                reason: err.to_string(),
            })?;

        let found = document
            .get("schema_version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| ModelError::MalformedArtifact {
                reason: "missing schema_version".to_string(),
            })?;
        if found != u64::from(FEATURE_SCHEMA_VERSION) {
            return Err(ModelError::VersionMismatch {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                expected: FEATURE_SCHEMA_VERSION,
            });
        }

        let artifact: Self =
            serde_json::from_value(document).map_err(|err| ModelError::MalformedArtifact {
                reason: err.to_string(),
            })?;
        artifact.validate()?;

        tracing::info!(
            path = %path.display(),
            trees = artifact.model.tree_count(),
            "[ModelArtifact] Loaded trained model"
        );
        Ok(artifact)
    }

    /// Persist the artifact.
    ///
    /// Writes to a sibling temp file and renames it into place, so readers
    /// never observe a partially written artifact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let path = path.as_ref();
        let io_error = |err: std::io::Error| ModelError::ArtifactIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|err| ModelError::ArtifactIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);
        fs::write(tmp_path, json).map_err(io_error)?;
        fs::rename(tmp_path, path).map_err(io_error)?;

        tracing::info!(path = %path.display(), "[ModelArtifact] Saved trained model");
        Ok(())
    }
}

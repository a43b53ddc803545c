// Model error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Model error code constants
///
/// Error code range: 2001-2006
pub struct ModelErrorCodes {}

impl ModelErrorCodes {
    /// No usable training examples remained after skipping
    pub const INSUFFICIENT_TRAINING_DATA: i32 = 2001;

    /// Artifact was built against a different feature schema
    pub const VERSION_MISMATCH: i32 = 2002;

    /// No artifact exists at the configured location
    pub const ARTIFACT_NOT_FOUND: i32 = 2003;

    /// Artifact could not be read or written
    pub const ARTIFACT_IO: i32 = 2004;

    /// Artifact content failed validation
    pub const MALFORMED_ARTIFACT: i32 = 2005;

    /// Shared classifier RwLock was poisoned
    pub const STATE_POISONED: i32 = 2006;
}

/// Log a model error with structured context
pub fn log_model_error(err: &ModelError, context: &str) {
    error!(
        "Model error in {}: code={}, component=BlankModel, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while training, persisting or loading the learned model
///
/// Error code range: 2001-2006
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Training aborted because no example could be used
    InsufficientTrainingData { provided: usize, skipped: usize },

    /// Artifact schema does not match the running feature extractor
    VersionMismatch { found: u32, expected: u32 },

    /// No artifact file at the given path
    ArtifactNotFound { path: String },

    /// Filesystem failure while reading or writing an artifact
    ArtifactIo { path: String, reason: String },

    /// Artifact parsed but failed validation
    MalformedArtifact { reason: String },

    /// Shared classifier lock poisoned
    StatePoisoned,
}

impl ErrorCode for ModelError {
    fn code(&self) -> i32 {
        match self {
            ModelError::InsufficientTrainingData { .. } => {
                ModelErrorCodes::INSUFFICIENT_TRAINING_DATA
            }
            ModelError::VersionMismatch { .. } => ModelErrorCodes::VERSION_MISMATCH,
            ModelError::ArtifactNotFound { .. } => ModelErrorCodes::ARTIFACT_NOT_FOUND,
            ModelError::ArtifactIo { .. } => ModelErrorCodes::ARTIFACT_IO,
            ModelError::MalformedArtifact { .. } => ModelErrorCodes::MALFORMED_ARTIFACT,
            ModelError::StatePoisoned => ModelErrorCodes::STATE_POISONED,
        }
    }

    fn message(&self) -> String {
        match self {
            ModelError::InsufficientTrainingData { provided, skipped } => {
                format!(
                    "Insufficient training data: {} examples provided, {} skipped, none usable",
                    provided, skipped
                )
            }
            ModelError::VersionMismatch { found, expected } => {
                format!(
                    "Artifact schema version {} does not match feature schema {}",
                    found, expected
                )
            }
            ModelError::ArtifactNotFound { path } => {
                format!("No model artifact at {}", path)
            }
            ModelError::ArtifactIo { path, reason } => {
                format!("Artifact I/O failed for {}: {}", path, reason)
            }
            ModelError::MalformedArtifact { reason } => {
                format!("Malformed artifact: {}", reason)
            }
            ModelError::StatePoisoned => "Shared classifier lock poisoned".to_string(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModelError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ModelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_codes() {
        assert_eq!(
            ModelError::InsufficientTrainingData {
                provided: 3,
                skipped: 3
            }
            .code(),
            ModelErrorCodes::INSUFFICIENT_TRAINING_DATA
        );
        assert_eq!(
            ModelError::VersionMismatch {
                found: 0,
                expected: 1
            }
            .code(),
            ModelErrorCodes::VERSION_MISMATCH
        );
        assert_eq!(
            ModelError::ArtifactNotFound {
                path: "m.json".to_string()
            }
            .code(),
            ModelErrorCodes::ARTIFACT_NOT_FOUND
        );
        assert_eq!(ModelError::StatePoisoned.code(), ModelErrorCodes::STATE_POISONED);
    }

    #[test]
    fn test_model_error_messages() {
        let err = ModelError::InsufficientTrainingData {
            provided: 4,
            skipped: 4,
        };
        assert!(err.message().contains("4 examples provided"));

        let err = ModelError::VersionMismatch {
            found: 7,
            expected: 1,
        };
        assert_eq!(
            err.message(),
            "Artifact schema version 7 does not match feature schema 1"
        );

        let display = format!("{}", ModelError::StatePoisoned);
        assert!(display.contains("ModelError"));
        assert!(display.contains("2006"));
    }
}

// Error types for the blank detector
//
// This module defines custom error types for audio resolution and model
// operations, providing structured error handling with stable error codes
// that downstream alerting/storage collaborators can record.

mod audio;
mod model;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use model::{log_model_error, ModelError, ModelErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the engine boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

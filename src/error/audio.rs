// Audio error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Single source of truth for the numeric codes attached to [`AudioError`].
///
/// Error code range: 1001-1004
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// Interval is empty, reversed, negative or outside the signal
    pub const INVALID_INTERVAL: i32 = 1001;

    /// Audio reference could not be resolved
    pub const MISSING_AUDIO: i32 = 1002;

    /// Audio was found but could not be decoded
    pub const DECODE_FAILED: i32 = 1003;

    /// Sample rate or channel layout is unusable
    pub const INVALID_FORMAT: i32 = 1004;
}

/// Log an audio error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=AudioSource, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio-related errors
///
/// These errors cover resolving audio references and slicing decoded signals
/// into classification regions.
///
/// Error code range: 1001-1004
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Interval bounds are unusable for the requested signal
    InvalidInterval {
        start_time: f64,
        end_time: f64,
        reason: String,
    },

    /// Audio reference does not resolve to any audio
    MissingAudio { audio_ref: String },

    /// Audio exists but decoding failed
    DecodeFailed { audio_ref: String, reason: String },

    /// Sample rate or channel count cannot be processed
    InvalidFormat { reason: String },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::InvalidInterval { .. } => AudioErrorCodes::INVALID_INTERVAL,
            AudioError::MissingAudio { .. } => AudioErrorCodes::MISSING_AUDIO,
            AudioError::DecodeFailed { .. } => AudioErrorCodes::DECODE_FAILED,
            AudioError::InvalidFormat { .. } => AudioErrorCodes::INVALID_FORMAT,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::InvalidInterval {
                start_time,
                end_time,
                reason,
            } => {
                format!(
                    "Invalid interval [{:.3}s, {:.3}s]: {}",
                    start_time, end_time, reason
                )
            }
            AudioError::MissingAudio { audio_ref } => {
                format!("Audio not found: {}", audio_ref)
            }
            AudioError::DecodeFailed { audio_ref, reason } => {
                format!("Failed to decode {}: {}", audio_ref, reason)
            }
            AudioError::InvalidFormat { reason } => {
                format!("Invalid audio format: {}", reason)
            }
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_error_codes() {
        assert_eq!(
            AudioError::InvalidInterval {
                start_time: 2.0,
                end_time: 1.0,
                reason: "reversed".to_string()
            }
            .code(),
            AudioErrorCodes::INVALID_INTERVAL
        );
        assert_eq!(
            AudioError::MissingAudio {
                audio_ref: "a.wav".to_string()
            }
            .code(),
            AudioErrorCodes::MISSING_AUDIO
        );
        assert_eq!(
            AudioError::DecodeFailed {
                audio_ref: "a.wav".to_string(),
                reason: "bad header".to_string()
            }
            .code(),
            AudioErrorCodes::DECODE_FAILED
        );
        assert_eq!(
            AudioError::InvalidFormat {
                reason: "zero sample rate".to_string()
            }
            .code(),
            AudioErrorCodes::INVALID_FORMAT
        );
    }

    #[test]
    fn test_audio_error_messages() {
        let err = AudioError::InvalidInterval {
            start_time: 2.0,
            end_time: 1.0,
            reason: "end must be after start".to_string(),
        };
        assert_eq!(
            err.message(),
            "Invalid interval [2.000s, 1.000s]: end must be after start"
        );

        let err = AudioError::MissingAudio {
            audio_ref: "recordings/show.wav".to_string(),
        };
        assert_eq!(err.message(), "Audio not found: recordings/show.wav");
    }

    #[test]
    fn test_audio_error_display() {
        let err = AudioError::MissingAudio {
            audio_ref: "x.wav".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("AudioError"));
        assert!(display.contains("1002"));
    }
}

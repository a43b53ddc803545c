// SilenceInterval - validated time span of a detected blank

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::error::AudioError;

/// Time span in seconds with `0 <= start_time < end_time`.
///
/// Duration is always derived from the bounds so the two can never disagree.
/// Deserialization goes through the same validation as [`SilenceInterval::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IntervalRecord")]
pub struct SilenceInterval {
    start_time: f64,
    end_time: f64,
}

#[derive(Deserialize)]
struct IntervalRecord {
    start_time: f64,
    end_time: f64,
}

impl SilenceInterval {
    pub fn new(start_time: f64, end_time: f64) -> Result<Self, AudioError> {
        let reason = if !start_time.is_finite() || !end_time.is_finite() {
            Some("bounds must be finite")
        } else if start_time < 0.0 {
            Some("start must not be negative")
        } else if end_time <= start_time {
            Some("end must be after start")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AudioError::InvalidInterval {
                start_time,
                end_time,
                reason: reason.to_string(),
            }),
            None => Ok(Self {
                start_time,
                end_time,
            }),
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

impl TryFrom<IntervalRecord> for SilenceInterval {
    type Error = AudioError;

    fn try_from(record: IntervalRecord) -> Result<Self, Self::Error> {
        SilenceInterval::new(record.start_time, record.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_interval_duration() {
        let interval = SilenceInterval::new(10.0, 10.3).unwrap();
        assert!((interval.duration() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_reversed_and_empty() {
        assert!(SilenceInterval::new(5.0, 5.0).is_err());
        assert!(SilenceInterval::new(5.0, 4.0).is_err());
        assert!(SilenceInterval::new(-1.0, 4.0).is_err());
        assert!(SilenceInterval::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_deserialization_validates() {
        let ok: SilenceInterval =
            serde_json::from_str(r#"{"start_time": 1.0, "end_time": 2.5}"#).unwrap();
        assert_eq!(ok.end_time(), 2.5);

        let bad = serde_json::from_str::<SilenceInterval>(r#"{"start_time": 3.0, "end_time": 2.0}"#);
        assert!(bad.is_err());
    }
}

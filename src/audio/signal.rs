// Decoded mono signal plus the slicing helpers used by classification.

use crate::analysis::SilenceInterval;
use crate::error::AudioError;

/// Tolerance when converting seconds to sample indices
const SAMPLE_EPSILON: f64 = 1e-6;

/// Decoded audio held as mono `f32` samples in [-1.0, 1.0].
///
/// Multi-channel input is averaged down to mono on construction, so every
/// downstream component works on a single channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// A silence region together with its surrounding context.
///
/// `span` is the contiguous stretch `before + region + after`, which the rule
/// cascade inspects as its symmetric window.
#[derive(Debug, Clone, Copy)]
pub struct RegionWindow<'a> {
    pub region: &'a [f32],
    pub before: &'a [f32],
    pub after: &'a [f32],
    pub span: &'a [f32],
}

impl AudioSignal {
    /// Wrap mono samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AudioError> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidFormat {
                reason: "sample rate must be greater than 0".to_string(),
            });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Down-mix interleaved frames by averaging channels.
    pub fn from_interleaved(
        samples: &[f32],
        sample_rate: u32,
        channels: u16,
    ) -> Result<Self, AudioError> {
        match channels {
            0 => Err(AudioError::InvalidFormat {
                reason: "channel count must be greater than 0".to_string(),
            }),
            1 => Self::new(samples.to_vec(), sample_rate),
            n => {
                let n = n as usize;
                let mono = samples
                    .chunks_exact(n)
                    .map(|frame| frame.iter().sum::<f32>() / n as f32)
                    .collect();
                Self::new(mono, sample_rate)
            }
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Signal duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Sample index for a time offset.
    ///
    /// Truncates like an integer cast, after absorbing float error so that
    /// `n / sample_rate` maps back to exactly `n`.
    pub fn sample_index(&self, seconds: f64) -> usize {
        (seconds.max(0.0) * self.sample_rate as f64 + SAMPLE_EPSILON) as usize
    }

    /// Slice an interval plus `context_secs` of audio on each side.
    ///
    /// Context is clamped at the signal edges, so a region touching the start
    /// or end of the recording simply gets a shorter (possibly empty) context.
    ///
    /// # Errors
    /// `AudioError::InvalidInterval` when the interval starts at or beyond the
    /// end of the signal or ends more than one sample past it. An in-bounds
    /// interval shorter than one sample yields an empty `region`.
    pub fn window(
        &self,
        interval: &SilenceInterval,
        context_secs: f64,
    ) -> Result<RegionWindow<'_>, AudioError> {
        let invalid = |reason: &str| AudioError::InvalidInterval {
            start_time: interval.start_time(),
            end_time: interval.end_time(),
            reason: reason.to_string(),
        };

        let len = self.samples.len();
        let start = self.sample_index(interval.start_time());
        if start >= len {
            return Err(invalid("interval starts beyond the end of the signal"));
        }
        if interval.end_time() > self.duration_secs() + 1.0 / self.sample_rate as f64 {
            return Err(invalid("interval ends beyond the end of the signal"));
        }
        let end = self.sample_index(interval.end_time()).clamp(start, len);

        let context = (context_secs.max(0.0) * self.sample_rate as f64).round() as usize;
        let before_start = start.saturating_sub(context);
        let after_end = end.saturating_add(context).min(len);

        Ok(RegionWindow {
            region: &self.samples[start..end],
            before: &self.samples[before_start..start],
            after: &self.samples[end..after_end],
            span: &self.samples[before_start..after_end],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32 / len as f32).collect()
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let result = AudioSignal::new(vec![0.0; 10], 0);
        assert!(matches!(result, Err(AudioError::InvalidFormat { .. })));
    }

    #[test]
    fn test_stereo_downmix_averages_channels() {
        let interleaved = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let signal = AudioSignal::from_interleaved(&interleaved, 100, 2).unwrap();
        assert_eq!(signal.samples(), &[0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_window_with_full_context() {
        let signal = AudioSignal::new(ramp(1000), 100).unwrap();
        let interval = SilenceInterval::new(4.0, 6.0).unwrap();
        let window = signal.window(&interval, 1.0).unwrap();

        assert_eq!(window.region.len(), 200);
        assert_eq!(window.before.len(), 100);
        assert_eq!(window.after.len(), 100);
        assert_eq!(window.span.len(), 400);
        assert_eq!(window.region[0], signal.samples()[400]);
    }

    #[test]
    fn test_window_context_clamped_at_edges() {
        let signal = AudioSignal::new(ramp(1000), 100).unwrap();
        let interval = SilenceInterval::new(0.0, 10.0).unwrap();
        let window = signal.window(&interval, 1.0).unwrap();

        assert!(window.before.is_empty());
        assert!(window.after.is_empty());
        assert_eq!(window.region.len(), 1000);
    }

    #[test]
    fn test_window_near_start_keeps_after_context_symmetric() {
        let signal = AudioSignal::new(ramp(1000), 100).unwrap();
        let interval = SilenceInterval::new(0.3, 0.8).unwrap();
        let window = signal.window(&interval, 1.0).unwrap();

        assert_eq!(window.before.len(), 30);
        assert_eq!(window.region.len(), 50);
        assert_eq!(window.after.len(), 100);
        assert_eq!(window.span.len(), 180);
        assert_eq!(window.span[0], signal.samples()[0]);
    }

    #[test]
    fn test_window_shorter_than_one_sample_is_empty_region() {
        let signal = AudioSignal::new(ramp(1000), 100).unwrap();
        let interval = SilenceInterval::new(4.0, 4.001).unwrap();
        let window = signal.window(&interval, 1.0).unwrap();

        assert!(window.region.is_empty());
        assert_eq!(window.before.len(), 100);
        assert_eq!(window.after.len(), 100);
        assert_eq!(window.span.len(), 200);
    }

    #[test]
    fn test_window_outside_signal_is_invalid() {
        let signal = AudioSignal::new(ramp(1000), 100).unwrap();

        let late = SilenceInterval::new(12.0, 13.0).unwrap();
        assert!(matches!(
            signal.window(&late, 1.0),
            Err(AudioError::InvalidInterval { .. })
        ));

        let overrun = SilenceInterval::new(9.0, 11.0).unwrap();
        assert!(matches!(
            signal.window(&overrun, 1.0),
            Err(AudioError::InvalidInterval { .. })
        ));
    }
}

// SilenceSegmenter - frame-level loudness gating into silence intervals
//
// The signal is cut into fixed frames (10 ms by default), each frame gets a
// dBFS loudness, frames under the threshold are marked silent and consecutive
// silent frames are coalesced into runs. Runs shorter than the minimum
// duration are dropped. The final frame may be partial; its samples count
// like any other frame so leading and trailing silence is handled uniformly.

use crate::analysis::features::temporal::rms;
use crate::analysis::SilenceInterval;
use crate::audio::AudioSignal;

/// Default analysis frame length in milliseconds
pub const DEFAULT_FRAME_MS: f64 = 10.0;

/// Convert an RMS amplitude to dB relative to full scale.
///
/// Zero energy maps to negative infinity, which compares below any finite
/// threshold.
pub fn to_dbfs(rms: f64) -> f64 {
    if rms > 0.0 {
        20.0 * rms.log10()
    } else {
        f64::NEG_INFINITY
    }
}

/// Scans a decoded signal for silent stretches.
#[derive(Debug, Clone)]
pub struct SilenceSegmenter {
    frame_ms: f64,
}

impl Default for SilenceSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_MS)
    }
}

impl SilenceSegmenter {
    /// Create a segmenter using frames of `frame_ms` milliseconds.
    ///
    /// Non-positive or non-finite frame lengths fall back to the default.
    pub fn new(frame_ms: f64) -> Self {
        let frame_ms = if frame_ms.is_finite() && frame_ms > 0.0 {
            frame_ms
        } else {
            log::warn!(
                "[Segmenter] Invalid frame length {} ms, using {} ms",
                frame_ms,
                DEFAULT_FRAME_MS
            );
            DEFAULT_FRAME_MS
        };
        Self { frame_ms }
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Frame length in samples for `sample_rate` (at least one sample).
    pub fn frame_len(&self, sample_rate: u32) -> usize {
        ((sample_rate as f64 * self.frame_ms / 1000.0).round() as usize).max(1)
    }

    /// RMS amplitude of every frame, in signal order.
    pub fn frame_rms(&self, signal: &AudioSignal) -> Vec<f64> {
        let frame_len = self.frame_len(signal.sample_rate());
        signal.samples().chunks(frame_len).map(rms).collect()
    }

    /// Silence intervals, sorted by start time and non-overlapping.
    ///
    /// # Arguments
    /// * `signal` - Decoded audio
    /// * `threshold_db` - Frames strictly below this dBFS level are silent
    /// * `min_silence_duration` - Runs shorter than this (seconds) are dropped
    pub fn segment(
        &self,
        signal: &AudioSignal,
        threshold_db: f64,
        min_silence_duration: f64,
    ) -> Vec<SilenceInterval> {
        if signal.is_empty() {
            return Vec::new();
        }

        let frame_len = self.frame_len(signal.sample_rate());
        let silent: Vec<bool> = self
            .frame_rms(signal)
            .into_iter()
            .map(|level| to_dbfs(level) < threshold_db)
            .collect();

        let mut intervals = Vec::new();
        let mut run_start: Option<usize> = None;

        // Trailing sentinel closes a run that touches the end of the buffer
        for (idx, is_silent) in silent.iter().copied().chain(std::iter::once(false)).enumerate() {
            match (is_silent, run_start) {
                (true, None) => run_start = Some(idx),
                (false, Some(first)) => {
                    run_start = None;
                    if let Some(interval) =
                        self.run_to_interval(signal, frame_len, first, idx, min_silence_duration)
                    {
                        intervals.push(interval);
                    }
                }
                _ => {}
            }
        }

        log::debug!(
            "[Segmenter] {} frames, {} silence intervals (threshold {} dB, min {} s)",
            silent.len(),
            intervals.len(),
            threshold_db,
            min_silence_duration
        );

        intervals
    }

    /// Audible stretches between (and around) the detected silences.
    pub fn nonsilent(
        &self,
        signal: &AudioSignal,
        threshold_db: f64,
        min_silence_duration: f64,
    ) -> Vec<SilenceInterval> {
        let total = signal.duration_secs();
        let mut cursor = 0.0;
        let mut audible = Vec::new();

        for silence in self.segment(signal, threshold_db, min_silence_duration) {
            if let Ok(interval) = SilenceInterval::new(cursor, silence.start_time()) {
                audible.push(interval);
            }
            cursor = silence.end_time();
        }
        if let Ok(interval) = SilenceInterval::new(cursor, total) {
            audible.push(interval);
        }

        audible
    }

    fn run_to_interval(
        &self,
        signal: &AudioSignal,
        frame_len: usize,
        first_frame: usize,
        end_frame: usize,
        min_silence_duration: f64,
    ) -> Option<SilenceInterval> {
        let sample_rate = signal.sample_rate() as f64;
        let start = first_frame * frame_len;
        let end = (end_frame * frame_len).min(signal.len());
        let duration = (end - start) as f64 / sample_rate;

        if duration < min_silence_duration {
            return None;
        }
        SilenceInterval::new(start as f64 / sample_rate, end as f64 / sample_rate).ok()
    }
}

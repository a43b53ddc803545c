// Level analysis - recording-wide loudness statistics
//
// Frame levels are expressed in dB relative to the loudest frame and floored
// 80 dB below it, so a recording that is all digital silence still produces
// finite statistics.

use serde::{Deserialize, Serialize};

use crate::analysis::SilenceSegmenter;
use crate::audio::AudioSignal;

/// Dynamic range kept below the loudest frame
const TOP_DB: f64 = 80.0;

/// Amplitude floor applied before taking logarithms
const AMPLITUDE_FLOOR: f64 = 1e-5;

/// Summary of a recording's loudness profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelAnalysis {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub avg_level_db: f64,
    pub max_level_db: f64,
    pub min_level_db: f64,
    pub std_level_db: f64,
    /// Fraction of frames whose relative level is under the silence threshold
    pub silence_ratio: f64,
}

impl LevelAnalysis {
    /// Analyze `signal` using the segmenter's frame size.
    pub fn from_signal(
        signal: &AudioSignal,
        segmenter: &SilenceSegmenter,
        silence_threshold_db: f64,
    ) -> Self {
        let levels = relative_levels_db(&segmenter.frame_rms(signal));

        let (avg, max, min, std) = if levels.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let count = levels.len() as f64;
            let mean = levels.iter().sum::<f64>() / count;
            let variance = levels.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / count;
            let max = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = levels.iter().copied().fold(f64::INFINITY, f64::min);
            (mean, max, min, variance.sqrt())
        };

        let silence_ratio = if levels.is_empty() {
            0.0
        } else {
            let silent = levels
                .iter()
                .filter(|&&level| level < silence_threshold_db)
                .count();
            silent as f64 / levels.len() as f64
        };

        Self {
            duration_seconds: signal.duration_secs(),
            sample_rate: signal.sample_rate(),
            avg_level_db: avg,
            max_level_db: max,
            min_level_db: min,
            std_level_db: std,
            silence_ratio,
        }
    }
}

fn relative_levels_db(frame_rms: &[f64]) -> Vec<f64> {
    let reference = frame_rms
        .iter()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(AMPLITUDE_FLOOR);

    frame_rms
        .iter()
        .map(|&level| {
            let db = 20.0 * (level.max(AMPLITUDE_FLOOR) / reference).log10();
            db.max(-TOP_DB)
        })
        .collect()
}

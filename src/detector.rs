// BlankDetector - segmentation plus classification for a whole recording
//
// Wires the segmenter and a classifier facade together: every silence run
// that survives the duration filter is classified and reported with its
// alert flag, alongside a level analysis of the recording.

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::classifier::{BlankLabel, ClassifiedSilence, ClassifierFacade};
use crate::analysis::levels::LevelAnalysis;
use crate::analysis::segmenter::SilenceSegmenter;
use crate::audio::AudioSignal;
use crate::config::SegmentationConfig;
use crate::error::AudioError;

/// Full detection output for one recording
#[derive(Debug, Clone, Serialize)]
pub struct SilenceReport {
    pub analysis: LevelAnalysis,
    pub silences: Vec<ClassifiedSilence>,
    pub natural_count: usize,
    pub abnormal_count: usize,
}

impl SilenceReport {
    pub fn alert_needed(&self) -> bool {
        self.abnormal_count > 0
    }
}

/// Detects and classifies blanks in decoded recordings
pub struct BlankDetector {
    segmenter: SilenceSegmenter,
    threshold_db: f64,
    min_silence_duration: f64,
    classifier: Arc<ClassifierFacade>,
}

impl BlankDetector {
    /// Create a detector
    ///
    /// # Arguments
    /// * `segmentation` - Threshold, minimum duration and frame size
    /// * `classifier` - Facade used for every detected blank
    pub fn new(segmentation: &SegmentationConfig, classifier: Arc<ClassifierFacade>) -> Self {
        Self {
            segmenter: segmentation.segmenter(),
            threshold_db: segmentation.threshold_db,
            min_silence_duration: segmentation.min_silence_duration,
            classifier,
        }
    }

    pub fn classifier(&self) -> &Arc<ClassifierFacade> {
        &self.classifier
    }

    /// Segment `signal` and classify every blank found
    pub fn detect(&self, signal: &AudioSignal) -> Result<Vec<ClassifiedSilence>, AudioError> {
        let intervals =
            self.segmenter
                .segment(signal, self.threshold_db, self.min_silence_duration);
        let classified = self.classifier.classify_all(signal, &intervals)?;

        for silence in classified.iter().filter(|s| s.alert_needed()) {
            log::warn!(
                "[BlankDetector] Abnormal blank {:.2}s-{:.2}s ({:.2}s, confidence {:.2})",
                silence.interval.start_time(),
                silence.interval.end_time(),
                silence.interval.duration(),
                silence.result.confidence
            );
        }
        Ok(classified)
    }

    /// Level analysis plus classified blanks
    pub fn report(&self, signal: &AudioSignal) -> Result<SilenceReport, AudioError> {
        let analysis = LevelAnalysis::from_signal(signal, &self.segmenter, self.threshold_db);
        let silences = self.detect(signal)?;
        let natural_count = silences
            .iter()
            .filter(|s| s.result.label == BlankLabel::Natural)
            .count();
        let abnormal_count = silences.len() - natural_count;

        tracing::info!(
            duration = analysis.duration_seconds,
            silences = silences.len(),
            natural_count,
            abnormal_count,
            "[BlankDetector] Report complete"
        );

        Ok(SilenceReport {
            analysis,
            silences,
            natural_count,
            abnormal_count,
        })
    }
}

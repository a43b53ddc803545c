// Rules - deterministic blank classification cascade
//
// Used whenever no trained model is available. Decisions depend only on the
// blank's duration and the energy at the two outer edges of the symmetric
// window around it:
//
// 1. duration < short_blank_secs                 -> NATURAL
// 2. duration > long_blank_secs                  -> ABNORMAL
// 3. both edges audible and edge ratio > ratio   -> NATURAL (gradual transition)
// 4. duration > medium_blank_secs                -> ABNORMAL
// 5. otherwise                                   -> NATURAL
//
// Rule decisions always carry confidence 1.0.

use serde::{Deserialize, Serialize};

use crate::analysis::classifier::{BlankLabel, ClassificationResult};
use crate::analysis::features::temporal::rms;
use crate::analysis::interval::SilenceInterval;

/// Tunable thresholds for the rule cascade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// Blanks shorter than this are always NATURAL (seconds)
    pub short_blank_secs: f64,
    /// Blanks longer than this are always ABNORMAL (seconds)
    pub long_blank_secs: f64,
    /// Mid-length blanks longer than this are ABNORMAL unless the transition is gradual
    pub medium_blank_secs: f64,
    /// Length of each edge measured at the window boundaries (seconds)
    pub edge_secs: f64,
    /// Minimum RMS for an edge to count as audible
    pub edge_min_rms: f64,
    /// Edge energy ratio (min/max) above which the transition is gradual
    pub gradual_ratio: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            short_blank_secs: 0.5,
            long_blank_secs: 10.0,
            medium_blank_secs: 3.0,
            edge_secs: 0.25,
            edge_min_rms: 0.001,
            gradual_ratio: 0.3,
        }
    }
}

/// RMS at the start and end of a symmetric window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEnergy {
    pub start_rms: f64,
    pub end_rms: f64,
}

impl EdgeEnergy {
    /// Measure edge energy of `span`.
    ///
    /// Returns `None` when the span is no longer than one second or too short
    /// to hold two non-overlapping edges.
    pub fn measure(span: &[f32], sample_rate: u32, edge_secs: f64) -> Option<Self> {
        let edge = (sample_rate as f64 * edge_secs.max(0.0)) as usize;
        if edge == 0 || span.len() <= sample_rate as usize || span.len() <= edge * 2 {
            return None;
        }
        Some(Self {
            start_rms: rms(&span[..edge]),
            end_rms: rms(&span[span.len() - edge..]),
        })
    }

    /// min/max of the two edge energies (0.0 when both are silent)
    pub fn ratio(&self) -> f64 {
        let max = self.start_rms.max(self.end_rms);
        if max > 0.0 {
            self.start_rms.min(self.end_rms) / max
        } else {
            0.0
        }
    }
}

/// Rule-based blank classifier
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleBasedClassifier {
    thresholds: RuleThresholds,
}

impl RuleBasedClassifier {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RuleThresholds {
        &self.thresholds
    }

    /// Classify a blank from its interval and symmetric window
    ///
    /// # Arguments
    /// * `interval` - The blank being classified
    /// * `span` - Interval samples plus context on both sides
    /// * `sample_rate` - Sample rate in Hz
    pub fn classify(
        &self,
        interval: &SilenceInterval,
        span: &[f32],
        sample_rate: u32,
    ) -> ClassificationResult {
        let edges = EdgeEnergy::measure(span, sample_rate, self.thresholds.edge_secs);
        self.decide(interval.duration(), edges)
    }

    /// Apply the cascade to a duration and optional edge measurement
    pub fn decide(&self, duration: f64, edges: Option<EdgeEnergy>) -> ClassificationResult {
        let t = &self.thresholds;

        if duration < t.short_blank_secs {
            return ClassificationResult::rule(BlankLabel::Natural);
        }
        if duration > t.long_blank_secs {
            return ClassificationResult::rule(BlankLabel::Abnormal);
        }

        let gradual = edges.is_some_and(|e| {
            e.start_rms > t.edge_min_rms && e.end_rms > t.edge_min_rms && e.ratio() > t.gradual_ratio
        });
        if gradual {
            return ClassificationResult::rule(BlankLabel::Natural);
        }

        if duration > t.medium_blank_secs {
            ClassificationResult::rule(BlankLabel::Abnormal)
        } else {
            ClassificationResult::rule(BlankLabel::Natural)
        }
    }
}

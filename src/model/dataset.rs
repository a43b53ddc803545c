// Dataset module - labelled training and evaluation examples
//
// Example files are JSON arrays of records:
// [{"audio_ref": "take1.wav", "start_time": 3.2, "end_time": 7.9, "label": "abnormal"}]
// `audio_file` is accepted as an alias for `audio_ref`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::classifier::BlankLabel;
use crate::analysis::interval::SilenceInterval;
use crate::error::AudioError;

/// One labelled silence interval inside a referenced recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExampleRecord", into = "ExampleRecord")]
pub struct TrainingExample {
    pub audio_ref: String,
    pub interval: SilenceInterval,
    pub label: BlankLabel,
}

impl TrainingExample {
    pub fn new<S: Into<String>>(
        audio_ref: S,
        start_time: f64,
        end_time: f64,
        label: BlankLabel,
    ) -> Result<Self, AudioError> {
        Ok(Self {
            audio_ref: audio_ref.into(),
            interval: SilenceInterval::new(start_time, end_time)?,
            label,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExampleRecord {
    #[serde(alias = "audio_file")]
    audio_ref: String,
    start_time: f64,
    end_time: f64,
    label: String,
}

impl TryFrom<ExampleRecord> for TrainingExample {
    type Error = String;

    fn try_from(record: ExampleRecord) -> Result<Self, Self::Error> {
        let label: BlankLabel = record.label.parse()?;
        TrainingExample::new(record.audio_ref, record.start_time, record.end_time, label)
            .map_err(|e| e.to_string())
    }
}

impl From<TrainingExample> for ExampleRecord {
    fn from(example: TrainingExample) -> Self {
        Self {
            audio_ref: example.audio_ref,
            start_time: example.interval.start_time(),
            end_time: example.interval.end_time(),
            label: example.label.as_str().to_string(),
        }
    }
}

/// Parse examples from JSON text, skipping invalid records with a warning
pub fn parse_examples(json: &str) -> Result<Vec<TrainingExample>> {
    let records: Vec<ExampleRecord> =
        serde_json::from_str(json).context("Example file is not a JSON array of records")?;

    let mut examples = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match TrainingExample::try_from(record) {
            Ok(example) => examples.push(example),
            Err(reason) => tracing::warn!(index, %reason, "[Dataset] Skipping invalid record"),
        }
    }
    Ok(examples)
}

/// Load examples from a JSON file
pub fn load_examples<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingExample>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read examples from {}", path.display()))?;
    let examples = parse_examples(&json)
        .with_context(|| format!("Failed to parse examples from {}", path.display()))?;
    tracing::info!(count = examples.len(), path = %path.display(), "[Dataset] Loaded examples");
    Ok(examples)
}

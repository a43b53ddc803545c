//! Audio sources resolve an audio reference into a decoded [`AudioSignal`].
//!
//! Components that need audio by reference (trainer, evaluator, CLI) receive
//! an `AudioSource` at construction instead of reaching for a global loader.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::AudioSignal;
use crate::error::AudioError;

/// Resolves audio references to decoded signals.
pub trait AudioSource: Send + Sync {
    /// Decode the audio behind `audio_ref`.
    ///
    /// Returns `AudioError::MissingAudio` when the reference does not exist.
    fn load(&self, audio_ref: &str) -> Result<AudioSignal, AudioError>;
}

/// Loads PCM or float WAV files from disk via `hound`.
///
/// Relative references are resolved against `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct WavFileSource {
    root: Option<PathBuf>,
}

impl WavFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, audio_ref: &str) -> PathBuf {
        let path = Path::new(audio_ref);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl AudioSource for WavFileSource {
    fn load(&self, audio_ref: &str) -> Result<AudioSignal, AudioError> {
        let path = self.resolve(audio_ref);
        if !path.is_file() {
            return Err(AudioError::MissingAudio {
                audio_ref: audio_ref.to_string(),
            });
        }
        read_wav(&path).map_err(|reason| AudioError::DecodeFailed {
            audio_ref: audio_ref.to_string(),
            reason,
        })
    }
}

fn read_wav(path: &Path) -> Result<AudioSignal, String> {
    let mut reader = hound::WavReader::open(path).map_err(|err| err.to_string())?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|err| err.to_string())?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            bits @ (8 | 16 | 24 | 32) => {
                let max = ((1i64 << (bits - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 / max))
                    .collect::<Result<Vec<f32>, _>>()
                    .map_err(|err| err.to_string())?
            }
            other => return Err(format!("unsupported bits per sample {}", other)),
        },
    };

    AudioSignal::from_interleaved(&samples, spec.sample_rate, spec.channels)
        .map_err(|err| err.to_string())
}

/// In-memory source for audio that was decoded elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryAudioSource {
    signals: HashMap<String, AudioSignal>,
}

impl MemoryAudioSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, audio_ref: S, signal: AudioSignal) {
        self.signals.insert(audio_ref.into(), signal);
    }

    pub fn with_signal<S: Into<String>>(mut self, audio_ref: S, signal: AudioSignal) -> Self {
        self.insert(audio_ref, signal);
        self
    }
}

impl AudioSource for MemoryAudioSource {
    fn load(&self, audio_ref: &str) -> Result<AudioSignal, AudioError> {
        self.signals
            .get(audio_ref)
            .cloned()
            .ok_or_else(|| AudioError::MissingAudio {
                audio_ref: audio_ref.to_string(),
            })
    }
}

// Recording cache - decode each referenced recording once per pass
//
// Examples are processed in order. A decoded recording stays cached only
// until the last example that references it has been handled, so at most the
// recordings whose examples interleave are resident at once.

use std::collections::HashMap;

use crate::audio::{AudioSignal, AudioSource};
use crate::error::AudioError;
use crate::model::dataset::TrainingExample;

pub(crate) struct RecordingCache<'a> {
    source: &'a dyn AudioSource,
    last_use: HashMap<&'a str, usize>,
    decoded: HashMap<&'a str, Result<AudioSignal, AudioError>>,
}

impl<'a> RecordingCache<'a> {
    pub(crate) fn new(source: &'a dyn AudioSource, examples: &'a [TrainingExample]) -> Self {
        let last_use = examples
            .iter()
            .enumerate()
            .map(|(index, example)| (example.audio_ref.as_str(), index))
            .collect();
        Self {
            source,
            last_use,
            decoded: HashMap::new(),
        }
    }

    /// Run `f` on the recording behind example `index`, decoding it if needed.
    ///
    /// The decoded recording is released once `index` is its last use.
    pub(crate) fn with_signal<T>(
        &mut self,
        index: usize,
        audio_ref: &'a str,
        f: impl FnOnce(&AudioSignal) -> Result<T, AudioError>,
    ) -> Result<T, AudioError> {
        let source = self.source;
        let result = match self
            .decoded
            .entry(audio_ref)
            .or_insert_with(|| source.load(audio_ref))
        {
            Ok(signal) => f(signal),
            Err(err) => Err(err.clone()),
        };

        if self.last_use.get(audio_ref).map_or(true, |&last| last <= index) {
            self.decoded.remove(audio_ref);
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn resident(&self) -> usize {
        self.decoded.len()
    }
}

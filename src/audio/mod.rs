// Audio module - decoded signals and the sources that resolve them
//
// The engine never decodes container formats on its own hot path: callers
// hand it an `AudioSignal`, or inject an `AudioSource` that resolves an audio
// reference into one.

pub mod signal;
pub mod source;

pub use signal::{AudioSignal, RegionWindow};
pub use source::{AudioSource, MemoryAudioSource, WavFileSource};

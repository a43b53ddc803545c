//! Synthetic signal generators.
//!
//! All generators are deterministic: identical arguments always produce
//! identical samples, which keeps feature and training tests reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lead-in before the blank in the labelled example builders (seconds)
pub const EXAMPLE_LEAD_SECS: f64 = 1.5;

fn sample_count(sample_rate: u32, secs: f64) -> usize {
    (secs * sample_rate as f64).round() as usize
}

/// Pure sine wave
pub fn sine(sample_rate: u32, frequency: f32, secs: f64, amplitude: f32) -> Vec<f32> {
    (0..sample_count(sample_rate, secs))
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Sine with a linear envelope: `fade_out` ramps amplitude down to zero,
/// otherwise the envelope ramps up from zero.
pub fn faded_sine(
    sample_rate: u32,
    frequency: f32,
    secs: f64,
    amplitude: f32,
    fade_out: bool,
) -> Vec<f32> {
    let mut samples = sine(sample_rate, frequency, secs, amplitude);
    let len = samples.len().max(1) as f32;
    for (i, sample) in samples.iter_mut().enumerate() {
        let progress = i as f32 / len;
        let envelope = if fade_out { 1.0 - progress } else { progress };
        *sample *= envelope;
    }
    samples
}

/// Seeded uniform noise in `[-amplitude, amplitude)`
pub fn noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.gen_range(-amplitude..amplitude))
        .collect()
}

/// Digital silence
pub fn silence(sample_rate: u32, secs: f64) -> Vec<f32> {
    vec![0.0; sample_count(sample_rate, secs)]
}

/// Tone, hard cut to silence, tone again
pub fn tone_gap_tone(
    sample_rate: u32,
    lead_secs: f64,
    gap_secs: f64,
    tail_secs: f64,
    amplitude: f32,
) -> Vec<f32> {
    let mut samples = sine(sample_rate, 440.0, lead_secs, amplitude);
    samples.extend(silence(sample_rate, gap_secs));
    samples.extend(sine(sample_rate, 440.0, tail_secs, amplitude));
    samples
}

/// A pause reached by fading out and left by fading in.
///
/// Layout: 0.5 s steady tone, 1 s fade-out, `gap_secs` of silence, 1 s
/// fade-in, 0.5 s steady tone. Returns the samples and the blank's
/// `(start, end)` in seconds.
pub fn natural_blank(sample_rate: u32, gap_secs: f64) -> (Vec<f32>, f64, f64) {
    let mut samples = sine(sample_rate, 440.0, 0.5, 0.5);
    samples.extend(faded_sine(sample_rate, 440.0, 1.0, 0.5, true));
    let start = samples.len() as f64 / sample_rate as f64;
    samples.extend(silence(sample_rate, gap_secs));
    let end = samples.len() as f64 / sample_rate as f64;
    samples.extend(faded_sine(sample_rate, 440.0, 1.0, 0.5, false));
    samples.extend(sine(sample_rate, 440.0, 0.5, 0.5));
    (samples, start, end)
}

/// Dead air: steady tone cut hard to silence and resumed hard.
///
/// Layout mirrors [`natural_blank`] with steady tone instead of fades.
pub fn abnormal_blank(sample_rate: u32, gap_secs: f64) -> (Vec<f32>, f64, f64) {
    let samples = tone_gap_tone(sample_rate, EXAMPLE_LEAD_SECS, gap_secs, EXAMPLE_LEAD_SECS, 0.5);
    let start = sample_count(sample_rate, EXAMPLE_LEAD_SECS) as f64 / sample_rate as f64;
    let end = start + sample_count(sample_rate, gap_secs) as f64 / sample_rate as f64;
    (samples, start, end)
}

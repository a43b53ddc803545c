// Temporal module - Time-domain feature extraction
//
// Energy, zero-crossing and boundary-shape measures computed directly on
// samples. Every function returns 0.0 for inputs too short to measure rather
// than producing NaN.

use super::fft::{frames, SPECTRAL_FRAME, SPECTRAL_HOP};

/// Number of RMS windows used to judge a fade
const FADE_WINDOWS: usize = 10;

/// Guard added to the fade consistency denominator
const FADE_EPSILON: f64 = 1e-6;

/// Longest stretch compared on each side of a transition
const ABRUPTNESS_WINDOW: usize = 2048;

/// Magnitude at or below which a sample is treated as zero for ZCR
const ZCR_ZERO_THRESHOLD: f32 = 1e-10;

/// Root-mean-square amplitude, 0 for an empty slice
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Compute zero-crossing rate (ZCR) of one frame
///
/// Formula: ZCR = crossings / N, where a crossing is any change between the
/// `>= 0` and `< 0` sign classes of adjacent samples. Samples within
/// `ZCR_ZERO_THRESHOLD` of zero count as zero.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0)
pub fn compute_zcr(audio: &[f32]) -> f64 {
    if audio.len() < 2 {
        return 0.0;
    }

    let crossings = audio
        .windows(2)
        .filter(|pair| non_negative(pair[1]) != non_negative(pair[0]))
        .count();

    crossings as f64 / audio.len() as f64
}

fn non_negative(sample: f32) -> bool {
    sample >= 0.0 || sample.abs() <= ZCR_ZERO_THRESHOLD
}

/// Mean frame-wise ZCR over a region, 0 for an empty region
pub fn mean_zcr(region: &[f32]) -> f64 {
    let framed = frames(region, SPECTRAL_FRAME, SPECTRAL_HOP);
    if framed.is_empty() {
        return 0.0;
    }
    framed.iter().map(|frame| compute_zcr(frame)).sum::<f64>() / framed.len() as f64
}

/// Score how steadily the energy of `segment` changes (0 = abrupt, 1 = smooth fade)
///
/// The segment is split into ten equal windows; the RMS first differences
/// between windows are compared against their spread. A perfectly linear
/// energy ramp scores close to 1, a flat or erratic envelope close to 0.
pub fn fade_score(segment: &[f32]) -> f64 {
    let window_size = segment.len() / FADE_WINDOWS;
    if window_size == 0 {
        return 0.0;
    }

    let levels: Vec<f64> = segment
        .chunks_exact(window_size)
        .take(FADE_WINDOWS)
        .map(rms)
        .collect();
    if levels.len() < 2 {
        return 0.0;
    }

    let diffs: Vec<f64> = levels.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let count = diffs.len() as f64;
    let mean_abs = diffs.iter().map(|d| d.abs()).sum::<f64>() / count;
    if mean_abs <= 0.0 {
        return 0.0;
    }

    let mean = diffs.iter().sum::<f64>() / count;
    let std = (diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / count).sqrt();

    (1.0 - std / (mean_abs + FADE_EPSILON)).clamp(0.0, 1.0)
}

/// Relative energy jump across a silence (0 = matched levels, 1 = one side silent)
///
/// Compares the tail of `before` against the head of `after` over
/// `min(len(before), len(after), 2048)` samples.
pub fn transition_abruptness(before: &[f32], after: &[f32]) -> f64 {
    let window = before.len().min(after.len()).min(ABRUPTNESS_WINDOW);
    if window == 0 {
        return 0.0;
    }

    let energy_before = rms(&before[before.len() - window..]);
    let energy_after = rms(&after[..window]);
    let peak = energy_before.max(energy_after);

    if peak > 0.0 {
        (energy_before - energy_after).abs() / peak
    } else {
        0.0
    }
}

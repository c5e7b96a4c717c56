//! Prosody feature extraction from normalized mono PCM.
//!
//! Pure and deterministic: the same samples always produce the same
//! features. Statistics are computed over a shared frame grid
//! (`FRAME_SIZE`/`FRAME_HOP` samples) so pitch, energy and pause metrics
//! describe the same time slices.

mod pitch;

use crate::config::DEFAULT_BASELINE_PITCH_HZ;
use serde::{Deserialize, Serialize};

pub use pitch::{PITCH_MAX_HZ, PITCH_MIN_HZ};

/// Samples per analysis frame (128 ms at 16 kHz).
pub const FRAME_SIZE: usize = 2048;
/// Samples between successive frames (32 ms at 16 kHz).
pub const FRAME_HOP: usize = 512;

/// Percentile of frame RMS below which a frame counts as a pause.
const PAUSE_PERCENTILE: f64 = 20.0;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("sample rate must be > 0")]
    ZeroSampleRate,

    #[error("non-finite sample at index {index}")]
    NonFiniteSample { index: usize },
}

/// Prosodic statistics for one analyzed span of audio.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProsodyFeatures {
    /// Mean fundamental frequency over voiced frames (Hz).
    pub pitch_mean: f64,
    /// Standard deviation of the fundamental over voiced frames (Hz).
    pub pitch_std: f64,
    /// Max minus min fundamental over voiced frames (Hz).
    pub pitch_range: f64,

    /// Mean frame RMS amplitude.
    pub energy_mean: f64,
    pub energy_std: f64,
    pub energy_max: f64,

    pub duration_sec: f64,
    /// Words per minute; only known when the caller supplies a word count.
    pub speaking_rate: Option<f64>,
    /// Non-pause to pause transitions across consecutive frames.
    pub pause_count: u32,
    /// Fraction of frames flagged as pause, in [0, 1].
    pub pause_ratio: f64,
}

/// Extracts prosody features from a finite mono waveform in [-1, 1].
///
/// Fails fast on a zero sample rate or non-finite samples; silent, short or
/// entirely unvoiced audio is not an error and yields defined defaults
/// (baseline pitch, zero energy and pause statistics).
pub fn extract_features(
    samples: &[f32],
    sample_rate: u32,
    word_count: Option<u32>,
) -> Result<ProsodyFeatures, FeatureError> {
    if sample_rate == 0 {
        return Err(FeatureError::ZeroSampleRate);
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(FeatureError::NonFiniteSample { index });
    }

    let duration_sec = samples.len() as f64 / f64::from(sample_rate);

    let rms = frame_rms_track(samples);
    let (energy_mean, energy_std) = mean_std(&rms);
    let energy_max = rms.iter().copied().fold(0.0f64, f64::max);

    let (pause_count, pause_ratio) = pause_stats(&rms);

    let voiced = voiced_pitch_track(samples, sample_rate);
    let (pitch_mean, pitch_std, pitch_range) = if voiced.is_empty() {
        // No detectable voiced pitch: neutral baseline, zero spread.
        (DEFAULT_BASELINE_PITCH_HZ, 0.0, 0.0)
    } else {
        let (mean, std) = mean_std(&voiced);
        let min = voiced.iter().copied().fold(f64::INFINITY, f64::min);
        let max = voiced.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (mean, std, max - min)
    };

    let speaking_rate = match word_count {
        Some(words) if duration_sec > 0.0 => Some(f64::from(words) / duration_sec * 60.0),
        _ => None,
    };

    Ok(ProsodyFeatures {
        pitch_mean,
        pitch_std,
        pitch_range,
        energy_mean,
        energy_std,
        energy_max,
        duration_sec,
        speaking_rate,
        pause_count,
        pause_ratio,
    })
}

/// Frame boundaries over the shared grid. A clip shorter than one frame is
/// analyzed as a single whole-clip frame; an empty clip has no frames.
fn frame_ranges(len: usize) -> Vec<(usize, usize)> {
    if len == 0 {
        return Vec::new();
    }
    if len < FRAME_SIZE {
        return vec![(0, len)];
    }
    let num_frames = (len - FRAME_SIZE) / FRAME_HOP + 1;
    (0..num_frames)
        .map(|t| (t * FRAME_HOP, t * FRAME_HOP + FRAME_SIZE))
        .collect()
}

fn frame_rms_track(samples: &[f32]) -> Vec<f64> {
    frame_ranges(samples.len())
        .into_iter()
        .map(|(start, end)| {
            let frame = &samples[start..end];
            let sum_sq: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
            (sum_sq / frame.len() as f64).sqrt()
        })
        .collect()
}

fn voiced_pitch_track(samples: &[f32], sample_rate: u32) -> Vec<f64> {
    frame_ranges(samples.len())
        .into_iter()
        .filter_map(|(start, end)| pitch::estimate_f0(&samples[start..end], sample_rate))
        .collect()
}

/// Pause statistics over the frame RMS track.
///
/// The threshold is the 20th percentile of frame RMS; the pause predicate is
/// inclusive (`rms <= threshold`) so a uniformly silent clip is all-pause.
fn pause_stats(rms: &[f64]) -> (u32, f64) {
    if rms.is_empty() {
        return (0, 0.0);
    }
    let threshold = percentile(rms, PAUSE_PERCENTILE);
    let flags: Vec<bool> = rms.iter().map(|&v| v <= threshold).collect();

    let pause_count = flags.windows(2).filter(|w| !w[0] && w[1]).count() as u32;
    let pause_ratio = flags.iter().filter(|&&p| p).count() as f64 / flags.len() as f64;
    (pause_count, pause_ratio)
}

/// Linear-interpolation percentile over unsorted values (numpy convention).
fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Population mean and standard deviation; (0, 0) for an empty slice.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

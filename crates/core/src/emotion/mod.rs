//! Rule-based emotion scoring over prosody features.

mod rules;
mod scorer;

use crate::features::ProsodyFeatures;
use serde::{Deserialize, Serialize};

pub use scorer::{analyze_clip, EmotionScorer, NEUTRAL_FALLBACK_CONFIDENCE};

/// Closed taxonomy of emotions detectable from vocal delivery.
///
/// Declaration order is the canonical tie-break order everywhere a ranking
/// or an argmax is produced.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Joy,
    Sadness,
    Anger,
    Stress,
    Calm,
    Fear,
    Excitement,
    Neutral,
}

impl EmotionLabel {
    /// All labels, in declaration order.
    pub const ALL: [EmotionLabel; 8] = [
        EmotionLabel::Joy,
        EmotionLabel::Sadness,
        EmotionLabel::Anger,
        EmotionLabel::Stress,
        EmotionLabel::Calm,
        EmotionLabel::Fear,
        EmotionLabel::Excitement,
        EmotionLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Joy => "joy",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Stress => "stress",
            EmotionLabel::Calm => "calm",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Excitement => "excitement",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One label with its normalized confidence in [0, 1].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionScore {
    pub label: EmotionLabel,
    pub confidence: f64,
}

/// Qualitative five-bucket readings of the vocal delivery. Presentation
/// sugar for downstream consumers; not part of the scoring contract.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocalCharacteristics {
    pub pitch_level: String,
    pub pitch_variation: String,
    pub energy_level: String,
    pub speaking_speed: String,
}

/// Rounded prosody features as exposed on the output boundary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProsodyRaw {
    pub pitch_mean_hz: f64,
    pub pitch_std_hz: f64,
    pub pitch_range_hz: f64,
    pub energy_mean: f64,
    pub energy_std: f64,
    pub energy_max: f64,
    pub duration_sec: f64,
    pub speaking_rate_wpm: Option<f64>,
    pub pause_count: u32,
    pub pause_ratio: f64,
}

impl From<&ProsodyFeatures> for ProsodyRaw {
    fn from(f: &ProsodyFeatures) -> Self {
        Self {
            pitch_mean_hz: round_to(f.pitch_mean, 2),
            pitch_std_hz: round_to(f.pitch_std, 2),
            pitch_range_hz: round_to(f.pitch_range, 2),
            energy_mean: round_to(f.energy_mean, 4),
            energy_std: round_to(f.energy_std, 4),
            energy_max: round_to(f.energy_max, 4),
            duration_sec: round_to(f.duration_sec, 2),
            speaking_rate_wpm: f.speaking_rate.map(|r| round_to(r, 1)),
            pause_count: f.pause_count,
            pause_ratio: round_to(f.pause_ratio, 3),
        }
    }
}

/// Full emotional state of one analyzed span. Field names are a
/// compatibility contract for downstream consumers (transport layers,
/// report generators).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionReport {
    pub dominant_emotion: EmotionScore,
    pub all_emotions: Vec<EmotionScore>,
    pub vocal_characteristics: VocalCharacteristics,
    pub prosody_raw: ProsodyRaw,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

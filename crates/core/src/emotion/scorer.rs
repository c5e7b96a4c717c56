use super::rules::{RatioSet, RULES};
use super::{EmotionLabel, EmotionReport, EmotionScore, ProsodyRaw, VocalCharacteristics};
use crate::config::{Baseline, REFERENCE_PITCH_STD_HZ};
use crate::features::{extract_features, FeatureError, ProsodyFeatures};

/// Confidence reported for `neutral` when no rule contributes any weight.
///
/// The fallback ranking is `neutral` at this confidence followed by the
/// remaining labels at 0.0 in declaration order; it is a fixed contract, not
/// a derived quantity.
pub const NEUTRAL_FALLBACK_CONFIDENCE: f64 = 0.5;

/// Rule-based emotion scorer. A pure function of `(features, baseline)`:
/// identical inputs always produce the identical ranked output.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmotionScorer {
    baseline: Baseline,
}

impl EmotionScorer {
    pub fn new(baseline: Baseline) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// Scores every label against the rule table and returns the `top_n`
    /// highest confidences, descending; ties keep declaration order.
    ///
    /// Across the full label set the confidences sum to 1 whenever any rule
    /// fired; otherwise the documented neutral fallback is returned.
    pub fn analyze_emotions(&self, features: &ProsodyFeatures, top_n: usize) -> Vec<EmotionScore> {
        let ratios = self.ratios(features);

        let raw: Vec<f64> = RULES.iter().map(|rule| rule.raw_score(&ratios)).collect();
        let total: f64 = raw.iter().sum();

        let mut scores: Vec<EmotionScore> = if total > 0.0 {
            RULES
                .iter()
                .zip(&raw)
                .map(|(rule, &score)| EmotionScore {
                    label: rule.label,
                    confidence: score / total,
                })
                .collect()
        } else {
            return self.neutral_fallback(top_n);
        };

        // Stable sort: equal confidences keep the table's declaration order.
        scores.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scores.truncate(top_n);
        scores
    }

    fn neutral_fallback(&self, top_n: usize) -> Vec<EmotionScore> {
        let mut scores = vec![EmotionScore {
            label: EmotionLabel::Neutral,
            confidence: NEUTRAL_FALLBACK_CONFIDENCE,
        }];
        scores.extend(
            EmotionLabel::ALL
                .iter()
                .filter(|&&label| label != EmotionLabel::Neutral)
                .map(|&label| EmotionScore {
                    label,
                    confidence: 0.0,
                }),
        );
        scores.truncate(top_n);
        scores
    }

    /// Top-1 of a top-1 request.
    pub fn dominant_emotion(&self, features: &ProsodyFeatures) -> EmotionScore {
        self.analyze_emotions(features, 1)
            .into_iter()
            .next()
            .unwrap_or(EmotionScore {
                label: EmotionLabel::Neutral,
                confidence: NEUTRAL_FALLBACK_CONFIDENCE,
            })
    }

    /// Full boundary-schema report for one analyzed span.
    pub fn report(&self, features: &ProsodyFeatures, top_n: usize) -> EmotionReport {
        let mut all_emotions = self.analyze_emotions(features, top_n);
        for score in &mut all_emotions {
            score.confidence = super::round_to(score.confidence, 3);
        }
        let dominant_emotion = all_emotions.first().copied().unwrap_or(EmotionScore {
            label: EmotionLabel::Neutral,
            confidence: NEUTRAL_FALLBACK_CONFIDENCE,
        });

        EmotionReport {
            dominant_emotion,
            all_emotions,
            vocal_characteristics: self.vocal_characteristics(features),
            prosody_raw: ProsodyRaw::from(features),
        }
    }

    fn ratios(&self, features: &ProsodyFeatures) -> RatioSet {
        RatioSet {
            pitch_ratio: features.pitch_mean / self.baseline.pitch_hz,
            pitch_var_ratio: features.pitch_std / REFERENCE_PITCH_STD_HZ,
            energy_ratio: features.energy_mean / self.baseline.energy,
            pause_ratio: features.pause_ratio,
            pitch_range_hz: features.pitch_range,
            pause_count: f64::from(features.pause_count),
            duration_sec: features.duration_sec,
            speaking_rate: features.speaking_rate,
        }
    }

    fn vocal_characteristics(&self, features: &ProsodyFeatures) -> VocalCharacteristics {
        VocalCharacteristics {
            pitch_level: self.interpret_pitch(features.pitch_mean).to_owned(),
            pitch_variation: interpret_pitch_variation(features.pitch_std).to_owned(),
            energy_level: self.interpret_energy(features.energy_mean).to_owned(),
            speaking_speed: interpret_speaking_rate(features.speaking_rate, features.pause_ratio)
                .to_owned(),
        }
    }

    fn interpret_pitch(&self, pitch_mean: f64) -> &'static str {
        let ratio = pitch_mean / self.baseline.pitch_hz;
        if ratio < 0.85 {
            "very_low"
        } else if ratio < 0.95 {
            "low"
        } else if ratio < 1.05 {
            "normal"
        } else if ratio < 1.15 {
            "high"
        } else {
            "very_high"
        }
    }

    fn interpret_energy(&self, energy_mean: f64) -> &'static str {
        let ratio = energy_mean / self.baseline.energy;
        if ratio < 0.7 {
            "very_low"
        } else if ratio < 0.9 {
            "low"
        } else if ratio < 1.1 {
            "normal"
        } else if ratio < 1.3 {
            "high"
        } else {
            "very_high"
        }
    }
}

fn interpret_pitch_variation(pitch_std: f64) -> &'static str {
    let ratio = pitch_std / REFERENCE_PITCH_STD_HZ;
    if ratio < 0.6 {
        "monotone"
    } else if ratio < 0.9 {
        "low_variation"
    } else if ratio < 1.2 {
        "normal_variation"
    } else if ratio < 1.5 {
        "high_variation"
    } else {
        "very_expressive"
    }
}

/// Speaking speed from words per minute when known, otherwise estimated
/// from how much of the clip is pause.
fn interpret_speaking_rate(speaking_rate: Option<f64>, pause_ratio: f64) -> &'static str {
    if let Some(wpm) = speaking_rate {
        return if wpm < 100.0 {
            "very_slow"
        } else if wpm < 130.0 {
            "slow"
        } else if wpm < 170.0 {
            "normal"
        } else if wpm < 200.0 {
            "fast"
        } else {
            "very_fast"
        };
    }
    if pause_ratio > 0.25 {
        "very_slow"
    } else if pause_ratio > 0.18 {
        "slow"
    } else if pause_ratio > 0.12 {
        "normal"
    } else if pause_ratio > 0.08 {
        "fast"
    } else {
        "very_fast"
    }
}

/// One-shot analysis of a whole clip with a per-clip auto-calibrated
/// baseline (`pitch_mean × 0.95`, default reference energy).
pub fn analyze_clip(
    samples: &[f32],
    sample_rate: u32,
    word_count: Option<u32>,
    top_n: usize,
) -> Result<EmotionReport, FeatureError> {
    let features = extract_features(samples, sample_rate, word_count)?;
    let baseline = Baseline::calibrated(features.pitch_mean, Baseline::default().energy);
    Ok(EmotionScorer::new(baseline).report(&features, top_n.max(1)))
}

//! The scoring table as data.
//!
//! Each label carries a fixed list of `(predicate, weight)` conditions over
//! the normalized feature ratios. The weights encode domain calibration and
//! are reproduced verbatim from the reference rule set; do not re-derive
//! them.

use super::EmotionLabel;

/// Normalized feature ratios the predicates are evaluated against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RatioSet {
    /// pitch_mean / baseline pitch.
    pub pitch_ratio: f64,
    /// pitch_std / 20 Hz reference variation.
    pub pitch_var_ratio: f64,
    /// energy_mean / baseline energy.
    pub energy_ratio: f64,
    /// Raw pause ratio in [0, 1].
    pub pause_ratio: f64,
    /// Raw pitch range (Hz).
    pub pitch_range_hz: f64,
    /// Raw pause transition count.
    pub pause_count: f64,
    /// Clip duration (s), for duration-relative pause frequency.
    pub duration_sec: f64,
    /// Words per minute, when known.
    pub speaking_rate: Option<f64>,
}

type Predicate = fn(&RatioSet) -> bool;

pub(crate) struct Rule {
    pub label: EmotionLabel,
    pub conditions: &'static [(Predicate, f64)],
}

/// One rule per label, in the taxonomy's declaration order.
pub(crate) const RULES: [Rule; 8] = [
    // High pitch, lively variation, raised energy, few pauses.
    Rule {
        label: EmotionLabel::Joy,
        conditions: &[
            (|r| r.pitch_ratio > 1.1, 0.30),
            (|r| r.pitch_var_ratio > 1.3, 0.30),
            (|r| r.energy_ratio > 1.2, 0.25),
            (|r| r.pause_ratio < 0.12, 0.15),
        ],
    },
    // Low flat pitch, low energy, long pauses.
    Rule {
        label: EmotionLabel::Sadness,
        conditions: &[
            (|r| r.pitch_ratio < 0.9, 0.35),
            (|r| r.pitch_var_ratio < 0.7, 0.25),
            (|r| r.energy_ratio < 0.8, 0.25),
            (|r| r.pause_ratio > 0.20, 0.15),
        ],
    },
    // Very high pitch, wide range, very high energy, hardly any pauses.
    Rule {
        label: EmotionLabel::Anger,
        conditions: &[
            (|r| r.pitch_ratio > 1.25, 0.30),
            (|r| r.pitch_range_hz > 100.0, 0.25),
            (|r| r.energy_ratio > 1.5, 0.30),
            (|r| r.pause_ratio < 0.10, 0.15),
        ],
    },
    // Raised trembling pitch, frequent pauses.
    Rule {
        label: EmotionLabel::Stress,
        conditions: &[
            (|r| r.pitch_ratio > 1.15, 0.25),
            (|r| r.pitch_var_ratio > 1.4, 0.35),
            (|r| r.pause_count > r.duration_sec * 0.8, 0.25),
            (|r| r.energy_ratio > 1.1, 0.15),
        ],
    },
    // Everything near baseline, steady pausing.
    Rule {
        label: EmotionLabel::Calm,
        conditions: &[
            (|r| r.pitch_ratio > 0.95 && r.pitch_ratio < 1.05, 0.30),
            (|r| r.pitch_var_ratio < 1.0, 0.30),
            (|r| r.energy_ratio > 0.85 && r.energy_ratio < 1.15, 0.25),
            (|r| r.pause_ratio > 0.12 && r.pause_ratio < 0.18, 0.15),
        ],
    },
    // High unstable pitch with irregular pausing.
    Rule {
        label: EmotionLabel::Fear,
        conditions: &[
            (|r| r.pitch_ratio > 1.2, 0.30),
            (|r| r.pitch_var_ratio > 1.3, 0.25),
            (|r| r.energy_ratio > 1.0, 0.20),
            (|r| r.pause_count > r.duration_sec * 0.6, 0.25),
        ],
    },
    // Lifted pitch and very high energy, fast delivery when rate is known.
    Rule {
        label: EmotionLabel::Excitement,
        conditions: &[
            (|r| r.pitch_ratio > 1.1, 0.25),
            (|r| r.pitch_var_ratio > 1.2, 0.25),
            (|r| r.energy_ratio > 1.4, 0.35),
            (|r| r.speaking_rate.map_or(false, |wpm| wpm > 150.0), 0.15),
        ],
    },
    // All indicators close to baseline.
    Rule {
        label: EmotionLabel::Neutral,
        conditions: &[
            (|r| r.pitch_ratio > 0.9 && r.pitch_ratio < 1.1, 0.30),
            (|r| r.pitch_var_ratio > 0.8 && r.pitch_var_ratio < 1.2, 0.30),
            (|r| r.energy_ratio > 0.9 && r.energy_ratio < 1.1, 0.25),
            (|r| r.pause_ratio > 0.10 && r.pause_ratio < 0.20, 0.15),
        ],
    },
];

impl Rule {
    /// Sum of the weights whose predicates hold.
    pub(crate) fn raw_score(&self, ratios: &RatioSet) -> f64 {
        self.conditions
            .iter()
            .filter(|(predicate, _)| predicate(ratios))
            .map(|(_, weight)| weight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_ratios() -> RatioSet {
        RatioSet {
            pitch_ratio: 1.0,
            pitch_var_ratio: 1.0,
            energy_ratio: 1.0,
            pause_ratio: 0.15,
            pitch_range_hz: 40.0,
            pause_count: 1.0,
            duration_sec: 3.0,
            speaking_rate: None,
        }
    }

    #[test]
    fn table_covers_every_label_in_order() {
        for (rule, label) in RULES.iter().zip(EmotionLabel::ALL) {
            assert_eq!(rule.label, label);
            assert_eq!(rule.conditions.len(), 4);
        }
    }

    #[test]
    fn neutral_delivery_scores_full_neutral_weight() {
        let r = neutral_ratios();
        let neutral = &RULES[7];
        assert_eq!(neutral.label, EmotionLabel::Neutral);
        assert!((neutral.raw_score(&r) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn anger_needs_extreme_pitch_and_energy() {
        let mut r = neutral_ratios();
        let anger = &RULES[2];
        assert_eq!(anger.raw_score(&r), 0.0);

        r.pitch_ratio = 1.3;
        r.pitch_range_hz = 120.0;
        r.energy_ratio = 1.6;
        r.pause_ratio = 0.05;
        assert!((anger.raw_score(&r) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn excitement_rate_condition_requires_known_rate() {
        let mut r = neutral_ratios();
        r.pitch_ratio = 1.2;
        r.pitch_var_ratio = 1.3;
        r.energy_ratio = 1.5;
        let excitement = &RULES[6];
        let without_rate = excitement.raw_score(&r);
        r.speaking_rate = Some(180.0);
        let with_rate = excitement.raw_score(&r);
        assert!((with_rate - without_rate - 0.15).abs() < 1e-9);
    }

    #[test]
    fn boundary_values_do_not_fire_strict_predicates() {
        let mut r = neutral_ratios();
        r.pitch_ratio = 1.1;
        let joy = &RULES[0];
        // Exactly 1.1 is not "> 1.1".
        assert!(!(joy.conditions[0].0)(&r));
        r.pause_ratio = 0.10;
        let anger = &RULES[2];
        assert!(!(anger.conditions[3].0)(&r));
    }
}

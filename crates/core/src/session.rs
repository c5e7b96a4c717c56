//! Session-level aggregation and analyzer ownership.

use crate::config::WindowConfig;
use crate::emotion::{EmotionLabel, EmotionScore};
use crate::streaming::StreamingAnalyzer;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Aggregate emotional statistics over a session's analysis history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    pub total_analyses: usize,
    /// Per-label confidence mass, normalized to sum 1. Empty for an empty
    /// history.
    pub emotion_distribution: BTreeMap<EmotionLabel, f64>,
    pub dominant_emotion_overall: EmotionLabel,
    pub average_confidence: f64,
}

/// Derives a summary from a dominant-emotion history. An empty history is
/// not an error: the result is fully defined with a neutral dominant.
pub fn summarize(history: &[EmotionScore]) -> SessionSummary {
    if history.is_empty() {
        return SessionSummary {
            total_analyses: 0,
            emotion_distribution: BTreeMap::new(),
            dominant_emotion_overall: EmotionLabel::Neutral,
            average_confidence: 0.0,
        };
    }

    let mut distribution: BTreeMap<EmotionLabel, f64> = BTreeMap::new();
    let mut confidence_sum = 0.0;
    for entry in history {
        *distribution.entry(entry.label).or_insert(0.0) += entry.confidence;
        confidence_sum += entry.confidence;
    }

    let mass: f64 = distribution.values().sum();
    if mass > 0.0 {
        for weight in distribution.values_mut() {
            *weight /= mass;
        }
    }

    // Strictly-greater argmax over declaration order: ties go to the
    // first-declared label.
    let mut dominant = EmotionLabel::Neutral;
    let mut best = f64::NEG_INFINITY;
    for label in EmotionLabel::ALL {
        if let Some(&weight) = distribution.get(&label) {
            if weight > best {
                dominant = label;
                best = weight;
            }
        }
    }

    SessionSummary {
        total_analyses: history.len(),
        emotion_distribution: distribution,
        dominant_emotion_overall: dominant,
        average_confidence: confidence_sum / history.len() as f64,
    }
}

/// Explicit owner of per-session analyzers.
///
/// Keyed create/lookup/evict replaces any ambient global mapping; the
/// registry itself is owned by whichever transport component manages session
/// lifecycles, and single-writer-per-session discipline is that owner's
/// responsibility.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, StreamingAnalyzer>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh analyzer for `session_id`, replacing (and dropping)
    /// any existing one, and returns a handle to it.
    pub fn create(&mut self, session_id: &str, config: WindowConfig) -> &mut StreamingAnalyzer {
        match self.sessions.entry(session_id.to_owned()) {
            Entry::Occupied(mut entry) => {
                entry.insert(StreamingAnalyzer::new(config));
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(StreamingAnalyzer::new(config)),
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&StreamingAnalyzer> {
        self.sessions.get(session_id)
    }

    pub fn get_mut(&mut self, session_id: &str) -> Option<&mut StreamingAnalyzer> {
        self.sessions.get_mut(session_id)
    }

    /// Removes a session, returning its analyzer so the owner can take a
    /// final summary before dropping it.
    pub fn evict(&mut self, session_id: &str) -> Option<StreamingAnalyzer> {
        self.sessions.remove(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(label: EmotionLabel, confidence: f64) -> EmotionScore {
        EmotionScore { label, confidence }
    }

    #[test]
    fn empty_history_summary_is_fully_defined() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_analyses, 0);
        assert!(summary.emotion_distribution.is_empty());
        assert_eq!(summary.dominant_emotion_overall, EmotionLabel::Neutral);
        assert_eq!(summary.average_confidence, 0.0);
    }

    #[test]
    fn distribution_is_normalized_confidence_mass() {
        let history = [
            score(EmotionLabel::Stress, 0.6),
            score(EmotionLabel::Stress, 0.2),
            score(EmotionLabel::Calm, 0.2),
        ];
        let summary = summarize(&history);
        assert_eq!(summary.total_analyses, 3);
        assert!((summary.emotion_distribution[&EmotionLabel::Stress] - 0.8).abs() < 1e-9);
        assert!((summary.emotion_distribution[&EmotionLabel::Calm] - 0.2).abs() < 1e-9);
        let total: f64 = summary.emotion_distribution.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(summary.dominant_emotion_overall, EmotionLabel::Stress);
        assert!((summary.average_confidence - (0.6 + 0.2 + 0.2) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn dominant_tie_breaks_to_first_declared_label() {
        let history = [
            score(EmotionLabel::Calm, 0.5),
            score(EmotionLabel::Joy, 0.5),
        ];
        let summary = summarize(&history);
        assert_eq!(summary.dominant_emotion_overall, EmotionLabel::Joy);
    }

    #[test]
    fn summary_after_reset_matches_empty_summary() {
        let mut analyzer = StreamingAnalyzer::with_defaults();
        let window_size = analyzer.config().window_size();
        analyzer.ingest(&vec![0.0f32; window_size]);
        assert!(!analyzer.history().is_empty());

        analyzer.reset();
        let summary = summarize(analyzer.history());
        assert_eq!(summary.total_analyses, 0);
        assert!(summary.emotion_distribution.is_empty());
        assert_eq!(summary.dominant_emotion_overall, EmotionLabel::Neutral);
        assert_eq!(summary.average_confidence, 0.0);
    }

    #[test]
    fn summary_serializes_schema_field_names() {
        let summary = summarize(&[score(EmotionLabel::Stress, 0.78)]);
        let value = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(value["total_analyses"], 1);
        assert!((value["emotion_distribution"]["stress"].as_f64().expect("weight") - 1.0).abs()
            < 1e-9);
        assert_eq!(value["dominant_emotion_overall"], "stress");
        assert!((value["average_confidence"].as_f64().expect("mean") - 0.78).abs() < 1e-9);
    }

    #[test]
    fn registry_create_lookup_evict() {
        let mut registry = SessionRegistry::new();
        assert!(registry.is_empty());

        registry.create("a", WindowConfig::default());
        registry.create("b", WindowConfig::default());
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert!(registry.get("missing").is_none());

        let window_size = WindowConfig::default().window_size();
        let analyzer = registry.get_mut("a").expect("present");
        analyzer.ingest(&vec![0.0f32; window_size]);
        assert_eq!(registry.get("a").expect("present").history().len(), 1);

        let evicted = registry.evict("a").expect("present");
        assert_eq!(evicted.history().len(), 1);
        assert_eq!(summarize(evicted.history()).total_analyses, 1);
        assert!(!registry.contains("a"));
        assert!(registry.evict("a").is_none());
    }

    #[test]
    fn create_replaces_existing_session() {
        let mut registry = SessionRegistry::new();
        let window_size = WindowConfig::default().window_size();
        registry
            .create("a", WindowConfig::default())
            .ingest(&vec![0.0f32; window_size]);
        assert_eq!(registry.get("a").expect("present").history().len(), 1);

        registry.create("a", WindowConfig::default());
        assert!(registry.get("a").expect("present").history().is_empty());
        assert_eq!(registry.len(), 1);
    }
}

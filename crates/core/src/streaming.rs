//! Stateful sliding-window analysis of live audio.
//!
//! One `StreamingAnalyzer` exists per logical session and is owned
//! exclusively by whatever manages that session's lifecycle. There is no
//! internal locking: callers enforce single-writer discipline.

use crate::config::{WindowConfig, DEFAULT_TOP_N};
use crate::emotion::{analyze_clip, EmotionLabel, EmotionReport, EmotionScore};
use crate::util::SampleBuffer;

/// Accumulates incoming chunks into an overlapping sliding window and scores
/// each completed window, keeping an ordered history of dominant emotions.
#[derive(Clone, Debug)]
pub struct StreamingAnalyzer {
    config: WindowConfig,
    buffer: SampleBuffer,
    history: Vec<EmotionScore>,
}

impl StreamingAnalyzer {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            buffer: SampleBuffer::new(),
            history: Vec::new(),
        }
    }

    /// 16 kHz, 3 s window, 1 s hop.
    pub fn with_defaults() -> Self {
        Self::new(WindowConfig::default())
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    /// One dominant-emotion entry per completed window, oldest first.
    pub fn history(&self) -> &[EmotionScore] {
        &self.history
    }

    pub fn buffered_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Appends a chunk and analyzes every window it completes.
    ///
    /// Returns the last report produced during this call, or `None` if no
    /// window completed. Never fails: an empty chunk is a no-op and a chunk
    /// with non-finite samples is dropped with a warning, so one bad chunk
    /// cannot tear down a live session.
    pub fn ingest(&mut self, chunk: &[f32]) -> Option<EmotionReport> {
        if chunk.is_empty() {
            return None;
        }
        if chunk.iter().any(|s| !s.is_finite()) {
            tracing::warn!(len = chunk.len(), "dropping chunk with non-finite samples");
            return None;
        }
        self.buffer.extend(chunk);

        let window_size = self.config.window_size();
        let hop_size = self.config.hop_size();
        let mut last = None;

        while let Some(window) = self.buffer.window(window_size) {
            match analyze_clip(window, self.config.sample_rate(), None, DEFAULT_TOP_N) {
                Ok(report) => {
                    tracing::debug!(
                        dominant = %report.dominant_emotion.label,
                        confidence = report.dominant_emotion.confidence,
                        "window analyzed"
                    );
                    self.history.push(report.dominant_emotion);
                    last = Some(report);
                }
                Err(e) => {
                    // Samples were validated on the way in; absorb anyway so
                    // the session stays alive.
                    tracing::warn!(error = %e, "window analysis failed");
                }
            }
            self.buffer.advance(hop_size);
        }
        last
    }

    /// Confidence-weighted majority label over the last `last_n` history
    /// entries, scanned most-recent-first; ties go to the label encountered
    /// first in the scan. Neutral when the history is empty.
    pub fn trend(&self, last_n: usize) -> EmotionLabel {
        let mut votes: Vec<(EmotionLabel, f64)> = Vec::new();
        for entry in self.history.iter().rev().take(last_n) {
            match votes.iter_mut().find(|(label, _)| *label == entry.label) {
                Some((_, weight)) => *weight += entry.confidence,
                None => votes.push((entry.label, entry.confidence)),
            }
        }

        let mut best = EmotionLabel::Neutral;
        let mut best_weight = f64::NEG_INFINITY;
        for (label, weight) in votes {
            if weight > best_weight {
                best = label;
                best_weight = weight;
            }
        }
        if best_weight == f64::NEG_INFINITY {
            EmotionLabel::Neutral
        } else {
            best
        }
    }

    /// Clears the buffer and the emotion history. Idempotent.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.history.clear();
    }
}

impl Default for StreamingAnalyzer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

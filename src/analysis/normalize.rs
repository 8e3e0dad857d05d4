use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::category::{classify_label, PatternCategory};
use super::raw::RawAnalysis;

/// The six-category percentage vector every chart consumes. Each value is
/// clamped to [0, 100]; the sum stays within 100 plus rounding slack.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryPercentages {
    pub normal: f64,
    pub blocking: f64,
    pub prolongation: f64,
    pub sound_repetition: f64,
    pub word_repetition: f64,
    pub interjection: f64,
}

impl CategoryPercentages {
    pub fn get(&self, category: PatternCategory) -> f64 {
        match category {
            PatternCategory::Normal => self.normal,
            PatternCategory::Blocking => self.blocking,
            PatternCategory::Prolongation => self.prolongation,
            PatternCategory::SoundRepetition => self.sound_repetition,
            PatternCategory::WordRepetition => self.word_repetition,
            PatternCategory::Interjection => self.interjection,
        }
    }

    fn slot(&mut self, category: PatternCategory) -> &mut f64 {
        match category {
            PatternCategory::Normal => &mut self.normal,
            PatternCategory::Blocking => &mut self.blocking,
            PatternCategory::Prolongation => &mut self.prolongation,
            PatternCategory::SoundRepetition => &mut self.sound_repetition,
            PatternCategory::WordRepetition => &mut self.word_repetition,
            PatternCategory::Interjection => &mut self.interjection,
        }
    }

    pub fn total(&self) -> f64 {
        PatternCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Complement used by the dashboards: 100 minus the normal-speech share.
    pub fn stutter_rate(&self) -> f64 {
        (100.0 - self.normal).clamp(0.0, 100.0)
    }
}

/// One session's normalized analysis. Created once per session, immutable,
/// read many times by the trend engine and the dashboard queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub session_id: String,
    pub raw: RawAnalysis,
    pub percentages: CategoryPercentages,
    /// The normalization denominator: segment count, summed counts, or 100
    /// for the legacy confidence-map shape.
    pub total_units: f64,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn from_raw(session_id: impl Into<String>, raw: RawAnalysis) -> Self {
        let (percentages, total_units) = normalize(&raw);
        Self {
            session_id: session_id.into(),
            raw,
            percentages,
            total_units,
            analyzed_at: Utc::now(),
        }
    }
}

/// Normalize any raw classifier shape into the six-category percentage
/// vector plus the denominator used. Total over all inputs: a zero
/// denominator yields all-zero percentages, never a division by zero or NaN.
pub fn normalize(raw: &RawAnalysis) -> (CategoryPercentages, f64) {
    match raw {
        RawAnalysis::Segments(analysis) => {
            let denominator = analysis.segments.len() as f64;
            if denominator == 0.0 {
                return (CategoryPercentages::default(), 0.0);
            }

            // Sum each segment's confidence into its category; the
            // denominator is the segment count, not the confidence sum.
            let mut accumulators: HashMap<PatternCategory, f64> = HashMap::new();
            for segment in &analysis.segments {
                if let Some(category) = classify_label(&segment.label) {
                    *accumulators.entry(category).or_insert(0.0) += segment.confidence;
                }
            }

            let mut percentages = CategoryPercentages::default();
            for (category, sum) in accumulators {
                *percentages.slot(category) = clamp_pct(100.0 * sum / denominator);
            }
            (percentages, denominator)
        }

        RawAnalysis::Legacy(analysis) => {
            // Already probability-like; scale each confidence to a percentage
            // and report 100 as the denominator for downstream consistency.
            let mut percentages = CategoryPercentages::default();
            for (label, confidence) in &analysis.confidences {
                if let Some(category) = classify_label(label) {
                    let slot = percentages.slot(category);
                    *slot = clamp_pct(*slot + 100.0 * confidence);
                }
            }
            (percentages, 100.0)
        }

        RawAnalysis::Summary(analysis) => {
            let denominator: u64 = analysis.0.values().sum();
            if denominator == 0 {
                return (CategoryPercentages::default(), 0.0);
            }

            let mut percentages = CategoryPercentages::default();
            for (label, count) in &analysis.0 {
                if let Some(category) = classify_label(label) {
                    let slot = percentages.slot(category);
                    *slot = clamp_pct(*slot + 100.0 * *count as f64 / denominator as f64);
                }
            }
            (percentages, denominator as f64)
        }
    }
}

fn clamp_pct(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

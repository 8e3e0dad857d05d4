use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw classifier output. The service has shipped three response shapes over
/// its lifetime; which one arrives is detected once, by field presence, and
/// dispatch happens on exactly one variant. Shapes are never merged.
///
/// Variant order is the detection priority: a payload with `segments` is the
/// segment shape even if it also carries a summary map; a payload with
/// `confidences` is the legacy shape; anything left is a bare label-count map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnalysis {
    Segments(SegmentAnalysis),
    Legacy(LegacyAnalysis),
    Summary(SummaryAnalysis),
}

/// Current shape: labeled time segments with confidences, plus an optional
/// precomputed label-count summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub segments: Vec<RawSegment>,
    #[serde(default)]
    pub summary: HashMap<String, u64>,
}

/// One labeled time interval. Segments arrive in non-decreasing start order
/// from the classifier, but consumers must not rely on that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSegment {
    pub start_sec: f64,
    pub end_sec: f64,
    pub label: String,
    /// Conventionally in [0, 1] but not guaranteed by the producer.
    pub confidence: f64,
}

/// Legacy shape: one confidence per category, with an optional frame timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyAnalysis {
    #[serde(default)]
    pub top_class: Option<String>,
    pub confidences: HashMap<String, f64>,
    #[serde(default)]
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub confidences: Vec<f64>,
    #[serde(default)]
    pub top: Option<String>,
}

/// Oldest shape: a bare `{label: count}` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryAnalysis(pub HashMap<String, u64>);

//! Analysis aggregation engine
//!
//! Everything between the classifier's raw response and a chart: the closed
//! category set, the three raw wire shapes, the normalizer that flattens any
//! of them into one percentage vector, and the longitudinal trend engine.

pub mod category;
pub mod normalize;
pub mod raw;
pub mod trend;

pub use category::{classify_label, PatternCategory};
pub use normalize::{normalize, AnalysisRecord, CategoryPercentages};
pub use raw::{LegacyAnalysis, RawAnalysis, RawSegment, SegmentAnalysis, SummaryAnalysis};
pub use trend::{category_trend, trend_points, CategoryTrend, TrendDirection, TrendPoint};

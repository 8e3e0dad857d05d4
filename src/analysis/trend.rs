use chrono::{DateTime, Utc};
use serde::Serialize;

use super::category::PatternCategory;
use super::normalize::{AnalysisRecord, CategoryPercentages};

/// One chart-ready point per analysis record.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub percentages: CategoryPercentages,
    pub stutter_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// First-vs-last comparison for one category. Deliberately a two-point delta,
/// not a fitted slope. `percent_change` is an unsigned magnitude; the sign
/// lives in `direction` (`Down` is improvement for stutter categories).
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTrend {
    pub category: PatternCategory,
    pub direction: TrendDirection,
    pub absolute_change: f64,
    pub percent_change: f64,
}

/// Flatten an ordered-by-time record list (ties broken by arrival order) into
/// chart points.
pub fn trend_points(records: &[AnalysisRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .map(|record| TrendPoint {
            session_id: record.session_id.clone(),
            timestamp: record.analyzed_at,
            percentages: record.percentages,
            stutter_rate: record.percentages.stutter_rate(),
        })
        .collect()
}

/// Trend descriptor for one category across the record list, or `None` with
/// fewer than two records (insufficient data is reported, never fabricated
/// into a `Stable` trend).
pub fn category_trend(
    records: &[AnalysisRecord],
    category: PatternCategory,
) -> Option<CategoryTrend> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) if records.len() >= 2 => (first, last),
        _ => return None,
    };

    let first_value = first.percentages.get(category);
    let last_value = last.percentages.get(category);
    let absolute_change = last_value - first_value;

    let direction = if absolute_change > 0.0 {
        TrendDirection::Up
    } else if absolute_change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let percent_change = if first_value > 0.0 {
        (absolute_change / first_value).abs() * 100.0
    } else {
        0.0
    };

    Some(CategoryTrend {
        category,
        direction,
        absolute_change,
        percent_change,
    })
}

// Integration tests for the trend engine
//
// Trends are a first-vs-last two-point comparison per category, with an
// explicit "insufficient data" outcome below two records.

use chrono::{Duration, Utc};
use fluentrack::analysis::{
    category_trend, trend_points, AnalysisRecord, CategoryPercentages, PatternCategory,
    RawAnalysis, SummaryAnalysis, TrendDirection,
};
use std::collections::HashMap;

fn record(session: &str, offset_secs: i64, percentages: CategoryPercentages) -> AnalysisRecord {
    AnalysisRecord {
        session_id: session.to_string(),
        raw: RawAnalysis::Summary(SummaryAnalysis(HashMap::new())),
        percentages,
        total_units: 10.0,
        analyzed_at: Utc::now() + Duration::seconds(offset_secs),
    }
}

fn blocking(value: f64) -> CategoryPercentages {
    CategoryPercentages {
        blocking: value,
        normal: 100.0 - value,
        ..Default::default()
    }
}

#[test]
fn test_improving_blocking_trend() {
    let records = vec![
        record("s1", 0, blocking(40.0)),
        record("s2", 60, blocking(30.0)),
        record("s3", 120, blocking(10.0)),
    ];

    let trend = category_trend(&records, PatternCategory::Blocking)
        .expect("three records produce a trend");

    assert_eq!(trend.direction, TrendDirection::Down, "lower is improvement");
    assert_eq!(trend.absolute_change, -30.0);
    assert_eq!(trend.percent_change, 75.0, "unsigned magnitude");
}

#[test]
fn test_single_record_produces_no_trend() {
    let records = vec![record("s1", 0, blocking(40.0))];

    for category in PatternCategory::ALL {
        assert!(
            category_trend(&records, category).is_none(),
            "one record is insufficient data, not a stable trend"
        );
    }
}

#[test]
fn test_no_records_produces_no_trend() {
    assert!(category_trend(&[], PatternCategory::Normal).is_none());
}

#[test]
fn test_equal_endpoints_are_stable() {
    let records = vec![
        record("s1", 0, blocking(20.0)),
        record("s2", 60, blocking(35.0)),
        record("s3", 120, blocking(20.0)),
    ];

    let trend = category_trend(&records, PatternCategory::Blocking).unwrap();

    assert_eq!(trend.direction, TrendDirection::Stable);
    assert_eq!(trend.absolute_change, 0.0);
    assert_eq!(trend.percent_change, 0.0);
}

#[test]
fn test_zero_first_value_avoids_division() {
    let records = vec![
        record("s1", 0, blocking(0.0)),
        record("s2", 60, blocking(10.0)),
    ];

    let trend = category_trend(&records, PatternCategory::Blocking).unwrap();

    assert_eq!(trend.direction, TrendDirection::Up);
    assert_eq!(trend.absolute_change, 10.0);
    assert_eq!(trend.percent_change, 0.0, "no division by a zero baseline");
}

#[test]
fn test_points_carry_stutter_rate_complement() {
    let records = vec![
        record("s1", 0, blocking(40.0)),
        record("s2", 60, blocking(10.0)),
    ];

    let points = trend_points(&records);

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].session_id, "s1");
    assert_eq!(points[0].stutter_rate, 40.0, "100 minus the normal share");
    assert_eq!(points[1].stutter_rate, 10.0);
}

//! Line segments for daily values and field observations.

use log::warn;
use serde::{Deserialize, Serialize};
use wdv_utils::dates::MILLIS_PER_DAY;

/// Consecutive daily values at least this far apart are drawn disconnected.
pub const TWO_DAYS_MILLIS: i64 = 2 * MILLIS_PER_DAY;

/// Daily-value or field-observation results as parallel per-timestep arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyValueSeries {
    /// Epoch millis, ascending.
    pub date_times: Vec<i64>,
    pub results: Vec<Option<f64>>,
    pub approvals: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date_time: i64,
    pub value: Option<f64>,
}

/// A run of daily points sharing one approvals list. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySegment {
    pub approvals: Vec<String>,
    pub points: Vec<DailyPoint>,
}

/// Split daily values into segments on approval changes and on gaps of
/// [`TWO_DAYS_MILLIS`] or more.
///
/// On an approval change without a gap the new point is also appended to the
/// outgoing segment, so the line stays connected across the transition. A
/// gap always leaves a visible break.
pub fn daily_line_segments(series: &DailyValueSeries) -> Vec<DailySegment> {
    let len = series
        .date_times
        .len()
        .min(series.results.len())
        .min(series.approvals.len());
    if len != series.date_times.len() || len != series.results.len() || len != series.approvals.len() {
        warn!(
            "Daily value arrays differ in length ({}, {}, {}); using the first {}",
            series.date_times.len(),
            series.results.len(),
            series.approvals.len(),
            len
        );
    }

    let mut segments: Vec<DailySegment> = Vec::new();
    let mut previous_date_time: Option<i64> = None;

    for index in 0..len {
        let point = DailyPoint {
            date_time: series.date_times[index],
            value: series.results[index],
        };
        let approvals = &series.approvals[index];
        let has_gap = previous_date_time
            .map_or(false, |previous| point.date_time - previous >= TWO_DAYS_MILLIS);
        previous_date_time = Some(point.date_time);

        match segments.last_mut() {
            Some(current) if !has_gap && current.approvals == *approvals => {
                current.points.push(point);
                continue;
            }
            Some(current) if !has_gap => current.points.push(point),
            _ => {}
        }
        segments.push(DailySegment {
            approvals: approvals.clone(),
            points: vec![point],
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = MILLIS_PER_DAY;

    fn series(days: &[i64], approvals: &[&[&str]]) -> DailyValueSeries {
        DailyValueSeries {
            date_times: days.iter().map(|d| d * DAY).collect(),
            results: days.iter().map(|d| Some(*d as f64)).collect(),
            approvals: approvals
                .iter()
                .map(|a| a.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn days_of(segment: &DailySegment) -> Vec<i64> {
        segment.points.iter().map(|p| p.date_time / DAY).collect()
    }

    #[test]
    fn test_empty_series() {
        assert!(daily_line_segments(&DailyValueSeries::default()).is_empty());
    }

    #[test]
    fn test_contiguous_same_approvals() {
        let s = series(&[1, 2, 3], &[&["Approved"], &["Approved"], &["Approved"]]);
        let segments = daily_line_segments(&s);
        assert_eq!(segments.len(), 1);
        assert_eq!(days_of(&segments[0]), vec![1, 2, 3]);
    }

    #[test]
    fn test_gap_breaks_without_duplication() {
        let s = series(&[1, 2, 4, 5], &[&["Approved"], &["Approved"], &["Approved"], &["Approved"]]);
        let segments = daily_line_segments(&s);
        assert_eq!(segments.len(), 2);
        assert_eq!(days_of(&segments[0]), vec![1, 2]);
        assert_eq!(days_of(&segments[1]), vec![4, 5]);
    }

    #[test]
    fn test_gap_just_under_two_days_does_not_break() {
        let mut s = series(&[1, 2], &[&["Approved"], &["Approved"]]);
        s.date_times[1] = s.date_times[0] + TWO_DAYS_MILLIS - 1;
        assert_eq!(daily_line_segments(&s).len(), 1);
    }

    #[test]
    fn test_approval_change_duplicates_transition_point() {
        let s = series(&[1, 2, 3, 4], &[&["Approved"], &["Approved"], &["Provisional"], &["Provisional"]]);
        let segments = daily_line_segments(&s);
        assert_eq!(segments.len(), 2);
        assert_eq!(days_of(&segments[0]), vec![1, 2, 3]);
        assert_eq!(segments[0].approvals, vec!["Approved"]);
        assert_eq!(days_of(&segments[1]), vec![3, 4]);
        assert_eq!(segments[1].approvals, vec!["Provisional"]);
    }

    #[test]
    fn test_approvals_compared_by_value() {
        let s = series(&[1, 2], &[&["Approved", "Estimated"], &["Approved", "Estimated"]]);
        assert_eq!(daily_line_segments(&s).len(), 1);
        let s = series(&[1, 2], &[&["Approved", "Estimated"], &["Approved"]]);
        assert_eq!(daily_line_segments(&s).len(), 2);
    }

    #[test]
    fn test_gap_and_approval_change_does_not_duplicate() {
        let s = series(&[1, 5], &[&["Approved"], &["Provisional"]]);
        let segments = daily_line_segments(&s);
        assert_eq!(segments.len(), 2);
        assert_eq!(days_of(&segments[0]), vec![1]);
        assert_eq!(days_of(&segments[1]), vec![5]);
    }

    #[test]
    fn test_mismatched_lengths_use_shortest() {
        let mut s = series(&[1, 2, 3], &[&["Approved"], &["Approved"]]);
        s.results.truncate(3);
        let segments = daily_line_segments(&s);
        assert_eq!(days_of(&segments[0]), vec![1, 2]);
    }
}

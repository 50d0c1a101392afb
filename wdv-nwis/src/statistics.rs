//! Day-of-year statistics decoded from RDB records.

use crate::rdb::RdbRecord;
use log::warn;
use serde::{Deserialize, Serialize};

/// A day-of-year statistic (e.g. the median daily mean) not yet tied to a year.
///
/// `month` is 1-based. `date_time` is epoch millis and stays `None` until the
/// point is projected onto a calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPoint {
    pub month: u32,
    pub day: u32,
    pub value: f64,
    pub date_time: Option<i64>,
}

impl StatPoint {
    pub fn new(month: u32, day: u32, value: f64) -> StatPoint {
        StatPoint {
            month,
            day,
            value,
            date_time: None,
        }
    }

    fn from_record(record: &RdbRecord, value_column: &str) -> Option<StatPoint> {
        let month = record.get("month_nu")?.trim().parse::<u32>().ok()?;
        let day = record.get("day_nu")?.trim().parse::<u32>().ok()?;
        let value = record.get(value_column)?.trim().parse::<f64>().ok()?;
        Some(StatPoint::new(month, day, value))
    }
}

/// Column holding the median in daily statistics RDB output.
pub const MEDIAN_COLUMN: &str = "p50_va";

/// Decode daily statistics rows into day-of-year points for one statistic
/// column. Rows with a missing or non-numeric month, day, or value are skipped.
pub fn stat_points_from_records(records: &[RdbRecord], value_column: &str) -> Vec<StatPoint> {
    records
        .iter()
        .filter_map(|record| {
            let point = StatPoint::from_record(record, value_column);
            if point.is_none() {
                warn!(
                    "Skipping statistics row for site {:?} month {:?} day {:?}: unparseable {}",
                    record.get("site_no"),
                    record.get("month_nu"),
                    record.get("day_nu"),
                    value_column
                );
            }
            point
        })
        .collect()
}

/// Median points from daily statistics RDB rows.
pub fn median_points(records: &[RdbRecord]) -> Vec<StatPoint> {
    stat_points_from_records(records, MEDIAN_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdb::parse_rdb;

    const MEDIAN_RDB: &str = include_str!("../../fixtures/median_statistics.rdb");

    #[test]
    fn test_median_points() {
        let records = parse_rdb(MEDIAN_RDB).unwrap();
        let points = median_points(&records);
        assert_eq!(points.len(), 13);
        assert_eq!(points[0], StatPoint::new(2, 24, 26.0));
        assert_eq!(points[5], StatPoint::new(2, 29, 28.0));
        assert!(points.iter().all(|p| p.date_time.is_none()));
    }

    #[test]
    fn test_median_points_skips_bad_rows() {
        let rdb = "month_nu\tday_nu\tp50_va\n3n\t3n\t12s\n1\t1\t4.5\n1\t2\t\nx\t3\t7\n";
        let records = parse_rdb(rdb).unwrap();
        let points = median_points(&records);
        assert_eq!(points, vec![StatPoint::new(1, 1, 4.5)]);
    }
}

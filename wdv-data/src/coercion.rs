//! Calendar coercion of day-of-year statistics onto a display window.

use chrono_tz::Tz;
use log::{debug, warn};
use wdv_nwis::StatPoint;
use wdv_utils::dates::{calc_start_time, is_leap_year, midnight_millis, year_in_zone};

/// Statistics are projected onto at most this many calendar years, counted
/// back from the year the window ends in.
pub const MAX_PROJECTED_YEARS: i32 = 200;

/// Day-of-year statistics and the end of the window they are displayed in.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticalSeries {
    pub points: Vec<StatPoint>,
    /// Epoch millis.
    pub end_time: i64,
}

fn millis(point: &StatPoint) -> i64 {
    point.date_time.unwrap_or(i64::MIN)
}

fn redated(point: &StatPoint, date_time: i64) -> StatPoint {
    StatPoint {
        date_time: Some(date_time),
        ..point.clone()
    }
}

/// Project every point onto each calendar year touched by `[first_year, last_year]`.
///
/// Feb 29 is dropped in non-leap years. A point that already carries a
/// `date_time` keeps it.
fn dated_points(points: &[StatPoint], first_year: i32, last_year: i32, tz: Tz) -> Vec<StatPoint> {
    let mut dated = Vec::with_capacity(points.len() * (last_year - first_year + 1).max(1) as usize);
    for year in first_year..=last_year {
        for point in points {
            if (point.month, point.day) == (2, 29) && !is_leap_year(year) {
                continue;
            }
            match point
                .date_time
                .or_else(|| midnight_millis(year, point.month, point.day, tz))
            {
                Some(date_time) => dated.push(redated(point, date_time)),
                None => warn!(
                    "Skipping statistic with invalid date {}-{}-{}",
                    year, point.month, point.day
                ),
            }
        }
    }
    dated.sort_by_key(millis);
    dated
}

/// Project day-of-year statistics onto the dates of the window of length
/// `period` ending at `series.end_time`, as a step function spanning the
/// whole window.
///
/// The result is ascending; its first point is at the window start and its
/// last at the window end. When the first visible point falls after the
/// start, the point preceding it (wrapping to the latest point) is repeated
/// at the start; when the last visible point falls before the end, it is
/// repeated at the end.
pub fn coerce(series: &StatisticalSeries, period: &str, tz: Tz) -> Vec<StatPoint> {
    let end_time = series.end_time;
    let start_time = calc_start_time(period, end_time, tz);
    let (first_year, last_year) = match (year_in_zone(start_time, tz), year_in_zone(end_time, tz)) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            warn!("Window {}..{} is out of calendar range", start_time, end_time);
            return Vec::new();
        }
    };
    let first_year = if last_year - first_year >= MAX_PROJECTED_YEARS {
        warn!(
            "Window {}..={} spans more than {} years, projecting statistics from {}",
            first_year,
            last_year,
            MAX_PROJECTED_YEARS,
            last_year - MAX_PROJECTED_YEARS + 1
        );
        last_year - MAX_PROJECTED_YEARS + 1
    } else {
        first_year
    };

    let dated = dated_points(&series.points, first_year, last_year, tz);
    if dated.is_empty() {
        return dated;
    }

    let lo = dated.partition_point(|p| millis(p) < start_time);
    let hi = dated.partition_point(|p| millis(p) <= end_time);
    let mut coerced = dated[lo..hi].to_vec();

    if coerced.first().map_or(true, |p| millis(p) > start_time) {
        let preceding = if lo == 0 { dated.last() } else { dated.get(lo - 1) };
        if let Some(point) = preceding {
            coerced.insert(0, redated(point, start_time));
        }
    }
    if let Some(last) = coerced.last() {
        if millis(last) < end_time {
            let extended = redated(last, end_time);
            coerced.push(extended);
        }
    }

    debug!(
        "Coerced {} statistics over {}..={} into {} points",
        series.points.len(),
        first_year,
        last_year,
        coerced.len()
    );
    coerced
}

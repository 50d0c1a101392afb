//! Cursor lookup: the point closest to a given instant.

use crate::daily_segments::DailyPoint;
use wdv_nwis::{Point, StatPoint};

/// Anything positioned on the time axis, in epoch millis. `None` for points
/// not yet placed on the calendar.
pub trait Timestamped {
    fn date_time(&self) -> Option<i64>;
}

impl Timestamped for Point {
    fn date_time(&self) -> Option<i64> {
        Some(self.date_time)
    }
}

impl Timestamped for DailyPoint {
    fn date_time(&self) -> Option<i64> {
        Some(self.date_time)
    }
}

impl Timestamped for StatPoint {
    fn date_time(&self) -> Option<i64> {
        self.date_time
    }
}

/// The point nearest `time` in a slice sorted ascending by date, with any
/// undated points first. Undated points are never returned.
///
/// Between the neighbors either side of the insertion position, the later
/// one wins only when it is strictly closer; an exact midpoint resolves to
/// the earlier neighbor.
pub fn nearest_point<T: Timestamped>(points: &[T], time: i64) -> Option<&T> {
    let index = points.partition_point(|p| p.date_time().map_or(true, |t| t < time));
    let left = index
        .checked_sub(1)
        .and_then(|i| points.get(i))
        .and_then(|p| Some((p, p.date_time()?)));
    let right = points.get(index).and_then(|p| Some((p, p.date_time()?)));
    match (left, right) {
        (Some((left, left_time)), Some((right, right_time))) => {
            if time.abs_diff(left_time) > right_time.abs_diff(time) {
                Some(right)
            } else {
                Some(left)
            }
        }
        (left, right) => left.or(right).map(|(point, _)| point),
    }
}

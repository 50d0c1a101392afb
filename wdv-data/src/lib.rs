//! Rendering preparation for hydrologic time series.
//!
//! This crate turns normalized points and day-of-year statistics into forms
//! suitable for charting: calendar-coerced step functions, classification
//! aware line segments, and nearest-point lookups for cursors.

pub mod coercion;
pub mod daily_segments;
pub mod line_segments;
pub mod nearest;
pub mod store;

pub use coercion::{coerce, StatisticalSeries};
pub use daily_segments::{daily_line_segments, DailyPoint, DailySegment, DailyValueSeries};
pub use line_segments::{line_segments, LineClasses, LineSegment};
pub use nearest::{nearest_point, Timestamped};
pub use store::TimeSeriesStore;

//! Pipeline commands over local WaterML JSON and RDB files.

use crate::write_json;
use anyhow::Context;
use log::info;
use std::collections::BTreeMap;
use wdv_data::{coerce, LineSegment, StatisticalSeries, TimeSeriesStore};
use wdv_nwis::{normalize_json, parse_rdb, statistics::median_points, Normalized};
use wdv_utils::dates::{format_millis, parse_instant, parse_time_zone};

fn read_normalized(input: &str, request_key: &str) -> anyhow::Result<Normalized> {
    let text = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?;
    let normalized = normalize_json(&text, request_key)?;
    info!(
        "Normalized {}: {} time series, {} issues",
        input,
        normalized.entities.time_series.len(),
        normalized.issues.len()
    );
    Ok(normalized)
}

fn store_for(input: &str, request_key: &str) -> anyhow::Result<TimeSeriesStore> {
    let normalized = read_normalized(input, request_key)?;
    let mut store = TimeSeriesStore::new();
    store.merge(normalized.entities);
    Ok(store)
}

/// Line segments for every time series in the store, keyed by id.
pub(crate) fn all_segments(store: &mut TimeSeriesStore) -> BTreeMap<String, Vec<LineSegment>> {
    let ids = store
        .entities()
        .time_series
        .keys()
        .cloned()
        .collect::<Vec<String>>();
    ids.into_iter()
        .filter_map(|id| {
            let segments = store.line_segments(&id)?.to_vec();
            Some((id, segments))
        })
        .collect()
}

pub fn run_normalize(input: &str, request_key: &str, output: Option<&str>) -> anyhow::Result<()> {
    let normalized = read_normalized(input, request_key)?;
    write_json(&normalized.entities, output)
}

pub fn run_segments(input: &str, request_key: &str, output: Option<&str>) -> anyhow::Result<()> {
    let mut store = store_for(input, request_key)?;
    let segments = all_segments(&mut store);
    for (id, lines) in &segments {
        info!("{}: {} segments", id, lines.len());
    }
    write_json(&segments, output)
}

pub fn run_medians(
    input: &str,
    period: &str,
    end: &str,
    time_zone: &str,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let tz = parse_time_zone(time_zone)?;
    let end_time = parse_instant(end, tz)?;
    let rdb = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?;
    let records = parse_rdb(&rdb)?;
    let series = StatisticalSeries {
        points: median_points(&records),
        end_time,
    };
    let coerced = coerce(&series, period, tz);
    info!(
        "Coerced {} medians into {} points ending {}",
        series.points.len(),
        coerced.len(),
        format_millis(end_time, tz)
    );
    write_json(&coerced, output)
}

pub fn run_nearest(
    input: &str,
    request_key: &str,
    time_series: &str,
    time: &str,
    time_zone: &str,
) -> anyhow::Result<()> {
    let tz = parse_time_zone(time_zone)?;
    let instant = parse_instant(time, tz)?;
    let store = store_for(input, request_key)?;
    if store.points(time_series).is_none() {
        anyhow::bail!("Time series {} not found in {}", time_series, input);
    }
    match store.nearest_point(time_series, instant) {
        Some(point) => {
            info!("Nearest point at {}", format_millis(point.date_time, tz));
            write_json(point, None)
        }
        None => {
            info!("Time series {} has no points", time_series);
            Ok(())
        }
    }
}

//! Live fetch of current values and daily medians for one site.

use crate::{local::all_segments, write_json};
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use wdv_data::{coerce, LineSegment, StatisticalSeries, TimeSeriesStore};
use wdv_nwis::{
    api::{fetch_median_statistics, fetch_time_series, TimeWindow},
    normalize_json, parse_rdb,
    statistics::median_points,
    EntityGraph, StatPoint,
};
use wdv_utils::dates::{format_millis, parse_time_zone};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchReport<'a> {
    entities: &'a EntityGraph,
    segments: BTreeMap<String, Vec<LineSegment>>,
    medians: Vec<StatPoint>,
}

pub async fn run_fetch(
    site: &str,
    parameter_code: &str,
    period: &str,
    time_zone: &str,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let tz = parse_time_zone(time_zone)?;
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let request_key = format!("current:{}", period);

    let mut store = TimeSeriesStore::new();
    let window = TimeWindow::Period(period.to_string());
    match fetch_time_series(&client, &[site], &[parameter_code], &window).await? {
        Some(body) => {
            let normalized = normalize_json(&body, &request_key)?;
            store.replace_request(&request_key, normalized.entities);
        }
        None => warn!("No time series returned for site {}", site),
    }

    let end_time = store
        .entities()
        .time_series
        .values()
        .filter_map(|ts| ts.end_time)
        .max()
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let medians = match fetch_median_statistics(&client, site, &[parameter_code]).await? {
        Some(rdb) => {
            let series = StatisticalSeries {
                points: median_points(&parse_rdb(&rdb)?),
                end_time,
            };
            coerce(&series, period, tz)
        }
        None => Vec::new(),
    };
    info!(
        "Site {}: {} time series, {} median points through {}",
        site,
        store.entities().time_series.len(),
        medians.len(),
        format_millis(end_time, tz)
    );

    let segments = all_segments(&mut store);
    let report = FetchReport {
        entities: store.entities(),
        segments,
        medians,
    };
    write_json(&report, output)
}

//! In-memory session store over the normalized entity graph.

use crate::line_segments::{line_segments, LineSegment};
use crate::nearest::nearest_point;
use log::debug;
use std::collections::HashMap;
use wdv_nwis::{EntityGraph, Point};

/// Session state: the merged entity graph plus derived line segments cached
/// per time series id.
///
/// The cache lives exactly as long as the store. Every merge or reset drops
/// the cached segments of the time series it touches.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesStore {
    entities: EntityGraph,
    segment_cache: HashMap<String, Vec<LineSegment>>,
}

impl TimeSeriesStore {
    pub fn new() -> TimeSeriesStore {
        TimeSeriesStore::default()
    }

    pub fn entities(&self) -> &EntityGraph {
        &self.entities
    }

    fn invalidate<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        for id in ids {
            if self.segment_cache.remove(id).is_some() {
                debug!("Dropped cached segments for {}", id);
            }
        }
    }

    /// Deep-merge a freshly normalized graph into the session.
    pub fn merge(&mut self, incoming: EntityGraph) {
        let touched = incoming.time_series.keys().cloned().collect::<Vec<String>>();
        self.invalidate(&touched);
        self.entities = self.entities.merged(incoming);
    }

    /// Remove every time series fetched under `request_key` and clear its request.
    pub fn reset_request(&mut self, request_key: &str) {
        let touched = self.entities.time_series_ids_for_request(request_key);
        self.invalidate(&touched);
        self.entities = self.entities.reset_request(request_key);
    }

    /// Reset `request_key`, then merge `incoming`. Use when the new result
    /// supersedes the stored one and may hold fewer points.
    pub fn replace_request(&mut self, request_key: &str, incoming: EntityGraph) {
        self.reset_request(request_key);
        self.merge(incoming);
    }

    pub fn points(&self, time_series_id: &str) -> Option<&[Point]> {
        self.entities
            .time_series
            .get(time_series_id)
            .map(|ts| ts.points.as_slice())
    }

    /// Line segments for a time series, computed on first use.
    pub fn line_segments(&mut self, time_series_id: &str) -> Option<&[LineSegment]> {
        if !self.segment_cache.contains_key(time_series_id) {
            let segments = line_segments(self.points(time_series_id)?);
            self.segment_cache.insert(time_series_id.to_string(), segments);
        }
        self.segment_cache.get(time_series_id).map(Vec::as_slice)
    }

    /// The point of a time series nearest `time`.
    pub fn nearest_point(&self, time_series_id: &str, time: i64) -> Option<&Point> {
        nearest_point(self.points(time_series_id)?, time)
    }
}

//! The normalized entity graph.
//!
//! Each table maps a synthetic identifier to a flat entity. Cross references
//! are identifiers into sibling tables rather than nested objects.

use crate::merge::{merge_by_replace, merge_fields, Merge};
use crate::query_note::TimeRangeFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single time-series reading.
///
/// `value` is `None` when the service reported the variable's no-data
/// sentinel. Points are replaced wholesale on merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub date_time: i64,
    pub value: Option<f64>,
    pub qualifiers: Vec<String>,
    pub approved: bool,
    pub estimated: bool,
}

merge_by_replace!(Point);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub srs: String,
    pub latitude: f64,
    pub longitude: f64,
}

merge_fields!(GeoLocation { srs, latitude, longitude });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub site_name: String,
    pub site_code: String,
    pub agency_code: String,
    pub network: String,
    pub geo_location: GeoLocation,
    /// Key into the `timeZones` table.
    pub time_zone: String,
    pub properties: BTreeMap<String, String>,
}

merge_fields!(Site {
    site_name,
    site_code,
    agency_code,
    network,
    geo_location,
    time_zone,
    properties,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    pub zone_offset: String,
    pub zone_abbreviation: String,
}

merge_fields!(ZoneInfo { zone_offset, zone_abbreviation });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeZone {
    pub default_time_zone: ZoneInfo,
    pub daylight_savings_time_zone: Option<ZoneInfo>,
    pub site_uses_daylight_savings_time: bool,
}

merge_fields!(TimeZone {
    default_time_zone,
    daylight_savings_time_zone,
    site_uses_daylight_savings_time,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCode {
    pub value: String,
    pub network: String,
    pub vocabulary: String,
    pub variable_id: i64,
    pub default: bool,
}

merge_fields!(VariableCode {
    value,
    network,
    vocabulary,
    variable_id,
    default,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub oid: String,
    pub variable_code: VariableCode,
    pub variable_name: String,
    pub variable_description: String,
    pub value_type: String,
    pub unit: String,
    /// Statistic option codes by option name, e.g. "Statistic" -> "00000".
    pub options: BTreeMap<String, String>,
    pub no_data_value: Option<f64>,
}

merge_fields!(Variable {
    oid,
    variable_code,
    variable_name,
    variable_description,
    value_type,
    unit,
    options,
    no_data_value,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Qualifier {
    pub qualifier_code: String,
    pub qualifier_description: String,
    pub qualifier_id: i64,
    pub network: String,
    pub vocabulary: String,
}

merge_fields!(Qualifier {
    qualifier_code,
    qualifier_description,
    qualifier_id,
    network,
    vocabulary,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub method_id: i64,
    pub method_description: String,
}

merge_fields!(Method { method_id, method_description });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    /// The request key this series was fetched under.
    pub ts_key: String,
    /// Key into the `variables` table.
    pub variable: String,
    /// Key into the `methods` table.
    pub method: String,
    /// Keys into the `qualifiers` table.
    pub qualifiers: Vec<String>,
    pub points: Vec<Point>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

merge_fields!(TimeSeries {
    ts_key,
    variable,
    method,
    qualifiers,
    points,
    start_time,
    end_time,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesCollection {
    pub name: String,
    /// Key into the `sites` table.
    pub site: String,
    /// Key into the `variables` table.
    pub variable: String,
    /// Keys into the `timeSeries` table.
    pub time_series: Vec<String>,
}

merge_fields!(TimeSeriesCollection {
    name,
    site,
    variable,
    time_series,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInfo {
    #[serde(rename = "queryURL")]
    pub query_url: String,
    pub location_param: String,
    pub variable_param: String,
    /// Raw query notes by title.
    pub notes: BTreeMap<String, String>,
    /// Parsed `filter:timeRange` note, when recognizable.
    pub time_range: Option<TimeRangeFilter>,
}

merge_fields!(QueryInfo {
    query_url,
    location_param,
    variable_param,
    notes,
    time_range,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Key into the `queryInfo` table.
    pub query_info: Option<String>,
    /// Keys into the `timeSeriesCollections` table.
    pub time_series_collections: Vec<String>,
}

merge_fields!(Request {
    query_info,
    time_series_collections,
});

/// All normalized tables for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityGraph {
    pub sites: BTreeMap<String, Site>,
    pub time_zones: BTreeMap<String, TimeZone>,
    pub variables: BTreeMap<String, Variable>,
    pub qualifiers: BTreeMap<String, Qualifier>,
    pub methods: BTreeMap<String, Method>,
    pub time_series: BTreeMap<String, TimeSeries>,
    pub time_series_collections: BTreeMap<String, TimeSeriesCollection>,
    pub query_info: BTreeMap<String, QueryInfo>,
    pub requests: BTreeMap<String, Request>,
}

merge_fields!(EntityGraph {
    sites,
    time_zones,
    variables,
    qualifiers,
    methods,
    time_series,
    time_series_collections,
    query_info,
    requests,
});

impl EntityGraph {
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
            && self.time_zones.is_empty()
            && self.variables.is_empty()
            && self.qualifiers.is_empty()
            && self.methods.is_empty()
            && self.time_series.is_empty()
            && self.time_series_collections.is_empty()
            && self.query_info.is_empty()
            && self.requests.is_empty()
    }

    /// A new graph with `other` deep-merged over this one.
    pub fn merged(&self, other: EntityGraph) -> EntityGraph {
        let mut next = self.clone();
        next.merge(other);
        next
    }

    /// A new graph with every time series fetched under `request_key`
    /// removed and that request set to an empty entry. Other requests are untouched.
    ///
    /// Merging cannot shrink a point array, so a request whose new result may
    /// be shorter than the stored one must be reset before it is merged.
    pub fn reset_request(&self, request_key: &str) -> EntityGraph {
        let mut next = self.clone();
        next.time_series.retain(|_, ts| ts.ts_key != request_key);
        next.requests.insert(request_key.to_string(), Request::default());
        next
    }

    /// Ids of the time series fetched under `request_key`.
    pub fn time_series_ids_for_request(&self, request_key: &str) -> Vec<String> {
        self.time_series
            .iter()
            .filter(|(_, ts)| ts.ts_key == request_key)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// The variable a time series measures.
    pub fn variable_for(&self, time_series_id: &str) -> Option<&Variable> {
        let ts = self.time_series.get(time_series_id)?;
        self.variables.get(&ts.variable)
    }
}

//! Serde model of the WaterML-style JSON time-series response.
//!
//! Field names follow the upstream service exactly. Every struct defaults
//! missing fields so partial documents still deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSeriesDocument {
    pub name: String,
    pub declared_type: String,
    pub value: ResponseValue,
}

impl TimeSeriesDocument {
    pub fn is_empty(&self) -> bool {
        self.value.time_series.is_empty() && self.value.query_info.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseValue {
    pub query_info: RawQueryInfo,
    pub time_series: Vec<RawTimeSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQueryInfo {
    #[serde(rename = "queryURL")]
    pub query_url: String,
    pub criteria: RawCriteria,
    pub note: Vec<RawNote>,
}

impl RawQueryInfo {
    pub fn is_empty(&self) -> bool {
        self.query_url.is_empty() && self.note.is_empty()
    }

    pub fn note(&self, title: &str) -> Option<&str> {
        self.note
            .iter()
            .find(|note| note.title == title)
            .map(|note| note.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCriteria {
    pub location_param: String,
    pub variable_param: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNote {
    pub value: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTimeSeries {
    pub source_info: RawSourceInfo,
    pub variable: RawVariable,
    pub values: Vec<RawValues>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSourceInfo {
    pub site_name: String,
    pub site_code: Vec<RawSiteCode>,
    pub time_zone_info: RawTimeZoneInfo,
    pub geo_location: RawGeoLocation,
    pub site_property: Vec<RawSiteProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSiteCode {
    pub value: String,
    pub network: String,
    pub agency_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTimeZoneInfo {
    pub default_time_zone: RawZone,
    pub daylight_savings_time_zone: Option<RawZone>,
    pub site_uses_daylight_savings_time: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawZone {
    pub zone_offset: String,
    pub zone_abbreviation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGeoLocation {
    pub geog_location: RawGeogLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGeogLocation {
    pub srs: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSiteProperty {
    pub value: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawVariable {
    pub variable_code: Vec<RawVariableCode>,
    pub variable_name: String,
    pub variable_description: String,
    pub value_type: String,
    pub unit: RawUnit,
    pub options: RawOptions,
    pub no_data_value: Option<f64>,
    pub oid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawVariableCode {
    pub value: String,
    pub network: String,
    pub vocabulary: String,
    #[serde(rename = "variableID")]
    pub variable_id: i64,
    pub default: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawUnit {
    pub unit_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptions {
    pub option: Vec<RawOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOption {
    pub name: String,
    pub option_code: String,
}

/// One block of values recorded with a single method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawValues {
    pub value: Vec<RawPoint>,
    pub qualifier: Vec<RawQualifier>,
    pub method: Vec<RawMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPoint {
    pub value: String,
    pub qualifiers: Vec<String>,
    pub date_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQualifier {
    pub qualifier_code: String,
    pub qualifier_description: String,
    #[serde(rename = "qualifierID")]
    pub qualifier_id: i64,
    pub network: String,
    pub vocabulary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMethod {
    pub method_description: String,
    #[serde(rename = "methodID")]
    pub method_id: i64,
}

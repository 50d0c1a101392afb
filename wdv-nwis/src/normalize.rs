//! Flatten a WaterML-style document into the keyed entity tables.
//!
//! Every identifier is a pure function of the entity's content and the
//! caller's request key, so repeated fetches of the same logical request
//! land on the same keys when merged.

use crate::entity::{
    EntityGraph, GeoLocation, Method, Point, Qualifier, QueryInfo, Request, Site, TimeSeries,
    TimeSeriesCollection, TimeZone, Variable, VariableCode, ZoneInfo,
};
use crate::error::Result;
use crate::qualifier::{APPROVED_CODE, ESTIMATED_CODE};
use crate::query_note::{parse_time_range, QueryNoteError, TIME_RANGE_NOTE};
use crate::waterml::{
    RawPoint, RawQueryInfo, RawSiteCode, RawTimeSeries, RawValues, RawVariable, RawZone,
    TimeSeriesDocument,
};
use log::{debug, warn};
use thiserror::Error;
use wdv_utils::dates::parse_iso_millis;

/// A series whose value block does not carry exactly one method.
///
/// The series built from the first method (or no method at all) is kept in
/// `fallback` so the pipeline can continue.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected exactly one method for time series {time_series_id}, found {method_ids:?}")]
pub struct SingleMethodViolation {
    pub time_series_id: String,
    pub method_ids: Vec<i64>,
    pub fallback: Box<TimeSeries>,
}

impl SingleMethodViolation {
    pub fn into_fallback(self) -> TimeSeries {
        *self.fallback
    }
}

/// Data-shape problems found while normalizing. None of them abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeIssue {
    #[error("time series {time_series_id} has methods {method_ids:?}; using the first")]
    MultipleMethods {
        time_series_id: String,
        method_ids: Vec<i64>,
    },

    #[error(transparent)]
    TimeRange(#[from] QueryNoteError),

    #[error("time series {time_series_id} dropped a point with unparseable dateTime '{date_time}'")]
    UnparseableDateTime {
        time_series_id: String,
        date_time: String,
    },
}

impl From<&SingleMethodViolation> for NormalizeIssue {
    fn from(violation: &SingleMethodViolation) -> Self {
        NormalizeIssue::MultipleMethods {
            time_series_id: violation.time_series_id.clone(),
            method_ids: violation.method_ids.clone(),
        }
    }
}

/// Output of [`normalize`]: the entity tables plus any reported issues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub entities: EntityGraph,
    pub issues: Vec<NormalizeIssue>,
}

/// `{methodIDs joined by ':'}:{requestKey}`
pub fn time_series_id(method_ids: &[i64], request_key: &str) -> String {
    let methods = method_ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(":");
    format!("{}:{}", methods, request_key)
}

/// `{collectionName}:{requestKey}`
pub fn collection_id(collection_name: &str, request_key: &str) -> String {
    format!("{}:{}", collection_name, request_key)
}

/// The site's own codes joined by ':'.
pub fn site_id(site_codes: &[RawSiteCode]) -> String {
    site_codes
        .iter()
        .map(|code| code.value.as_str())
        .collect::<Vec<&str>>()
        .join(":")
}

/// The service-provided variable oid, falling back to the variable code id.
pub fn variable_id(variable: &RawVariable) -> String {
    if !variable.oid.is_empty() {
        return variable.oid.clone();
    }
    variable
        .variable_code
        .first()
        .map(|code| code.variable_id.to_string())
        .unwrap_or_default()
}

fn build_point(raw: &RawPoint, no_data_value: Option<f64>) -> std::result::Result<Point, String> {
    let date_time = parse_iso_millis(&raw.date_time).map_err(|_| raw.date_time.clone())?;
    let value = raw
        .value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| Some(*v) != no_data_value);
    Ok(Point {
        date_time,
        value,
        approved: raw.qualifiers.iter().any(|q| q == APPROVED_CODE),
        estimated: raw.qualifiers.iter().any(|q| q == ESTIMATED_CODE),
        qualifiers: raw.qualifiers.clone(),
    })
}

/// Build one normalized series from a value block.
///
/// Points that cannot be dated are dropped and reported through `issues`.
/// A block without exactly one method yields a [`SingleMethodViolation`]
/// carrying the first-method series.
pub fn build_time_series(
    values: &RawValues,
    variable: &RawVariable,
    request_key: &str,
    issues: &mut Vec<NormalizeIssue>,
) -> std::result::Result<TimeSeries, SingleMethodViolation> {
    let method_ids = values
        .method
        .iter()
        .map(|method| method.method_id)
        .collect::<Vec<i64>>();
    let id = time_series_id(&method_ids, request_key);

    let mut points = Vec::with_capacity(values.value.len());
    for raw in &values.value {
        match build_point(raw, variable.no_data_value) {
            Ok(point) => points.push(point),
            Err(date_time) => {
                warn!("Dropping point with unparseable dateTime '{}' in {}", date_time, id);
                issues.push(NormalizeIssue::UnparseableDateTime {
                    time_series_id: id.clone(),
                    date_time,
                });
            }
        }
    }
    points.sort_by_key(|point| point.date_time);

    let time_series = TimeSeries {
        ts_key: request_key.to_string(),
        variable: variable_id(variable),
        method: method_ids.first().map(|m| m.to_string()).unwrap_or_default(),
        qualifiers: values
            .qualifier
            .iter()
            .map(|q| q.qualifier_code.clone())
            .collect(),
        start_time: points.first().map(|p| p.date_time),
        end_time: points.last().map(|p| p.date_time),
        points,
    };

    if method_ids.len() == 1 {
        Ok(time_series)
    } else {
        Err(SingleMethodViolation {
            time_series_id: id,
            method_ids,
            fallback: Box::new(time_series),
        })
    }
}

fn zone_info(raw: &RawZone) -> ZoneInfo {
    ZoneInfo {
        zone_offset: raw.zone_offset.clone(),
        zone_abbreviation: raw.zone_abbreviation.clone(),
    }
}

fn build_site(raw: &RawTimeSeries, id: &str) -> (Site, TimeZone) {
    let source = &raw.source_info;
    let first_code = source.site_code.first().cloned().unwrap_or_default();
    let geog = &source.geo_location.geog_location;
    let site = Site {
        site_name: source.site_name.clone(),
        site_code: first_code.value,
        agency_code: first_code.agency_code,
        network: first_code.network,
        geo_location: GeoLocation {
            srs: geog.srs.clone(),
            latitude: geog.latitude,
            longitude: geog.longitude,
        },
        time_zone: id.to_string(),
        properties: source
            .site_property
            .iter()
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect(),
    };
    let tz_info = &source.time_zone_info;
    let time_zone = TimeZone {
        default_time_zone: zone_info(&tz_info.default_time_zone),
        daylight_savings_time_zone: tz_info.daylight_savings_time_zone.as_ref().map(zone_info),
        site_uses_daylight_savings_time: tz_info.site_uses_daylight_savings_time,
    };
    (site, time_zone)
}

fn build_variable(raw: &RawVariable) -> Variable {
    let code = raw.variable_code.first().cloned().unwrap_or_default();
    Variable {
        oid: variable_id(raw),
        variable_code: VariableCode {
            value: code.value,
            network: code.network,
            vocabulary: code.vocabulary,
            variable_id: code.variable_id,
            default: code.default,
        },
        variable_name: raw.variable_name.clone(),
        variable_description: raw.variable_description.clone(),
        value_type: raw.value_type.clone(),
        unit: raw.unit.unit_code.clone(),
        options: raw
            .options
            .option
            .iter()
            .map(|o| (o.name.clone(), o.option_code.clone()))
            .collect(),
        no_data_value: raw.no_data_value,
    }
}

fn build_query_info(raw: &RawQueryInfo, issues: &mut Vec<NormalizeIssue>) -> QueryInfo {
    let time_range = raw
        .note(TIME_RANGE_NOTE)
        .and_then(|note| match parse_time_range(note) {
            Ok(filter) => Some(filter),
            Err(e) => {
                warn!("{}", e);
                issues.push(e.into());
                None
            }
        });
    QueryInfo {
        query_url: raw.query_url.clone(),
        location_param: raw.criteria.location_param.clone(),
        variable_param: raw.criteria.variable_param.clone(),
        notes: raw
            .note
            .iter()
            .map(|n| (n.title.clone(), n.value.clone()))
            .collect(),
        time_range,
    }
}

/// Normalize a document fetched under `request_key`. An absent or empty
/// document yields an empty graph.
pub fn normalize(document: Option<&TimeSeriesDocument>, request_key: &str) -> Normalized {
    let document = match document {
        Some(document) if !document.is_empty() => document,
        _ => {
            debug!("Empty document for request {}", request_key);
            return Normalized::default();
        }
    };

    let mut entities = EntityGraph::default();
    let mut issues = Vec::new();
    let mut collection_ids = Vec::with_capacity(document.value.time_series.len());

    for raw in &document.value.time_series {
        let site_key = site_id(&raw.source_info.site_code);
        let (site, time_zone) = build_site(raw, &site_key);
        entities.time_zones.insert(site_key.clone(), time_zone);
        entities.sites.insert(site_key.clone(), site);

        let variable = build_variable(&raw.variable);
        let variable_key = variable.oid.clone();
        entities.variables.insert(variable_key.clone(), variable);

        let mut series_ids = Vec::with_capacity(raw.values.len());
        for values in &raw.values {
            for qualifier in &values.qualifier {
                entities.qualifiers.insert(
                    qualifier.qualifier_code.clone(),
                    Qualifier {
                        qualifier_code: qualifier.qualifier_code.clone(),
                        qualifier_description: qualifier.qualifier_description.clone(),
                        qualifier_id: qualifier.qualifier_id,
                        network: qualifier.network.clone(),
                        vocabulary: qualifier.vocabulary.clone(),
                    },
                );
            }
            for method in &values.method {
                entities.methods.insert(
                    method.method_id.to_string(),
                    Method {
                        method_id: method.method_id,
                        method_description: method.method_description.clone(),
                    },
                );
            }

            let method_ids = values.method.iter().map(|m| m.method_id).collect::<Vec<i64>>();
            let id = time_series_id(&method_ids, request_key);
            let time_series =
                match build_time_series(values, &raw.variable, request_key, &mut issues) {
                    Ok(time_series) => time_series,
                    Err(violation) => {
                        warn!("{}", violation);
                        issues.push((&violation).into());
                        violation.into_fallback()
                    }
                };
            entities.time_series.insert(id.clone(), time_series);
            series_ids.push(id);
        }

        let collection_key = collection_id(&raw.name, request_key);
        entities.time_series_collections.insert(
            collection_key.clone(),
            TimeSeriesCollection {
                name: raw.name.clone(),
                site: site_key,
                variable: variable_key,
                time_series: series_ids,
            },
        );
        collection_ids.push(collection_key);
    }

    let query_info = &document.value.query_info;
    let query_info_key = if query_info.is_empty() {
        None
    } else {
        let info = build_query_info(query_info, &mut issues);
        entities.query_info.insert(request_key.to_string(), info);
        Some(request_key.to_string())
    };
    entities.requests.insert(
        request_key.to_string(),
        Request {
            query_info: query_info_key,
            time_series_collections: collection_ids,
        },
    );

    debug!(
        "Normalized request {}: {} time series, {} issues",
        request_key,
        entities.time_series.len(),
        issues.len()
    );
    Normalized { entities, issues }
}

/// Parse and normalize a JSON document. Blank text and `null` yield an empty graph.
pub fn normalize_json(text: &str, request_key: &str) -> Result<Normalized> {
    if text.trim().is_empty() {
        return Ok(Normalized::default());
    }
    let document = serde_json::from_str::<Option<TimeSeriesDocument>>(text)?;
    Ok(normalize(document.as_ref(), request_key))
}

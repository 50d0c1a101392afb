//! Inputs and entity graph for NWIS hydrologic time series.
//!
//! Parses the tab-delimited RDB statistics format and the WaterML-style JSON
//! time-series response, and flattens the latter into keyed entity tables
//! that can be deep-merged across repeated fetches.

pub mod entity;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod qualifier;
pub mod query_note;
pub mod rdb;
pub mod statistics;
pub mod waterml;

#[cfg(feature = "api")]
pub mod api;

pub use entity::{EntityGraph, Point, TimeSeries};
pub use merge::Merge;
pub use normalize::{normalize, normalize_json, Normalized, NormalizeIssue};
pub use qualifier::MaskQualifier;
pub use rdb::{parse_rdb, RdbRecord};
pub use statistics::StatPoint;

//! Parsing of the `filter:timeRange` query note.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wdv_utils::dates::parse_iso_millis;

/// Title of the query note describing the requested time range.
pub const TIME_RANGE_NOTE: &str = "filter:timeRange";

const INTERVAL_PREFIX: &str = "interval={INTERVAL[";
const INTERVAL_SUFFIX: &str = "]}";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryNoteError {
    #[error("Unrecognized time range note: {0}")]
    UnrecognizedTimeRange(String),
}

/// Start and end of an explicit request interval, epoch millis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

/// Structured form of the `filter:timeRange` query note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeRangeFilter {
    /// `[mode=PERIOD, period=P7D, modifiedSince=null]`
    Period {
        mode: String,
        #[serde(rename = "periodDays")]
        period_days: u32,
        #[serde(rename = "modifiedSince")]
        modified_since: String,
    },
    /// `[mode=RANGE, modifiedSince=null] interval={INTERVAL[start/end]}`
    Range {
        mode: String,
        #[serde(rename = "modifiedSince")]
        modified_since: String,
        interval: Interval,
    },
}

crate::merge::merge_by_replace!(TimeRangeFilter, Interval);

fn key_values(bracketed: &str) -> Option<Vec<(&str, &str)>> {
    bracketed
        .split(',')
        .map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            Some((key.trim(), value.trim()))
        })
        .collect()
}

fn lookup<'a>(pairs: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn parse_period_days(period: &str) -> Option<u32> {
    period.strip_prefix('P')?.strip_suffix('D')?.parse::<u32>().ok()
}

fn parse_interval(text: &str) -> Option<Interval> {
    let inner = text.strip_prefix(INTERVAL_PREFIX)?.strip_suffix(INTERVAL_SUFFIX)?;
    let (start, end) = inner.split_once('/')?;
    Some(Interval {
        start: parse_iso_millis(start).ok()?,
        end: parse_iso_millis(end).ok()?,
    })
}

/// Parse a `filter:timeRange` note into its PERIOD or RANGE form.
pub fn parse_time_range(note: &str) -> Result<TimeRangeFilter, QueryNoteError> {
    let unrecognized = || QueryNoteError::UnrecognizedTimeRange(note.to_string());

    let rest = note.trim().strip_prefix('[').ok_or_else(unrecognized)?;
    let (bracketed, tail) = rest.split_once(']').ok_or_else(unrecognized)?;
    let pairs = key_values(bracketed).ok_or_else(unrecognized)?;
    let tail = tail.trim();

    let mode = lookup(&pairs, "mode").ok_or_else(unrecognized)?.to_string();
    let modified_since = lookup(&pairs, "modifiedSince")
        .ok_or_else(unrecognized)?
        .to_string();

    match (lookup(&pairs, "period"), tail.is_empty()) {
        (Some(period), true) if pairs.len() == 3 => Ok(TimeRangeFilter::Period {
            mode,
            period_days: parse_period_days(period).ok_or_else(unrecognized)?,
            modified_since,
        }),
        (None, false) if pairs.len() == 2 => Ok(TimeRangeFilter::Range {
            mode,
            modified_since,
            interval: parse_interval(tail).ok_or_else(unrecognized)?,
        }),
        _ => Err(unrecognized()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_note() {
        let filter = parse_time_range("[mode=PERIOD, period=P7D, modifiedSince=null]").unwrap();
        assert_eq!(
            filter,
            TimeRangeFilter::Period {
                mode: "PERIOD".to_string(),
                period_days: 7,
                modified_since: "null".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_range_note() {
        let note = "[mode=RANGE, modifiedSince=null] interval={INTERVAL[2017-01-10T00:00:00.000-05:00/2017-01-11T23:59:59.999-05:00]}";
        let filter = parse_time_range(note).unwrap();
        assert_eq!(
            filter,
            TimeRangeFilter::Range {
                mode: "RANGE".to_string(),
                modified_since: "null".to_string(),
                interval: Interval {
                    start: 1_484_024_400_000,
                    end: 1_484_197_199_999,
                },
            }
        );
    }

    #[test]
    fn test_parse_unrecognized_note() {
        for note in [
            "",
            "mode=PERIOD",
            "[mode=PERIOD, period=P1Y, modifiedSince=null]",
            "[mode=RANGE, modifiedSince=null] interval={INTERVAL[garbage/2017-01-11]}",
            "[mode=RANGE, modifiedSince=null] something else",
            "[mode=PERIOD, period=P7D, modifiedSince=null] trailing",
        ] {
            assert_eq!(
                parse_time_range(note),
                Err(QueryNoteError::UnrecognizedTimeRange(note.to_string())),
                "{}",
                note
            );
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let filter = parse_time_range("[mode=PERIOD, period=P30D, modifiedSince=null]").unwrap();
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["periodDays"], 30);
        assert_eq!(json["modifiedSince"], "null");
    }
}

//! Reader for tab-delimited RDB tables.

use crate::error::Result;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One data line of an RDB table, keyed by the header names in header order.
///
/// Values are the literal field strings. A header with no corresponding field
/// on a short line maps to `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RdbRecord {
    fields: Vec<(String, Option<String>)>,
}

impl RdbRecord {
    fn from_string_record(headers: &StringRecord, row: &StringRecord) -> RdbRecord {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.to_string(), row.get(index).map(String::from)))
            .collect();
        RdbRecord { fields }
    }

    /// Field value for a column, `None` if the column is unknown or the line was short.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Column names in header order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for RdbRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

/// Parse an RDB document: `#` comment lines, a tab-separated header line, a
/// column format line (discarded), then data lines.
///
/// A document with no header, or a header with no data lines, yields an
/// empty vector.
pub fn parse_rdb(rdb: &str) -> Result<Vec<RdbRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(rdb.as_bytes());

    let mut lines = Vec::new();
    for row in reader.records() {
        let record = row?;
        if !is_blank(&record) {
            lines.push(record);
        }
    }

    if lines.len() < 3 {
        if lines.is_empty() {
            warn!("RDB document contains no header");
        } else {
            warn!("RDB document contains a header but no data lines");
        }
        return Ok(Vec::new());
    }

    let mut lines = lines.into_iter();
    let headers = match lines.next() {
        Some(headers) => headers,
        None => return Ok(Vec::new()),
    };
    // column width/type descriptors, e.g. "5s\t15s\t3n"
    let _format = lines.next();

    let records = lines
        .map(|row| RdbRecord::from_string_record(&headers, &row))
        .collect::<Vec<RdbRecord>>();
    debug!("Parsed {} RDB records with {} columns", records.len(), headers.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::parse_rdb;

    const MEDIAN_RDB: &str = include_str!("../../fixtures/median_statistics.rdb");

    #[test]
    fn test_parse_rdb_comments_only() {
        assert!(parse_rdb("#only comments").unwrap().is_empty());
        assert!(parse_rdb("# one\n# two\n\n").unwrap().is_empty());
        assert!(parse_rdb("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rdb_no_data_lines() {
        let rdb = "#comment\nagency_cd\tsite_no\tp50_va\n5s\t15s\t12s\n";
        assert!(parse_rdb(rdb).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rdb_median_statistics() {
        let records = parse_rdb(MEDIAN_RDB).unwrap();
        assert_eq!(records.len(), 13);
        let keys: Vec<&str> = records[0].keys().collect();
        assert_eq!(
            keys,
            vec![
                "agency_cd",
                "site_no",
                "parameter_cd",
                "ts_id",
                "loc_web_ds",
                "month_nu",
                "day_nu",
                "begin_yr",
                "end_yr",
                "count_nu",
                "p50_va"
            ]
        );
        assert_eq!(records[0].get("agency_cd"), Some("USGS"));
        assert_eq!(records[0].get("site_no"), Some("05370000"));
        assert_eq!(records[0].get("loc_web_ds"), Some(""));
        assert_eq!(records[0].get("month_nu"), Some("2"));
        assert_eq!(records[0].get("p50_va"), Some("26"));
        assert_eq!(records[12].get("day_nu"), Some("7"));
    }

    #[test]
    fn test_parse_rdb_short_line_and_blank_lines() {
        let rdb = "# header follows\na\tb\tc\n5s\t5s\t5s\n\n1\t2\t3\n4\t5\n";
        let records = parse_rdb(rdb).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("c"), Some("3"));
        assert_eq!(records[1].get("b"), Some("5"));
        assert_eq!(records[1].get("c"), None);
        assert_eq!(records[1].len(), 3);
        assert_eq!(records[1].get("missing"), None);
    }

    #[test]
    fn test_rdb_record_serializes_in_header_order() {
        let records = parse_rdb("x\ty\n1s\t1s\nfoo\n").unwrap();
        let json = serde_json::to_string(&records[0]).unwrap();
        assert_eq!(json, r#"{"x":"foo","y":null}"#);
    }
}

//! Shared calendar utilities for WDV crates.
//!
//! All instants are carried as epoch milliseconds (`i64`) and interpreted in
//! an IANA time zone only when calendar fields are needed.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone};
    use chrono_tz::Tz;
    use log::warn;
    use std::fmt;

    pub const MILLIS_PER_HOUR: i64 = 3_600_000;
    pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

    /// A year is approximated as this many hours when subtracting `P<N>Y`
    /// periods. Leap years are not accounted for; compare-to-last-year
    /// windows depend on this exact offset.
    pub const HOURS_PER_YEAR: i64 = 8760;

    /// Gregorian leap year rule.
    pub fn is_leap_year(year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// A relative period code as used by the UI controls: `P<N>D`, `P<N>Y`,
    /// or anything else (`custom` in practice), meaning an explicit range.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub enum Period {
        Days(u32),
        Years(u32),
        Custom(String),
    }

    impl Period {
        pub fn parse(code: &str) -> Period {
            let parsed = code.strip_prefix('P').and_then(|rest| {
                let unit = rest.chars().last()?;
                let count = rest[..rest.len() - unit.len_utf8()].parse::<u32>().ok()?;
                match unit {
                    'D' => Some(Period::Days(count)),
                    'Y' => Some(Period::Years(count)),
                    _ => None,
                }
            });
            parsed.unwrap_or_else(|| Period::Custom(code.to_string()))
        }

        pub fn is_custom(&self) -> bool {
            matches!(self, Period::Custom(_))
        }

        /// Start of the window that ends at `end_time`, interpreting the end
        /// instant in `tz`. Day periods step back whole local calendar days;
        /// year periods step back `HOURS_PER_YEAR` hours per year. A custom
        /// period has no relative start, so the end time is returned.
        pub fn start_time(&self, end_time: i64, tz: Tz) -> i64 {
            match self {
                Period::Days(days) => {
                    let stepped = zoned(end_time, tz)
                        .and_then(|end| end.checked_sub_days(Days::new(u64::from(*days))));
                    match stepped {
                        Some(start) => start.timestamp_millis(),
                        // the local start time falls in a DST transition
                        None => end_time.saturating_sub(i64::from(*days) * MILLIS_PER_DAY),
                    }
                }
                Period::Years(years) => {
                    let start = i64::from(*years)
                        .checked_mul(HOURS_PER_YEAR * MILLIS_PER_HOUR)
                        .and_then(|span| end_time.checked_sub(span));
                    match start {
                        Some(start) => start,
                        None => {
                            warn!("Period '{}' is out of range, start time equals end time", self);
                            end_time
                        }
                    }
                }
                Period::Custom(code) => {
                    warn!("Unrecognized period code '{}', start time equals end time", code);
                    end_time
                }
            }
        }
    }

    impl fmt::Display for Period {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Period::Days(n) => write!(f, "P{}D", n),
                Period::Years(n) => write!(f, "P{}Y", n),
                Period::Custom(code) => write!(f, "{}", code),
            }
        }
    }

    /// Start time in epoch millis for a period code ending at `end_time`.
    pub fn calc_start_time(period: &str, end_time: i64, tz: Tz) -> i64 {
        Period::parse(period).start_time(end_time, tz)
    }

    /// Parse an IANA time zone name such as "America/Chicago".
    pub fn parse_time_zone(name: &str) -> Result<Tz, DateError> {
        name.parse::<Tz>()
            .map_err(|_| DateError::UnknownTimeZone(name.to_string()))
    }

    /// Interpret epoch millis in the given zone.
    pub fn zoned(millis: i64, tz: Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(millis).single()
    }

    /// Calendar year of an instant as observed in `tz`.
    pub fn year_in_zone(millis: i64, tz: Tz) -> Option<i32> {
        zoned(millis, tz).map(|dt| dt.year())
    }

    /// Epoch millis of local midnight on the given date, or `None` when the
    /// date does not exist.
    pub fn midnight_millis(year: i32, month: u32, day: u32, tz: Tz) -> Option<i64> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        tz.from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.timestamp_millis())
    }

    /// Parse an ISO-8601 timestamp with offset, e.g. "2018-01-02T15:00:00.000-06:00".
    pub fn parse_iso_millis(s: &str) -> Result<i64, DateError> {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.timestamp_millis())
            .map_err(|e| DateError::InvalidTimestamp(format!("{}: {}", s, e)))
    }

    /// Parse either a full ISO-8601 timestamp or a bare "YYYY-MM-DD" date,
    /// the latter taken as local midnight in `tz`.
    pub fn parse_instant(s: &str, tz: Tz) -> Result<i64, DateError> {
        if let Ok(millis) = parse_iso_millis(s) {
            return Ok(millis);
        }
        let date = parse_date(s)?;
        midnight_millis(date.year(), date.month(), date.day(), tz)
            .ok_or_else(|| DateError::InvalidTimestamp(s.to_string()))
    }

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format epoch millis as an ISO-8601 timestamp in `tz`.
    pub fn format_millis(millis: i64, tz: Tz) -> String {
        match zoned(millis, tz) {
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            None => millis.to_string(),
        }
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> Result<NaiveDate, DateError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| DateError::InvalidTimestamp(format!("{}: {}", s, e)))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono_tz::America::{Chicago, New_York};

        #[test]
        fn test_is_leap_year() {
            assert!(is_leap_year(2000));
            assert!(is_leap_year(2008));
            assert!(!is_leap_year(2003));
            assert!(!is_leap_year(1900));
            for year in 1800..2400 {
                let expected = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
                assert_eq!(is_leap_year(year), expected, "year {}", year);
            }
        }

        #[test]
        fn test_period_parse() {
            assert_eq!(Period::parse("P7D"), Period::Days(7));
            assert_eq!(Period::parse("P30D"), Period::Days(30));
            assert_eq!(Period::parse("P1Y"), Period::Years(1));
            assert_eq!(Period::parse("custom"), Period::Custom("custom".to_string()));
            assert_eq!(Period::parse("P"), Period::Custom("P".to_string()));
            assert_eq!(Period::parse("P7W"), Period::Custom("P7W".to_string()));
            assert_eq!(Period::Days(7).to_string(), "P7D");
        }

        #[test]
        fn test_calc_start_time_days() {
            let end = parse_iso_millis("2018-03-06T19:26:00-06:00").unwrap();
            let start = calc_start_time("P7D", end, Chicago);
            assert_eq!(start, parse_iso_millis("2018-02-27T19:26:00-06:00").unwrap());
        }

        #[test]
        fn test_calc_start_time_days_across_dst() {
            // 2018-03-11 is the spring-forward date in New York
            let end = parse_iso_millis("2018-03-14T12:00:00-04:00").unwrap();
            let start = calc_start_time("P7D", end, New_York);
            assert_eq!(start, parse_iso_millis("2018-03-07T12:00:00-05:00").unwrap());
            assert_eq!(end - start, 7 * MILLIS_PER_DAY - MILLIS_PER_HOUR);
        }

        #[test]
        fn test_calc_start_time_years_is_8760_hours() {
            let end = parse_iso_millis("2017-03-01T00:00:00Z").unwrap();
            let start = calc_start_time("P1Y", end, Chicago);
            assert_eq!(end - start, HOURS_PER_YEAR * MILLIS_PER_HOUR);
            assert_eq!(start, parse_iso_millis("2016-03-01T00:00:00Z").unwrap());
            // the window contains Feb 29, so 8760 hours falls one day short of a calendar year
            let end = parse_iso_millis("2016-03-01T00:00:00Z").unwrap();
            let start = calc_start_time("P1Y", end, Chicago);
            assert_eq!(start, parse_iso_millis("2015-03-02T00:00:00Z").unwrap());
            let start = calc_start_time("P2Y", end, Chicago);
            assert_eq!(end - start, 2 * HOURS_PER_YEAR * MILLIS_PER_HOUR);
        }

        #[test]
        fn test_calc_start_time_unknown_period() {
            let end = parse_iso_millis("2018-03-06T19:26:00-06:00").unwrap();
            assert_eq!(calc_start_time("custom", end, Chicago), end);
            assert_eq!(calc_start_time("P3M", end, Chicago), end);
        }

        #[test]
        fn test_calc_start_time_out_of_range_period() {
            let end = parse_iso_millis("2018-03-06T19:26:00-06:00").unwrap();
            // N × 8760 h does not fit in i64 millis
            assert_eq!(calc_start_time("P300000000Y", end, Chicago), end);
            assert_eq!(calc_start_time("P4294967295Y", end, Chicago), end);
            // beyond the calendar, days fall back to fixed 24 h steps
            let start = calc_start_time("P4000000000D", end, Chicago);
            assert_eq!(end - start, 4_000_000_000 * MILLIS_PER_DAY);
            assert_eq!(calc_start_time("P4294967295D", i64::MIN + 1, Chicago), i64::MIN);
        }

        #[test]
        fn test_midnight_millis() {
            let midnight = midnight_millis(2018, 3, 6, Chicago).unwrap();
            assert_eq!(midnight, parse_iso_millis("2018-03-06T00:00:00-06:00").unwrap());
            assert_eq!(midnight_millis(2018, 2, 29, Chicago), None);
        }

        #[test]
        fn test_parse_instant() {
            let from_date = parse_instant("2018-03-06", Chicago).unwrap();
            assert_eq!(from_date, midnight_millis(2018, 3, 6, Chicago).unwrap());
            assert!(parse_instant("yesterday", Chicago).is_err());
            assert!(parse_time_zone("Mars/Olympus_Mons").is_err());
            assert_eq!(parse_time_zone("America/Chicago").unwrap(), Chicago);
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            let millis = parse_iso_millis("2018-01-02T15:00:00.000-06:00").unwrap();
            assert_eq!(format_millis(millis, Chicago), "2018-01-02T15:00:00.000-06:00");
        }
    }
}

/// Error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum DateError {
        #[error("Invalid timestamp: {0}")]
        InvalidTimestamp(String),

        #[error("Unknown time zone: {0}")]
        UnknownTimeZone(String),
    }
}

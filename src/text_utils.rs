use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::{FeedError, Result};

const NAIVE_DATE_TIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A post date. Remembers whether the source carried a time of day so a date-only
/// value renders back as a date only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub instant: DateTime<Utc>,
    pub has_time: bool,
}

impl Timestamp {
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Timestamp {
            instant,
            has_time: true,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Timestamp {
            instant: NaiveDateTime::new(date, NaiveTime::MIN).and_utc(),
            has_time: false,
        }
    }

    /// RSS date: `Tue, 02 Jan 2024 05:06:07 GMT`
    pub fn to_rfc2822(&self) -> String {
        self.instant.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    /// Sitemap `lastmod`: `2024-01-02` for dates, `2024-01-02T05:06:07Z` otherwise
    pub fn to_w3c(&self) -> String {
        if self.has_time {
            self.instant.to_rfc3339_opts(SecondsFormat::Secs, true)
        } else {
            self.instant.format("%Y-%m-%d").to_string()
        }
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant
            .cmp(&other.instant)
            .then(self.has_time.cmp(&other.has_time))
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_w3c())
    }
}

/// Parses the ISO-8601 shapes found in front matter. Values without an offset are UTC.
pub fn parse_timestamp(buf: &str) -> Result<Timestamp> {
    let buf = buf.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(buf) {
        return Ok(Timestamp::from_instant(dt.with_timezone(&Utc)));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(buf, format) {
            return Ok(Timestamp::from_instant(dt.and_utc()));
        }
    }

    match NaiveDate::parse_from_str(buf, "%Y-%m-%d") {
        Ok(date) => Ok(Timestamp::from_date(date)),
        Err(_) => Err(FeedError::InvalidDate { value: buf.to_string() }),
    }
}

/// Long display date: `January 2, 2024`
pub fn format_date(ts: &Timestamp) -> String {
    ts.instant.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-01-02").unwrap();
        assert!(!ts.has_time);
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());

        let ts = parse_timestamp("2024-01-02T05:06:07Z").unwrap();
        assert!(ts.has_time);
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2024, 1, 2, 5, 6, 7).unwrap());

        let ts = parse_timestamp("2024-01-02T07:06:07+02:00").unwrap();
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2024, 1, 2, 5, 6, 7).unwrap());

        let ts = parse_timestamp("2017-09-10 10:42:32.123").unwrap();
        assert_eq!(ts.instant.format("%Y-%m-%d %H:%M:%S").to_string(), "2017-09-10 10:42:32");

        let ts = parse_timestamp(" 2024-03-04T10:30 ").unwrap();
        assert_eq!(ts.instant, Utc.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid() {
        for value in ["", "yesterday", "2024-13-01", "2024/01/02"] {
            match parse_timestamp(value) {
                Err(FeedError::InvalidDate { .. }) => {}
                other => panic!("expected InvalidDate for {:?}, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_formats() {
        let ts = parse_timestamp("2024-01-02T05:06:07Z").unwrap();
        assert_eq!(ts.to_rfc2822(), "Tue, 02 Jan 2024 05:06:07 GMT");
        assert_eq!(ts.to_w3c(), "2024-01-02T05:06:07Z");
        assert_eq!(format_date(&ts), "January 2, 2024");

        let ts = parse_timestamp("2024-01-02").unwrap();
        assert_eq!(ts.to_rfc2822(), "Tue, 02 Jan 2024 00:00:00 GMT");
        assert_eq!(ts.to_w3c(), "2024-01-02");
        assert_eq!(ts.to_string(), "2024-01-02");
    }

    #[test]
    fn test_ordering() {
        let older = parse_timestamp("2023-12-31T23:59:59Z").unwrap();
        let newer = parse_timestamp("2024-01-01").unwrap();
        assert!(older < newer);
    }
}

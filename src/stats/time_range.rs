//! Conversion of the requested date/time into an epoch range and a spoken phrase.

use crate::types::{DateRange, DateTimeParam};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// en-US style "4/1/2020, 12:00:00 AM", in the offset the value carries
pub fn spoken_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Range and phrase for a date/time parameter; `now` closes a "since" range.
pub fn resolve_time_range(param: &DateTimeParam, now: DateTime<Utc>) -> (DateRange, String) {
    match param {
        DateTimeParam::Instant(since) => (
            DateRange::new(since.timestamp_millis(), now.timestamp_millis()),
            format!("since {}", spoken_date(since)),
        ),
        DateTimeParam::Between { start, end } => (
            DateRange::new(start.timestamp_millis(), end.timestamp_millis()),
            format!("between {} and {}", spoken_date(start), spoken_date(end)),
        ),
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as UTC midnight)
pub fn parse_date_time(value: &str) -> crate::error::Result<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed);
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| crate::error::StatsError::InvalidDate {
            value: value.to_string(),
            reason: "expected RFC 3339 or YYYY-MM-DD".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_closes_at_now() {
        let since = DateTime::parse_from_rfc3339("2020-04-01T12:00:00-04:00").unwrap();
        let now = Utc.with_ymd_and_hms(2020, 4, 10, 0, 0, 0).unwrap();

        let (range, phrase) = resolve_time_range(&DateTimeParam::Instant(since), now);
        assert_eq!(range.start_epoch_millis, since.timestamp_millis());
        assert_eq!(range.end_epoch_millis, now.timestamp_millis());
        assert_eq!(phrase, "since 4/1/2020, 12:00:00 PM");
    }

    #[test]
    fn test_between_phrase() {
        let start = DateTime::parse_from_rfc3339("2020-03-01T00:00:00Z").unwrap();
        let end = DateTime::parse_from_rfc3339("2020-03-31T23:59:59Z").unwrap();

        let (range, phrase) = resolve_time_range(&DateTimeParam::Between { start, end }, Utc::now());
        assert!(range.start_epoch_millis < range.end_epoch_millis);
        assert_eq!(phrase, "between 3/1/2020, 12:00:00 AM and 3/31/2020, 11:59:59 PM");
    }

    #[test]
    fn test_parse_date_time_forms() {
        let full = parse_date_time("2020-04-01T12:00:00-04:00").unwrap();
        assert_eq!(full.offset().local_minus_utc(), -4 * 3600);

        let bare = parse_date_time("2020-04-01").unwrap();
        assert_eq!(bare.timestamp(), Utc.with_ymd_and_hms(2020, 4, 1, 0, 0, 0).unwrap().timestamp());

        assert!(parse_date_time("next tuesday").is_err());
    }
}

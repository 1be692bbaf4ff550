//! Timestamp parsing and friendly formatting.
//!
//! The backend emits ISO-8601 timestamps, sometimes without a UTC offset;
//! offset-less timestamps are treated as UTC. Formatting is pure — callers
//! pass `now` so display stays testable.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a backend timestamp, accepting RFC 3339 or a bare ISO-8601
/// date-time (assumed UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Friendly label for a last-checked timestamp: "Today at 14:02",
/// "Yesterday at 09:15", a weekday within the last week, otherwise
/// "May 1 at 14:02".
pub fn format_last_checked(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let time = ts.format("%H:%M");
    let days = (now.date_naive() - ts.date_naive()).num_days();

    match days {
        0 => format!("Today at {}", time),
        1 => format!("Yesterday at {}", time),
        2..=6 => format!("{} at {}", ts.format("%A"), time),
        _ => format!("{} at {}", ts.format("%b %-d"), time),
    }
}

/// Compact relative time: "now", "5m ago", "2h ago", "3d ago".
pub fn time_ago(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(ts);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

/// Display label for an optional raw last-checked string.
///
/// "Never" before the first check; an unparsable value is shown verbatim
/// rather than dropped.
pub fn last_checked_label(raw: Option<&str>, now: DateTime<Utc>) -> String {
    match raw {
        None => "Never".to_string(),
        Some(s) => match parse_timestamp(s) {
            Some(ts) => format_last_checked(ts, now),
            None => s.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_and_naive() {
        assert_eq!(
            parse_timestamp("2024-05-01T12:00:00Z"),
            Some(utc(2024, 5, 1, 12, 0))
        );
        assert_eq!(
            parse_timestamp("2024-05-01T12:00:00"),
            Some(utc(2024, 5, 1, 12, 0))
        );
        assert!(parse_timestamp("2024-05-01T12:00:00.123456").is_some());
        assert!(parse_timestamp("not a timestamp").is_none());
    }

    #[test]
    fn test_format_last_checked_bands() {
        let now = utc(2024, 5, 10, 15, 0);

        assert_eq!(
            format_last_checked(utc(2024, 5, 10, 14, 2), now),
            "Today at 14:02"
        );
        assert_eq!(
            format_last_checked(utc(2024, 5, 9, 9, 15), now),
            "Yesterday at 09:15"
        );
        // 2024-05-06 was a Monday
        assert_eq!(
            format_last_checked(utc(2024, 5, 6, 8, 30), now),
            "Monday at 08:30"
        );
        assert_eq!(
            format_last_checked(utc(2024, 4, 1, 12, 0), now),
            "Apr 1 at 12:00"
        );
    }

    #[test]
    fn test_time_ago() {
        let now = utc(2024, 5, 10, 15, 0);

        assert_eq!(time_ago(utc(2024, 5, 10, 14, 59, ), now), "1m ago");
        assert_eq!(time_ago(now, now), "now");
        assert_eq!(time_ago(utc(2024, 5, 10, 14, 10), now), "50m ago");
        assert_eq!(time_ago(utc(2024, 5, 10, 12, 0), now), "3h ago");
        assert_eq!(time_ago(utc(2024, 5, 7, 15, 0), now), "3d ago");
    }

    #[test]
    fn test_last_checked_label() {
        let now = utc(2024, 5, 10, 15, 0);
        assert_eq!(last_checked_label(None, now), "Never");
        assert_eq!(
            last_checked_label(Some("2024-05-10T14:02:00"), now),
            "Today at 14:02"
        );
        assert_eq!(last_checked_label(Some("garbage"), now), "garbage");
    }
}

//! Human-readable relative time formatting for upstream timestamps

use serde_json::Value;

/// Units checked largest first; the first one that fits at least once wins.
const UNITS: &[(&str, i64)] = &[
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

const JUST_NOW: &str = "Just now";

/// Parsed form of an upstream `added_at` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Missing or falsy (`null`, `false`, `0`, `""`)
    Absent,
    /// Present but not integer-like
    Unparseable,
    /// Seconds since the Unix epoch
    Epoch(i64),
}

impl Timestamp {
    /// Interpret a raw JSON value the way the upstream feed is consumed:
    /// integers as-is, floats truncated, strings by their leading integer.
    pub fn from_json(value: Option<&Value>) -> Self {
        let Some(value) = value else {
            return Timestamp::Absent;
        };

        match value {
            Value::Null | Value::Bool(false) => Timestamp::Absent,
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    if i == 0 {
                        Timestamp::Absent
                    } else {
                        Timestamp::Epoch(i)
                    }
                } else if let Some(f) = n.as_f64() {
                    if f == 0.0 || f.is_nan() {
                        Timestamp::Absent
                    } else {
                        Timestamp::Epoch(f.trunc() as i64)
                    }
                } else {
                    Timestamp::Unparseable
                }
            }
            Value::String(s) if s.is_empty() => Timestamp::Absent,
            Value::String(s) => match parse_leading_int(s) {
                Some(i) => Timestamp::Epoch(i),
                None => Timestamp::Unparseable,
            },
            Value::Bool(true) | Value::Array(_) | Value::Object(_) => Timestamp::Unparseable,
        }
    }
}

/// Parses an optional sign followed by digits, ignoring leading whitespace
/// and anything after the digits ("1700000000abc" -> 1700000000).
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Formats `timestamp` relative to `now` (both epoch seconds).
///
/// Returns an empty string when the timestamp is absent and `"Just now"`
/// when it is less than a second old, in the future, or unparseable.
pub fn relative_time(timestamp: Option<&Value>, now: i64) -> String {
    match Timestamp::from_json(timestamp) {
        Timestamp::Absent => String::new(),
        Timestamp::Unparseable => JUST_NOW.to_string(),
        Timestamp::Epoch(then) => format_diff(now.saturating_sub(then)),
    }
}

/// Same as [`relative_time`], measured against the current wall clock.
pub fn relative_time_now(timestamp: Option<&Value>) -> String {
    relative_time(timestamp, chrono::Utc::now().timestamp())
}

fn format_diff(diff: i64) -> String {
    for &(unit, seconds) in UNITS {
        let count = diff.div_euclid(seconds);
        if count >= 1 {
            return if count == 1 {
                format!("1 {unit} ago")
            } else {
                format!("{count} {unit}s ago")
            };
        }
    }

    JUST_NOW.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_absent_timestamp_is_empty() {
        assert_eq!(relative_time(None, NOW), "");
        assert_eq!(relative_time(Some(&Value::Null), NOW), "");
        assert_eq!(relative_time(Some(&json!(0)), NOW), "");
        assert_eq!(relative_time(Some(&json!("")), NOW), "");
        assert_eq!(relative_time(Some(&json!(false)), NOW), "");
    }

    #[test]
    fn test_singular_units() {
        assert_eq!(relative_time(Some(&json!(NOW - 90_000)), NOW), "1 day ago");
        assert_eq!(relative_time(Some(&json!(NOW - 3_600)), NOW), "1 hour ago");
        assert_eq!(relative_time(Some(&json!(NOW - 60)), NOW), "1 minute ago");
        assert_eq!(relative_time(Some(&json!(NOW - 1)), NOW), "1 second ago");
    }

    #[test]
    fn test_plural_units() {
        assert_eq!(relative_time(Some(&json!(NOW - 40)), NOW), "40 seconds ago");
        assert_eq!(relative_time(Some(&json!(NOW - 3 * 86_400)), NOW), "3 days ago");
        assert_eq!(relative_time(Some(&json!(NOW - 2 * 604_800)), NOW), "2 weeks ago");
        assert_eq!(
            relative_time(Some(&json!(NOW - 2 * 31_536_000)), NOW),
            "2 years ago"
        );
    }

    #[test]
    fn test_largest_unit_wins() {
        // 35 days is past one month, so weeks are never considered
        assert_eq!(relative_time(Some(&json!(NOW - 35 * 86_400)), NOW), "1 month ago");
    }

    #[test]
    fn test_just_now_for_same_or_future_time() {
        assert_eq!(relative_time(Some(&json!(NOW)), NOW), "Just now");
        assert_eq!(relative_time(Some(&json!(NOW + 500)), NOW), "Just now");
    }

    #[test]
    fn test_string_timestamps() {
        let added = json!((NOW - 7_200).to_string());
        assert_eq!(relative_time(Some(&added), NOW), "2 hours ago");
        assert_eq!(relative_time(Some(&json!(" 1699999940xyz")), NOW), "1 minute ago");
    }

    #[test]
    fn test_unparseable_timestamp_is_just_now() {
        assert_eq!(relative_time(Some(&json!("yesterday")), NOW), "Just now");
        assert_eq!(relative_time(Some(&json!(true)), NOW), "Just now");
        assert_eq!(relative_time(Some(&json!({"at": 1})), NOW), "Just now");
    }

    #[test]
    fn test_float_timestamp_truncates() {
        let added = json!((NOW - 60) as f64 + 0.9);
        assert_eq!(relative_time(Some(&added), NOW), "1 minute ago");
    }

    #[test]
    fn test_relative_time_now_reads_clock() {
        let hour_ago = json!(chrono::Utc::now().timestamp() - 3_700);
        assert_eq!(relative_time_now(Some(&hour_ago)), "1 hour ago");
        assert_eq!(relative_time_now(None), "");
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("42"), Some(42));
        assert_eq!(parse_leading_int("-7s"), Some(-7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int("-"), None);
    }
}

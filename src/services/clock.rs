use chrono::{NaiveDateTime, Utc};

// Timestamps are stored as naive-UTC ISO-8601 text, e.g.
// "2025-10-17T10:06:13.256414". Registration windows and feedback deadlines
// need real comparisons, so stored values are parsed rather than sliced.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(now())
}

/// Accepts stored timestamps with or without a fractional-seconds part.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_then_parse_round_trips() {
        let stamp = parse_timestamp("2025-10-17T10:06:13.256414").expect("parse");
        assert_eq!(format_timestamp(stamp), "2025-10-17T10:06:13.256414");
    }

    #[test]
    fn now_timestamp_parses_back() {
        assert!(parse_timestamp(&now_timestamp()).is_some());
    }

    #[test]
    fn parses_without_fractional_seconds() {
        let parsed = parse_timestamp("2025-10-17T10:06:13").expect("whole seconds parse");
        assert_eq!(format_timestamp(parsed), "2025-10-17T10:06:13.000000");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("  ").is_none());
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("2025-10-17").is_none());
    }
}

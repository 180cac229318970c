//! Wire form of registry timestamps.
//!
//! Written as RFC 3339 with microseconds and a `Z` suffix, or `""` when unset.
//! Read leniently: `""` and `null` are unset, offset-less ISO-8601 is taken as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Render `ts` the way every registry endpoint does.
pub fn format(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
        .unwrap_or_default()
}

/// Parse an ISO-8601 timestamp, with or without an offset.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts.as_ref()))
}

/// Unparseable values are treated as unset rather than failing the whole body.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_accepts_offset_and_naive() {
        let with_offset = parse("2026-10-14T12:00:00.123456+02:00").unwrap();
        assert_eq!(with_offset.hour(), 10);

        let naive = parse("2026-10-14T12:00:00.123456").unwrap();
        assert_eq!(naive.hour(), 12);
        assert_eq!(naive.day(), 14);

        assert!(parse("2026-10-14T12:00:00").is_some());
    }

    #[test]
    fn test_parse_empty_is_unset() {
        assert!(parse("").is_none());
        assert!(parse("  ").is_none());
        assert!(parse("yesterday").is_none());
    }

    #[test]
    fn test_format_unset_is_empty() {
        assert_eq!(format(None), "");
        let t = parse("2026-10-14T12:00:00.5Z").unwrap();
        assert_eq!(format(Some(&t)), "2026-10-14T12:00:00.500000Z");
    }
}

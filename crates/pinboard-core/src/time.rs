use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp as RFC 3339 UTC with whole-second precision,
/// e.g. `2026-01-15T10:00:05Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The current time in the fixed format used by overlays and logs.
pub fn current_timestamp() -> String {
    format_timestamp(&Utc::now())
}

/// Serde adapter writing `DateTime<Utc>` with whole-second precision.
pub mod rfc3339_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_drops_subseconds() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 5).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(format_timestamp(&ts), "2026-01-15T10:00:05Z");
    }

    #[test]
    fn test_current_timestamp_parses_back() {
        let now = current_timestamp();
        assert!(now.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&now).is_ok());
    }
}

//! Timestamps.
//!
//! All ledger timestamps are UTC with microsecond precision. The canonical text
//! form is fixed-width RFC 3339 (`2024-05-01T09:30:00.000000Z`) so that string
//! order equals chronological order, which the store relies on for `since`
//! filters and recency listings.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};

use crate::error::LedgerError;

/// Point in time used for every ledger field.
pub type Timestamp = DateTime<Utc>;

const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Current time, truncated to microseconds.
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Render a timestamp in canonical form.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(CANONICAL_FORMAT).to_string()
}

/// Parse a timestamp.
///
/// Accepts RFC 3339 (any offset), naive ISO-8601 date-times (taken as UTC) and
/// bare `YYYY-MM-DD` dates (midnight UTC). The result is truncated to
/// microseconds.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, LedgerError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc).trunc_subsecs(6));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive).trunc_subsecs(6));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(LedgerError::validation(format!("unrecognized timestamp: {raw:?}")))
}

/// Serde adapter: canonical form on write, lenient parsing on read.
pub mod serde_lenient {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Timestamp, format_timestamp, parse_timestamp};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module for `Option<Timestamp>` (`null` ⇄ `None`).
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::{Timestamp, format_timestamp, parse_timestamp};

        pub fn serialize<S: Serializer>(
            ts: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_some(&format_timestamp(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Timestamp>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}

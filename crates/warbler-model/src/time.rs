use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

/// Rows written by this crate carry RFC 3339 timestamps; rows created by
/// SQLite defaults use "YYYY-MM-DD HH:MM:SS" without timezone. Accept both,
/// treating the naive form as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

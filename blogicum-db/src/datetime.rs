use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a TEXT timestamp column into a UTC datetime. Columns hold one of:
/// RFC3339 (T separator), the space-separated offset format sqlx encodes
/// chrono values with, or the naive `datetime('now')` format SQLite
/// defaults produce. All of them must parse.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    anyhow::bail!("Unrecognized datetime format: '{}'", raw)
}

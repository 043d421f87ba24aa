//! HTTP request types for the query server.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use super::error::ApiError;

/// Query parameters for range queries.
///
/// Two time modes are supported:
///
/// - `time_opt=absolute`: `start` and `end` are RFC 3339 instants.
/// - `time_opt=relative`: `start` and `end` are integer offsets back from
///   now, in `units` (`d`, `h`, `m`, `s`, or `ms`).
#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// Time mode: `absolute` or `relative`.
    pub time_opt: String,
    /// Range start (instant or offset, depending on mode).
    pub start: String,
    /// Range end (instant or offset, depending on mode).
    pub end: String,
    /// Offset units for relative mode.
    pub units: Option<String>,
}

impl QueryParams {
    /// Resolves the parameters to `(t_lo, t_hi)` in nanoseconds since epoch.
    ///
    /// `now` is injected so relative queries are testable.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<(i64, i64), ApiError> {
        match self.time_opt.to_lowercase().as_str() {
            "absolute" => {
                let start = parse_instant(&self.start)?;
                let end = parse_instant(&self.end)?;
                Ok((nanos(start), nanos(end)))
            }
            "relative" => {
                let units = self.units.as_deref().unwrap_or("s");
                let unit = resolve_unit(units)?;
                let start = parse_offset(&self.start)?;
                let end = parse_offset(&self.end)?;
                Ok((nanos(now - unit * start), nanos(now - unit * end)))
            }
            other => Err(ApiError::BadRequest(format!(
                "unknown time_opt {other:?}: expected \"absolute\" or \"relative\""
            ))),
        }
    }
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| ApiError::BadRequest(format!("invalid RFC 3339 instant {value:?}: {err}")))
}

fn parse_offset(value: &str) -> Result<i32, ApiError> {
    value
        .parse()
        .map_err(|err| ApiError::BadRequest(format!("invalid offset {value:?}: {err}")))
}

fn resolve_unit(units: &str) -> Result<Duration, ApiError> {
    match units {
        "d" => Ok(Duration::days(1)),
        "h" => Ok(Duration::hours(1)),
        "m" => Ok(Duration::minutes(1)),
        "s" => Ok(Duration::seconds(1)),
        "ms" => Ok(Duration::milliseconds(1)),
        other => Err(ApiError::BadRequest(format!(
            "unknown units {other:?}: expected d, h, m, s, or ms"
        ))),
    }
}

fn nanos(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

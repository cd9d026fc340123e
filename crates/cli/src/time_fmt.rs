#![forbid(unsafe_code)]

use crate::error::CliError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Parses an RFC 3339 timestamp into Unix milliseconds.
pub(crate) fn parse_rfc3339_ms(value: &str) -> Result<i64, CliError> {
    let invalid = |reason: String| CliError::InvalidTime {
        value: value.to_string(),
        reason,
    };
    let parsed = OffsetDateTime::parse(value, &Rfc3339).map_err(|err| invalid(err.to_string()))?;
    let ms = parsed.unix_timestamp_nanos() / 1_000_000;
    i64::try_from(ms).map_err(|_| invalid("out of range".to_string()))
}

pub(crate) fn ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = i128::from(ts_ms) * 1_000_000;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

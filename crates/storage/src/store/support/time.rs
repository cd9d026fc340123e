#![forbid(unsafe_code)]

use time::OffsetDateTime;

/// Wall clock as Unix milliseconds, the unit every row and log timestamp is stored in.
pub(in crate::store) fn now_ms() -> i64 {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(ms.max(0)).unwrap_or(i64::MAX)
}

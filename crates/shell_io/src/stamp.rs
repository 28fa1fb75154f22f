//! Conversions between listing timestamps, Unix seconds and `touch -t` stamps.

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Interprets a listing timestamp in `offset` and returns Unix seconds.
pub fn to_unix_seconds(stamp: PrimitiveDateTime, offset: UtcOffset) -> i64 {
    stamp.assume_offset(offset).unix_timestamp()
}

/// Formats Unix seconds as a `touch -t` stamp (`YYYYMMDDhhmm`) in `offset`.
///
/// Returns `None` when `seconds` is outside the range `time` can represent.
pub fn touch_stamp(seconds: i64, offset: UtcOffset) -> Option<String> {
    let moment = OffsetDateTime::from_unix_timestamp(seconds)
        .ok()?
        .to_offset(offset);
    moment
        .format(format_description!(
            "[year][month][day][hour][minute]"
        ))
        .ok()
}

/// Returns the host's current UTC offset, falling back to UTC when the
/// platform cannot determine it safely.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

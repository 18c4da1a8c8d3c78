use ::time::{
    format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime, UtcOffset,
};

/// Time-of-day substituted when a record's time field is absent or
/// malformed.
pub const DEFAULT_EXPIRY_TIME: &str = "23:59";

/// Storage format of a record's date field (`YYYY-MM-DD`).
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Returns the current date and time with the local system's UTC offset.
///
/// If the system's UTC offset could not be found, then [`now_utc`] is used
/// instead.
///
/// Callers that make more than one time comparison in a single request must
/// capture this once and pass it down, so every comparison sees the same
/// instant.
///
/// [`now_utc`]: OffsetDateTime::now_utc
#[inline]
pub fn now() -> OffsetDateTime {
    let t = OffsetDateTime::now_utc();
    match UtcOffset::local_offset_at(t) {
        Ok(offset) => t.to_offset(offset),
        Err(_err) => t,
    }
}

//! Timezone lookup and the date formats used in responses.

use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description,
};
use time_tz::{Offset, TimeZone};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]/[month]/[day]");

const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]/[month]/[day] [hour]:[minute]");

pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Like [get_local_offset], but logs and returns an error for unknown timezones.
pub fn local_offset_or_error(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// Format `timestamp` as `yyyy/MM/dd` in the timezone `offset`.
pub fn format_date(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    let timestamp = timestamp.to_offset(offset);

    timestamp
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| timestamp.date().to_string())
}

/// Format `timestamp` as `yyyy/MM/dd HH:mm` in the timezone `offset`.
pub fn format_date_time(timestamp: OffsetDateTime, offset: UtcOffset) -> String {
    let timestamp = timestamp.to_offset(offset);

    timestamp
        .format(DATE_TIME_FORMAT)
        .unwrap_or_else(|_| timestamp.to_string())
}

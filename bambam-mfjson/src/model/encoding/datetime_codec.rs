//! datetimes in MF-JSON documents are written in UTC at second precision,
//! without an offset or fractional seconds.
use chrono::{DateTime, NaiveDateTime, Utc};

pub const MFJSON_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format(MFJSON_DATETIME_FORMAT).to_string()
}

pub fn parse_datetime(datetime: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(datetime, MFJSON_DATETIME_FORMAT).map(|n| n.and_utc())
}

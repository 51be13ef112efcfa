use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// naive datetime formats accepted when a report carries a timestamp string
/// without a UTC offset. these are interpreted as UTC.
const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y%m%dT%H%M%S"];

/// observation time of a raw position report as delivered by the feed. GTFS-realtime
/// feeds carry POSIX seconds, while re-encoded or replayed feeds often carry strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Epoch(i64),
    Fractional(f64),
    Text(String),
}

impl RawTimestamp {
    /// parses this timestamp into UTC, truncated to whole seconds.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, String> {
        match self {
            RawTimestamp::Epoch(secs) => from_epoch_seconds(*secs),
            RawTimestamp::Fractional(secs) => {
                if !secs.is_finite() {
                    return Err(format!("timestamp {secs} is not a finite number"));
                }
                from_epoch_seconds(secs.trunc() as i64)
            }
            RawTimestamp::Text(text) => parse_text(text),
        }
    }
}

impl From<i64> for RawTimestamp {
    fn from(value: i64) -> Self {
        RawTimestamp::Epoch(value)
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        RawTimestamp::Text(value.to_string())
    }
}

fn from_epoch_seconds(secs: i64) -> Result<DateTime<Utc>, String> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| format!("epoch timestamp {secs} is out of range"))
}

fn parse_text(text: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(String::from("timestamp is empty"));
    }
    if let Ok(secs) = trimmed.parse::<i64>() {
        return from_epoch_seconds(secs);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return from_epoch_seconds(dt.timestamp());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unable to parse timestamp '{trimmed}'"))
        .and_then(|dt| from_epoch_seconds(dt.timestamp()))
}

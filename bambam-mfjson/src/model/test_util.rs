//! report and sample builders shared by the unit tests of this crate.
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::report::{RawPositionReport, RawTimestamp};
use crate::model::sample::{CanonicalSample, SampleNormalizer};

/// a UTC time on 2024-05-01 given as "HH:MM:SS"
pub fn at(time: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(&format!("2024-05-01T{time}"), "%Y-%m-%dT%H:%M:%S")
        .unwrap()
        .and_utc()
}

/// a report on 2024-05-01 at "HH:MM:SS" for the given trip
pub fn report(entity_id: &str, time: &str, trip_id: &str) -> RawPositionReport {
    let ts = RawTimestamp::Epoch(at(time).timestamp());
    let offset = at(time).timestamp() % 1000;
    RawPositionReport::new(
        entity_id,
        ts,
        -71.0 - offset as f64 * 0.0001,
        42.0 + offset as f64 * 0.0001,
    )
    .with_property("trip_id", trip_id)
    .with_property("route_id", "1")
    .with_property("direction_id", 0)
    .with_property("schedule_relationship", 0)
}

pub fn sample(entity_id: &str, time: &str, trip_id: &str) -> CanonicalSample {
    SampleNormalizer::default()
        .normalize(report(entity_id, time, trip_id))
        .unwrap()
        .sample
}

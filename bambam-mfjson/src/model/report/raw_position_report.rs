use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RawTimestamp;

/// one vehicle position report as delivered by the upstream feed decoder.
/// every field is optional here; validation happens during normalization so
/// that a bad report can be counted instead of failing the whole feed read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPositionReport {
    pub entity_id: Option<String>,
    pub timestamp: Option<RawTimestamp>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// named property values such as trip_id, bearing or occupancy_status
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    /// per-carriage details for multi-carriage vehicles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub carriages: Vec<RawCarriage>,
}

/// occupancy of one carriage of a multi-carriage vehicle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCarriage {
    pub label: Option<String>,
    pub carriage_sequence: Option<u32>,
    pub occupancy_status: Option<Value>,
}

impl RawPositionReport {
    pub fn new(
        entity_id: &str,
        timestamp: RawTimestamp,
        longitude: f64,
        latitude: f64,
    ) -> RawPositionReport {
        RawPositionReport {
            entity_id: Some(entity_id.to_string()),
            timestamp: Some(timestamp),
            longitude: Some(longitude),
            latitude: Some(latitude),
            properties: BTreeMap::new(),
            carriages: vec![],
        }
    }

    pub fn with_property(mut self, name: &str, value: impl Into<Value>) -> RawPositionReport {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn with_carriage(mut self, carriage: RawCarriage) -> RawPositionReport {
        self.carriages.push(carriage);
        self
    }
}

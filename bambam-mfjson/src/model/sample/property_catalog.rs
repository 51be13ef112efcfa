use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::property_names as names;
use super::ValueKind;

/// whether a property describes the trajectory as a whole (copied from the
/// last sample into the document `properties`) or varies along it
/// (written to `temporalProperties`).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PropertyRole {
    Static,
    Measure,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertySpec {
    pub kind: ValueKind,
    pub role: PropertyRole,
}

const DEFAULT_PROPERTIES: [(&str, ValueKind, PropertyRole); 18] = [
    (names::TRIP_ID, ValueKind::Text, PropertyRole::Static),
    (names::ROUTE_ID, ValueKind::Text, PropertyRole::Static),
    (names::DIRECTION_ID, ValueKind::IntegerEnum, PropertyRole::Static),
    // feeds send either the GTFS-realtime enum name or its integer code
    (names::SCHEDULE_RELATIONSHIP, ValueKind::Text, PropertyRole::Static),
    (names::TRIP_START_DATE, ValueKind::Text, PropertyRole::Static),
    (names::TRIP_START_TIME, ValueKind::Text, PropertyRole::Static),
    (names::VEHICLE_ID, ValueKind::Text, PropertyRole::Static),
    (names::VEHICLE_LABEL, ValueKind::Text, PropertyRole::Static),
    (names::LICENSE_PLATE, ValueKind::Text, PropertyRole::Static),
    (names::BEARING, ValueKind::Numeric, PropertyRole::Measure),
    (names::SPEED, ValueKind::Numeric, PropertyRole::Measure),
    (names::ODOMETER, ValueKind::Numeric, PropertyRole::Measure),
    (names::CURRENT_STATUS, ValueKind::IntegerEnum, PropertyRole::Measure),
    (names::STOP_ID, ValueKind::Text, PropertyRole::Measure),
    (names::CURRENT_STOP_SEQUENCE, ValueKind::IntegerEnum, PropertyRole::Measure),
    (names::OCCUPANCY_STATUS, ValueKind::IntegerEnum, PropertyRole::Measure),
    (names::OCCUPANCY_PERCENTAGE, ValueKind::IntegerEnum, PropertyRole::Measure),
    (names::CONGESTION_LEVEL, ValueKind::IntegerEnum, PropertyRole::Measure),
];

/// declares the semantic type and role of each known property name.
#[derive(Clone, Debug)]
pub struct PropertyCatalog {
    entries: HashMap<String, PropertySpec>,
}

impl Default for PropertyCatalog {
    fn default() -> Self {
        let entries = DEFAULT_PROPERTIES
            .iter()
            .map(|(name, kind, role)| {
                let spec = PropertySpec {
                    kind: *kind,
                    role: *role,
                };
                (name.to_string(), spec)
            })
            .collect();
        Self { entries }
    }
}

impl PropertyCatalog {
    /// the default catalog with the value kind replaced for the given names.
    /// names missing from the default catalog are added as measures.
    pub fn with_kind_overrides(overrides: &BTreeMap<String, ValueKind>) -> PropertyCatalog {
        let mut catalog = PropertyCatalog::default();
        for (name, kind) in overrides.iter() {
            catalog
                .entries
                .entry(name.clone())
                .and_modify(|spec| spec.kind = *kind)
                .or_insert(PropertySpec {
                    kind: *kind,
                    role: PropertyRole::Measure,
                });
        }
        catalog
    }

    pub fn get(&self, name: &str) -> Option<&PropertySpec> {
        self.entries.get(name)
    }
}

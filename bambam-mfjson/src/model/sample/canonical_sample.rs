use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use geo::Point;

use super::PropertyValue;

/// one validated observation of an entity. immutable once created.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalSample {
    entity_id: String,
    timestamp: DateTime<Utc>,
    position: Point<f64>,
    attributes: BTreeMap<String, PropertyValue>,
    measures: BTreeMap<String, PropertyValue>,
}

impl CanonicalSample {
    pub fn new(
        entity_id: String,
        timestamp: DateTime<Utc>,
        position: Point<f64>,
        attributes: BTreeMap<String, PropertyValue>,
        measures: BTreeMap<String, PropertyValue>,
    ) -> CanonicalSample {
        CanonicalSample {
            entity_id,
            timestamp,
            position,
            attributes,
            measures,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// x is longitude, y is latitude
    pub fn position(&self) -> Point<f64> {
        self.position
    }

    /// trip and vehicle descriptors of this sample
    pub fn attributes(&self) -> &BTreeMap<String, PropertyValue> {
        &self.attributes
    }

    pub fn measures(&self) -> &BTreeMap<String, PropertyValue> {
        &self.measures
    }

    pub fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get(name)
    }

    pub fn measure(&self, name: &str) -> Option<&PropertyValue> {
        self.measures.get(name)
    }

    /// looks up a property by name regardless of its role
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.attribute(name).or_else(|| self.measure(name))
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EncodingError;
use crate::model::interpolation::Interpolation;
use crate::model::sample::PropertyValue;

/// MF-JSON type tags. each is a single-variant enum so the tag is
/// written and verified by serde.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeatureType {
    #[default]
    Feature,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovingPointType {
    #[default]
    MovingPoint,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MeasureType {
    #[default]
    Measure,
}

/// one encoded trajectory, wrapped as a `FeatureCollection` with a single
/// `Feature` to match what downstream consumers read.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrajectoryDocument {
    #[serde(rename = "type")]
    pub collection_type: FeatureCollectionType,
    pub features: Vec<TrajectoryFeature>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrajectoryFeature {
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    #[serde(rename = "temporalGeometry")]
    pub temporal_geometry: MovingPoint,
    pub properties: TrajectoryProperties,
    #[serde(rename = "temporalProperties")]
    pub temporal_properties: Vec<TemporalProperties>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MovingPoint {
    #[serde(rename = "type")]
    pub geometry_type: MovingPointType,
    /// `[longitude, latitude]` pairs
    pub coordinates: Vec<[f64; 2]>,
    pub datetimes: Vec<String>,
    pub interpolation: Interpolation,
}

/// values that describe the whole trajectory, taken from its last sample
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrajectoryProperties {
    pub trajectory_id: u64,
    pub entity_id: String,
    pub direction_id: Option<PropertyValue>,
    pub label: Option<PropertyValue>,
    pub trip_id: Option<PropertyValue>,
    pub route_id: Option<PropertyValue>,
    pub schedule_relationship: Option<PropertyValue>,
    pub trip_start_date: Option<PropertyValue>,
    pub trip_start_time: Option<PropertyValue>,
    pub vehicle_id: Option<PropertyValue>,
    pub vehicle_label: Option<PropertyValue>,
    pub license_plate: Option<PropertyValue>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TemporalProperties {
    pub datetimes: Vec<String>,
    #[serde(flatten)]
    pub measures: BTreeMap<String, Measure>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Measure {
    #[serde(rename = "type")]
    pub measure_type: MeasureType,
    pub values: Vec<PropertyValue>,
    pub interpolation: Interpolation,
}

impl TrajectoryDocument {
    pub fn new(feature: TrajectoryFeature) -> TrajectoryDocument {
        TrajectoryDocument {
            collection_type: FeatureCollectionType::FeatureCollection,
            features: vec![feature],
        }
    }

    pub fn feature(&self) -> Option<&TrajectoryFeature> {
        self.features.first()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.feature().map(|f| f.properties.entity_id.as_str())
    }

    pub fn trajectory_id(&self) -> Option<u64> {
        self.feature().map(|f| f.properties.trajectory_id)
    }

    pub fn route_id(&self) -> Option<String> {
        self.feature()
            .and_then(|f| f.properties.route_id.as_ref())
            .map(|r| r.to_string())
    }

    pub fn datetimes(&self) -> &[String] {
        self.feature()
            .map(|f| f.temporal_geometry.datetimes.as_slice())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, EncodingError> {
        Ok(serde_json::to_string(self)?)
    }

    /// indented form used for files on disk
    pub fn to_json_pretty(&self) -> Result<String, EncodingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
